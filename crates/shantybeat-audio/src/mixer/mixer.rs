//! Mix request builder.

use tracing::debug;

use super::processing::{db_to_gain, fade_out, gain_to_db, loop_to_length};
use crate::buffer::{samples_for, AudioBuffer};
use crate::error::{AudioError, AudioResult};
use crate::stretch::resample;

/// Vocal gain used when none is given.
pub const DEFAULT_VOCAL_GAIN: f64 = 1.0;

/// Instrumental gain used when none is given.
pub const DEFAULT_INSTRUMENTAL_GAIN: f64 = 0.4;

/// A vocal and an instrumental to be combined, plus mix settings.
///
/// The output always has the vocal's length and sample rate.
#[derive(Debug, Clone)]
pub struct MixRequest {
    vocal: AudioBuffer,
    instrumental: AudioBuffer,
    vocal_gain: f64,
    instrumental_gain: f64,
    fade_out_seconds: f64,
}

impl MixRequest {
    /// Creates a request with default gains and no fade.
    pub fn new(vocal: AudioBuffer, instrumental: AudioBuffer) -> Self {
        Self {
            vocal,
            instrumental,
            vocal_gain: DEFAULT_VOCAL_GAIN,
            instrumental_gain: DEFAULT_INSTRUMENTAL_GAIN,
            fade_out_seconds: 0.0,
        }
    }

    /// Sets the linear vocal gain.
    pub fn vocal_gain(mut self, gain: f64) -> Self {
        self.vocal_gain = gain;
        self
    }

    /// Sets the linear instrumental gain.
    pub fn instrumental_gain(mut self, gain: f64) -> Self {
        self.instrumental_gain = gain;
        self
    }

    /// Fades the instrumental out over its last `seconds`.
    pub fn fade_out(mut self, seconds: f64) -> Self {
        self.fade_out_seconds = seconds;
        self
    }

    fn validate(&self) -> AudioResult<()> {
        for (name, gain) in [
            ("vocal_gain", self.vocal_gain),
            ("instrumental_gain", self.instrumental_gain),
        ] {
            if !gain.is_finite() {
                return Err(AudioError::invalid_param(name, "gain must be finite"));
            }
        }
        if !self.fade_out_seconds.is_finite() || self.fade_out_seconds < 0.0 {
            return Err(AudioError::invalid_param(
                "fade_out_seconds",
                "fade must be a non-negative number of seconds",
            ));
        }
        Ok(())
    }

    /// Performs the mix.
    pub fn mix(self) -> AudioResult<AudioBuffer> {
        self.validate()?;

        let length = self.vocal.len();
        let sample_rate = self.vocal.sample_rate;
        if length == 0 {
            return Ok(AudioBuffer::zeros(0, sample_rate));
        }
        if self.instrumental.is_empty() {
            return Err(AudioError::invalid_param(
                "instrumental",
                "instrumental track has no samples",
            ));
        }

        let instrumental = if self.instrumental.sample_rate != sample_rate {
            debug!(
                from = self.instrumental.sample_rate,
                to = sample_rate,
                "resampling instrumental"
            );
            resample(&self.instrumental, sample_rate)?
        } else {
            self.instrumental
        };

        let mut bed = loop_to_length(&instrumental.samples, length);
        fade_out(&mut bed, samples_for(self.fade_out_seconds, sample_rate));

        let vocal_db = gain_to_db(self.vocal_gain);
        let instrumental_db = gain_to_db(self.instrumental_gain);
        debug!(
            samples = length,
            loops = length as f64 / instrumental.len().max(1) as f64,
            vocal_db,
            instrumental_db,
            "mixing"
        );

        let vocal_gain = db_to_gain(vocal_db);
        let instrumental_gain = db_to_gain(instrumental_db);
        let samples = self
            .vocal
            .samples
            .iter()
            .zip(&bed)
            .map(|(v, i)| v * vocal_gain + i * instrumental_gain)
            .collect();

        Ok(AudioBuffer::new(samples, sample_rate))
    }
}

/// Mixes `vocal` over `instrumental` with the given linear gains.
///
/// # Arguments
/// * `vocal` - Lead track; fixes the output length and sample rate
/// * `instrumental` - Bed, resampled and looped or trimmed to fit
/// * `vocal_gain` - Linear vocal gain
/// * `instrumental_gain` - Linear instrumental gain; zero or less is -60 dB
///
/// # Returns
/// The summed buffer, or an error for an empty instrumental
pub fn mix(
    vocal: AudioBuffer,
    instrumental: AudioBuffer,
    vocal_gain: f64,
    instrumental_gain: f64,
) -> AudioResult<AudioBuffer> {
    MixRequest::new(vocal, instrumental)
        .vocal_gain(vocal_gain)
        .instrumental_gain(instrumental_gain)
        .mix()
}
