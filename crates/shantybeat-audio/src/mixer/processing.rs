//! Gain conversion, looping and fades.

/// Level used for a non-positive linear gain.
pub const SILENCE_DB: f64 = -60.0;

/// Converts a linear gain to decibels; zero or negative gains map to
/// [`SILENCE_DB`].
pub fn gain_to_db(gain: f64) -> f64 {
    if gain > 0.0 {
        20.0 * gain.log10()
    } else {
        SILENCE_DB
    }
}

/// Converts decibels to a linear gain.
#[inline]
pub fn db_to_gain(db: f64) -> f64 {
    10.0_f64.powf(db / 20.0)
}

/// Repeats `samples` end to end and cuts the result to exactly `length`.
///
/// An empty input yields silence.
pub fn loop_to_length(samples: &[f64], length: usize) -> Vec<f64> {
    if samples.is_empty() {
        return vec![0.0; length];
    }
    samples.iter().copied().cycle().take(length).collect()
}

/// Applies a linear fade to zero over the last `num_samples` samples.
///
/// Nothing happens unless the buffer is strictly longer than the fade.
pub fn fade_out(samples: &mut [f64], num_samples: usize) {
    if num_samples == 0 || samples.len() <= num_samples {
        return;
    }
    let start = samples.len() - num_samples;
    let denom = num_samples as f64;
    for (i, sample) in samples[start..].iter_mut().enumerate() {
        *sample *= 1.0 - (i + 1) as f64 / denom;
    }
}
