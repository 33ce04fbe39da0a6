//! Synthetic audio files and beat-directory trees.

use std::f64::consts::PI;
use std::fs;
use std::path::{Path, PathBuf};

use shantybeat_audio::AudioBuffer;
use shantybeat_cli::ShantyConfig;
use tempfile::TempDir;

/// Mono buffer with one short decaying click per beat.
pub fn click_track(bpm: f64, seconds: f64, sample_rate: u32) -> AudioBuffer {
    let n = (seconds * sample_rate as f64) as usize;
    let period = (60.0 / bpm * sample_rate as f64).round() as usize;
    let mut samples = vec![0.0; n];
    for start in (0..n).step_by(period.max(1)) {
        for i in 0..64.min(n - start) {
            let sign = if i % 2 == 0 { 1.0 } else { -1.0 };
            samples[start + i] = (-(i as f64) / 8.0).exp() * sign * 0.9;
        }
    }
    AudioBuffer::new(samples, sample_rate)
}

/// Steady sine tone.
pub fn tone(freq: f64, seconds: f64, sample_rate: u32) -> AudioBuffer {
    let n = (seconds * sample_rate as f64) as usize;
    let samples = (0..n)
        .map(|i| (2.0 * PI * freq * i as f64 / sample_rate as f64).sin() * 0.5)
        .collect();
    AudioBuffer::new(samples, sample_rate)
}

/// Writes `buffer` as a mono 16-bit WAV with `hound`.
pub fn write_wav(path: &Path, buffer: &AudioBuffer) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("Failed to create fixture dir");
    }
    let spec = hound::WavSpec {
        channels: 1,
        sample_rate: buffer.sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };
    let mut writer = hound::WavWriter::create(path, spec).expect("Failed to create WAV");
    for &s in &buffer.samples {
        let value = (s.clamp(-1.0, 1.0) * 32767.0).round() as i16;
        writer.write_sample(value).expect("Failed to write sample");
    }
    writer.finalize().expect("Failed to finalize WAV");
}

/// A temporary project with `beats/`, `outputs/`, `temp/` and
/// `background_music/` directories.
pub struct BeatLibraryFixture {
    pub root: TempDir,
}

impl Default for BeatLibraryFixture {
    fn default() -> Self {
        Self::new()
    }
}

impl BeatLibraryFixture {
    /// Creates an empty project.
    pub fn new() -> Self {
        let root = TempDir::new().expect("Failed to create temp dir");
        fs::create_dir_all(root.path().join("beats")).expect("Failed to create beats dir");
        Self { root }
    }

    /// Project root.
    pub fn path(&self) -> &Path {
        self.root.path()
    }

    /// Beats directory.
    pub fn beats_dir(&self) -> PathBuf {
        self.path().join("beats")
    }

    /// Configuration pointing every directory into the project.
    pub fn config(&self) -> ShantyConfig {
        ShantyConfig {
            sample_rate: 16_000,
            beats_dir: self.beats_dir(),
            output_dir: self.path().join("outputs"),
            temp_dir: self.path().join("temp"),
            background_music_dir: self.path().join("background_music"),
            ..ShantyConfig::default()
        }
    }

    /// Writes a click-track beat at `bpm` under `beats/<genre>/<name>`.
    pub fn add_beat(&self, genre: &str, name: &str, bpm: f64, seconds: f64) -> PathBuf {
        let path = self.beats_dir().join(genre).join(name);
        write_wav(&path, &click_track(bpm, seconds, 16_000));
        path
    }

    /// Writes a tone into the background-music directory.
    pub fn add_background(&self, name: &str, seconds: f64) -> PathBuf {
        let path = self.path().join("background_music").join(name);
        write_wav(&path, &tone(220.0, seconds, 16_000));
        path
    }

    /// Writes a vocal stand-in at the project root.
    pub fn add_vocal(&self, name: &str, buffer: &AudioBuffer) -> PathBuf {
        let path = self.path().join(name);
        write_wav(&path, buffer);
        path
    }
}
