//! Loading input audio and writing finished files.
//!
//! WAV input goes through `hound`; MP3, FLAC and Ogg Vorbis go through
//! `symphonia`. Everything is downmixed to mono `f64`. Writes are atomic:
//! bytes land in a temporary file in the destination directory, which is
//! then renamed over the target.

use std::fmt;
use std::fs::{self, File};
use std::io::{Cursor, Write};
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use symphonia::core::audio::SampleBuffer;
use symphonia::core::codecs::DecoderOptions;
use symphonia::core::errors::Error as SymphoniaError;
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;
use tempfile::NamedTempFile;
use tracing::{debug, warn};

use crate::buffer::AudioBuffer;
use crate::error::{AudioError, AudioResult};
use crate::wav::WavResult;

/// File extensions accepted as audio input.
pub const AUDIO_EXTENSIONS: [&str; 4] = ["wav", "mp3", "flac", "ogg"];

/// Returns true if the path has a supported audio extension.
pub fn is_audio_file(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| AUDIO_EXTENSIONS.contains(&e.to_ascii_lowercase().as_str()))
        .unwrap_or(false)
}

/// Loads any supported audio file as mono.
pub fn load_audio(path: &Path) -> AudioResult<AudioBuffer> {
    let is_wav = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.eq_ignore_ascii_case("wav"))
        .unwrap_or(false);

    let buffer = if is_wav {
        load_wav(path)?
    } else {
        decode_compressed(path)?
    };
    debug!(
        path = %path.display(),
        sample_rate = buffer.sample_rate,
        seconds = buffer.duration_seconds(),
        "loaded audio"
    );
    Ok(buffer)
}

/// Loads a PCM or float WAV file, averaging channels to mono.
pub fn load_wav(path: &Path) -> AudioResult<AudioBuffer> {
    let wav_err = |source| AudioError::Wav {
        path: path.to_path_buf(),
        source,
    };
    let mut reader = hound::WavReader::open(path).map_err(wav_err)?;
    let spec = reader.spec();

    let interleaved: Vec<f64> = match spec.sample_format {
        hound::SampleFormat::Float => reader
            .samples::<f32>()
            .map(|s| s.map(f64::from))
            .collect::<Result<_, _>>()
            .map_err(wav_err)?,
        hound::SampleFormat::Int => {
            let scale = (1i64 << (spec.bits_per_sample.saturating_sub(1))) as f64;
            reader
                .samples::<i32>()
                .map(|s| s.map(|v| v as f64 / scale))
                .collect::<Result<_, _>>()
                .map_err(wav_err)?
        }
    };

    Ok(AudioBuffer::new(
        downmix(&interleaved, spec.channels as usize),
        spec.sample_rate,
    ))
}

/// Decodes a compressed file with symphonia.
pub fn decode_compressed(path: &Path) -> AudioResult<AudioBuffer> {
    let decode_err = |message: String| AudioError::Decode {
        path: path.to_path_buf(),
        message,
    };

    let file = File::open(path).map_err(|e| AudioError::io("open", path, e))?;
    let mss = MediaSourceStream::new(Box::new(file), Default::default());

    let mut hint = Hint::new();
    if let Some(ext) = path.extension().and_then(|e| e.to_str()) {
        hint.with_extension(ext);
    }

    let probed = symphonia::default::get_probe()
        .format(
            &hint,
            mss,
            &FormatOptions::default(),
            &MetadataOptions::default(),
        )
        .map_err(|e| decode_err(format!("unsupported format: {}", e)))?;
    let mut format = probed.format;

    let track = format
        .default_track()
        .ok_or_else(|| decode_err("no audio track found".to_string()))?;
    let track_id = track.id;
    let codec_params = track.codec_params.clone();

    let mut decoder = symphonia::default::get_codecs()
        .make(&codec_params, &DecoderOptions::default())
        .map_err(|e| decode_err(format!("unsupported codec: {}", e)))?;

    let mut sample_rate = codec_params.sample_rate;
    let mut mono = Vec::new();

    loop {
        let packet = match format.next_packet() {
            Ok(packet) => packet,
            Err(SymphoniaError::IoError(e)) if e.kind() == std::io::ErrorKind::UnexpectedEof => {
                break;
            }
            Err(e) => return Err(decode_err(e.to_string())),
        };
        if packet.track_id() != track_id {
            continue;
        }

        let decoded = match decoder.decode(&packet) {
            Ok(decoded) => decoded,
            Err(SymphoniaError::DecodeError(message)) => {
                warn!(path = %path.display(), reason = message, "skipping corrupt packet");
                continue;
            }
            Err(e) => return Err(decode_err(e.to_string())),
        };

        let spec = *decoded.spec();
        sample_rate.get_or_insert(spec.rate);
        let channels = spec.channels.count().max(1);

        let mut samples = SampleBuffer::<f32>::new(decoded.capacity() as u64, spec);
        samples.copy_interleaved_ref(decoded);
        let interleaved: Vec<f64> = samples.samples().iter().map(|&s| s as f64).collect();
        mono.extend(downmix(&interleaved, channels));
    }

    let sample_rate = sample_rate.ok_or_else(|| decode_err("unknown sample rate".to_string()))?;
    Ok(AudioBuffer::new(mono, sample_rate))
}

/// Averages interleaved frames to one channel.
fn downmix(interleaved: &[f64], channels: usize) -> Vec<f64> {
    if channels <= 1 {
        return interleaved.to_vec();
    }
    interleaved
        .chunks_exact(channels)
        .map(|frame| frame.iter().sum::<f64>() / channels as f64)
        .collect()
}

/// Encoding used for finished files.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExportFormat {
    /// 16-bit PCM stereo, byte-for-byte deterministic.
    #[default]
    Wav16,
    /// 32-bit float stereo.
    WavFloat32,
}

impl ExportFormat {
    /// File extension for this format.
    pub fn extension(&self) -> &'static str {
        "wav"
    }

    /// Lower-case tag.
    pub fn as_str(&self) -> &'static str {
        match self {
            ExportFormat::Wav16 => "wav16",
            ExportFormat::WavFloat32 => "wav_float32",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ExportFormat {
    type Err = AudioError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "wav16" | "wav" => Ok(ExportFormat::Wav16),
            "wav_float32" | "float32" => Ok(ExportFormat::WavFloat32),
            other => Err(AudioError::invalid_param(
                "export_format",
                format!("unknown format '{}' (expected wav16 or wav_float32)", other),
            )),
        }
    }
}

/// What was written by [`export`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExportSummary {
    /// Destination file.
    pub path: PathBuf,
    /// Encoding used.
    pub format: ExportFormat,
    /// Frames per channel.
    pub num_frames: usize,
    /// Sample rate in Hz.
    pub sample_rate: u32,
    /// BLAKE3 hex digest of the encoded sample payload.
    pub pcm_hash: String,
}

/// Writes a mono buffer as a stereo file, atomically.
pub fn export(buffer: &AudioBuffer, path: &Path, format: ExportFormat) -> AudioResult<ExportSummary> {
    let (bytes, pcm_hash) = match format {
        ExportFormat::Wav16 => {
            let wav = WavResult::stereo(&buffer.samples, buffer.sample_rate);
            (wav.wav_data, wav.pcm_hash)
        }
        ExportFormat::WavFloat32 => encode_float32(buffer, path)?,
    };

    write_atomic(path, &bytes)?;
    debug!(path = %path.display(), %format, frames = buffer.len(), "exported audio");

    Ok(ExportSummary {
        path: path.to_path_buf(),
        format,
        num_frames: buffer.len(),
        sample_rate: buffer.sample_rate,
        pcm_hash,
    })
}

fn encode_float32(buffer: &AudioBuffer, path: &Path) -> AudioResult<(Vec<u8>, String)> {
    let wav_err = |source| AudioError::Wav {
        path: path.to_path_buf(),
        source,
    };
    let spec = hound::WavSpec {
        channels: 2,
        sample_rate: buffer.sample_rate,
        bits_per_sample: 32,
        sample_format: hound::SampleFormat::Float,
    };

    let mut cursor = Cursor::new(Vec::new());
    let mut hasher = blake3::Hasher::new();
    {
        let mut writer = hound::WavWriter::new(&mut cursor, spec).map_err(wav_err)?;
        for &sample in &buffer.samples {
            let value = sample as f32;
            hasher.update(&value.to_le_bytes());
            hasher.update(&value.to_le_bytes());
            writer.write_sample(value).map_err(wav_err)?;
            writer.write_sample(value).map_err(wav_err)?;
        }
        writer.finalize().map_err(wav_err)?;
    }
    Ok((cursor.into_inner(), hasher.finalize().to_hex().to_string()))
}

/// Writes bytes to `path` through a temporary sibling file.
///
/// Missing parent directories are created. Readers never observe a partially
/// written file.
pub fn write_atomic(path: &Path, bytes: &[u8]) -> AudioResult<()> {
    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    fs::create_dir_all(parent).map_err(|e| AudioError::io("create directory", parent, e))?;

    let mut tmp = NamedTempFile::new_in(parent).map_err(|e| AudioError::io("write", path, e))?;
    tmp.write_all(bytes)
        .and_then(|_| tmp.flush())
        .map_err(|e| AudioError::io("write", path, e))?;
    tmp.persist(path)
        .map_err(|e| AudioError::io("rename", path, e.error))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_export_and_reload_wav16() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("out.wav");
        let samples: Vec<f64> = (0..800).map(|i| (i as f64 * 0.05).sin() * 0.5).collect();
        let buffer = AudioBuffer::new(samples.clone(), 8000);

        let summary = export(&buffer, &path, ExportFormat::Wav16).unwrap();
        assert_eq!(summary.num_frames, 800);

        let loaded = load_audio(&path).unwrap();
        assert_eq!(loaded.sample_rate, 8000);
        assert_eq!(loaded.len(), 800);
        for (a, b) in loaded.samples.iter().zip(&samples) {
            assert!((a - b).abs() < 1e-3);
        }
    }

    #[test]
    fn test_export_float32_reloads_exactly() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("float.wav");
        let buffer = AudioBuffer::new(vec![0.25, -0.5, 0.125], 16000);
        export(&buffer, &path, ExportFormat::WavFloat32).unwrap();

        let loaded = load_wav(&path).unwrap();
        assert_eq!(loaded.samples, vec![0.25, -0.5, 0.125]);
    }

    #[test]
    fn test_downmix_averages_channels() {
        assert_eq!(downmix(&[1.0, 0.0, 0.5, 0.5], 2), vec![0.5, 0.5]);
        assert_eq!(downmix(&[0.3], 1), vec![0.3]);
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let err = load_audio(Path::new("/definitely/not/here.mp3")).unwrap_err();
        assert!(matches!(err, AudioError::Io { .. }));
        assert!(load_audio(Path::new("/definitely/not/here.wav")).is_err());
    }

    #[test]
    fn test_write_atomic_replaces_existing() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("file.bin");
        write_atomic(&path, b"first").unwrap();
        write_atomic(&path, b"second").unwrap();
        assert_eq!(fs::read(&path).unwrap(), b"second");
        // Only the target remains; the temporary was renamed, not copied.
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn test_export_format_parsing() {
        assert_eq!("wav16".parse::<ExportFormat>().unwrap(), ExportFormat::Wav16);
        assert_eq!(
            "wav-float32".parse::<ExportFormat>().unwrap(),
            ExportFormat::WavFloat32
        );
        assert!("mp3".parse::<ExportFormat>().is_err());
    }

    #[test]
    fn test_is_audio_file() {
        assert!(is_audio_file(Path::new("a/b.WAV")));
        assert!(is_audio_file(Path::new("song.ogg")));
        assert!(!is_audio_file(Path::new("notes.txt")));
        assert!(!is_audio_file(Path::new("noext")));
    }
}
