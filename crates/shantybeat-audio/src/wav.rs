//! Deterministic 16-bit PCM WAV encoding.
//!
//! Output carries no timestamps or optional chunks, so identical samples
//! always produce identical bytes. The BLAKE3 hash of the PCM payload is
//! reported alongside the encoded file.

use std::io::{self, Write};

/// Channel layout and rate of an encoded file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WavFormat {
    /// Number of channels (1 = mono, 2 = stereo).
    pub channels: u16,
    /// Sample rate in Hz.
    pub sample_rate: u32,
}

impl WavFormat {
    const BITS_PER_SAMPLE: u16 = 16;

    /// Mono layout.
    pub fn mono(sample_rate: u32) -> Self {
        Self {
            channels: 1,
            sample_rate,
        }
    }

    /// Stereo layout.
    pub fn stereo(sample_rate: u32) -> Self {
        Self {
            channels: 2,
            sample_rate,
        }
    }

    fn block_align(&self) -> u16 {
        self.channels * (Self::BITS_PER_SAMPLE / 8)
    }

    fn byte_rate(&self) -> u32 {
        self.sample_rate * self.block_align() as u32
    }
}

/// Writes the RIFF header, format chunk and PCM payload.
pub fn write_wav<W: Write>(writer: &mut W, format: &WavFormat, pcm_data: &[u8]) -> io::Result<()> {
    let data_size = pcm_data.len() as u32;

    writer.write_all(b"RIFF")?;
    writer.write_all(&(36 + data_size).to_le_bytes())?;
    writer.write_all(b"WAVE")?;

    writer.write_all(b"fmt ")?;
    writer.write_all(&16u32.to_le_bytes())?;
    writer.write_all(&1u16.to_le_bytes())?;
    writer.write_all(&format.channels.to_le_bytes())?;
    writer.write_all(&format.sample_rate.to_le_bytes())?;
    writer.write_all(&format.byte_rate().to_le_bytes())?;
    writer.write_all(&format.block_align().to_le_bytes())?;
    writer.write_all(&WavFormat::BITS_PER_SAMPLE.to_le_bytes())?;

    writer.write_all(b"data")?;
    writer.write_all(&data_size.to_le_bytes())?;
    writer.write_all(pcm_data)
}

/// Quantizes one sample to 16-bit, clipping to `[-1.0, 1.0]`.
#[inline]
pub fn quantize16(sample: f64) -> i16 {
    (sample.clamp(-1.0, 1.0) * 32767.0).round() as i16
}

/// Encodes mono samples, repeating each one `channels` times.
pub fn samples_to_pcm16(samples: &[f64], channels: u16) -> Vec<u8> {
    let mut pcm = Vec::with_capacity(samples.len() * 2 * channels as usize);
    for &sample in samples {
        let bytes = quantize16(sample).to_le_bytes();
        for _ in 0..channels {
            pcm.extend_from_slice(&bytes);
        }
    }
    pcm
}

/// An encoded file plus the hash of its payload.
#[derive(Debug, Clone, PartialEq)]
pub struct WavResult {
    /// Complete file bytes.
    pub wav_data: Vec<u8>,
    /// BLAKE3 hex digest of the PCM payload only.
    pub pcm_hash: String,
    /// Channel count.
    pub channels: u16,
    /// Sample rate in Hz.
    pub sample_rate: u32,
    /// Frames per channel.
    pub num_frames: usize,
}

impl WavResult {
    /// Encodes mono samples as a single-channel file.
    pub fn mono(samples: &[f64], sample_rate: u32) -> Self {
        Self::encode(samples, WavFormat::mono(sample_rate))
    }

    /// Encodes mono samples duplicated to both stereo channels.
    pub fn stereo(samples: &[f64], sample_rate: u32) -> Self {
        Self::encode(samples, WavFormat::stereo(sample_rate))
    }

    fn encode(samples: &[f64], format: WavFormat) -> Self {
        let pcm = samples_to_pcm16(samples, format.channels);
        let pcm_hash = blake3::hash(&pcm).to_hex().to_string();
        let mut wav_data = Vec::with_capacity(44 + pcm.len());
        write_wav(&mut wav_data, &format, &pcm).expect("writing to Vec should not fail");

        Self {
            wav_data,
            pcm_hash,
            channels: format.channels,
            sample_rate: format.sample_rate,
            num_frames: samples.len(),
        }
    }

    /// Duration in seconds.
    pub fn duration_seconds(&self) -> f64 {
        self.num_frames as f64 / self.sample_rate as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_layout() {
        let result = WavResult::stereo(&[0.0; 10], 24000);
        let data = &result.wav_data;
        assert_eq!(&data[0..4], b"RIFF");
        assert_eq!(&data[8..12], b"WAVE");
        assert_eq!(u16::from_le_bytes([data[22], data[23]]), 2);
        assert_eq!(
            u32::from_le_bytes([data[24], data[25], data[26], data[27]]),
            24000
        );
        assert_eq!(data.len(), 44 + 10 * 4);
    }

    #[test]
    fn test_quantize_clips() {
        assert_eq!(quantize16(2.0), 32767);
        assert_eq!(quantize16(-2.0), -32767);
        assert_eq!(quantize16(0.0), 0);
    }

    #[test]
    fn test_stereo_duplicates_channels() {
        let pcm = samples_to_pcm16(&[0.5], 2);
        assert_eq!(pcm.len(), 4);
        assert_eq!(pcm[0..2], pcm[2..4]);
    }

    #[test]
    fn test_hash_is_deterministic() {
        let samples: Vec<f64> = (0..100).map(|i| (i as f64 * 0.1).sin()).collect();
        let a = WavResult::stereo(&samples, 22050);
        let b = WavResult::stereo(&samples, 22050);
        assert_eq!(a.pcm_hash, b.pcm_hash);
        assert_eq!(a.wav_data, b.wav_data);
        assert_ne!(a.pcm_hash, WavResult::mono(&samples, 22050).pcm_hash);
    }
}
