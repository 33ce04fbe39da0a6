//! Tests for the mix request.

use super::*;
use crate::buffer::AudioBuffer;
use crate::error::AudioError;

fn ramp(len: usize, sample_rate: u32) -> AudioBuffer {
    AudioBuffer::new((0..len).map(|i| i as f64 / len as f64).collect(), sample_rate)
}

#[test]
fn test_output_length_equals_vocal_length() {
    for (vocal_len, inst_len) in [(100, 30), (100, 100), (100, 250), (7, 1)] {
        let vocal = AudioBuffer::new(vec![0.1; vocal_len], 8000);
        let out = mix(vocal, ramp(inst_len, 8000), 1.0, 0.4).unwrap();
        assert_eq!(out.len(), vocal_len, "instrumental of {}", inst_len);
        assert_eq!(out.sample_rate, 8000);
    }
}

#[test]
fn test_looping_repeats_exactly() {
    let length = 37;
    let instrumental = ramp(length, 8000);
    let vocal = AudioBuffer::zeros(length * 2 + 5, 8000);
    let out = mix(vocal, instrumental.clone(), 1.0, 1.0).unwrap();

    for i in 0..length {
        assert_eq!(out.samples[i], instrumental.samples[i]);
        assert_eq!(out.samples[length + i], instrumental.samples[i]);
    }
}

#[test]
fn test_gains_applied_in_db() {
    let vocal = AudioBuffer::new(vec![0.5; 10], 8000);
    let instrumental = AudioBuffer::new(vec![0.5; 10], 8000);
    let out = mix(vocal, instrumental, 1.0, 0.4).unwrap();
    assert!((out.samples[0] - (0.5 + 0.2)).abs() < 1e-12);
}

#[test]
fn test_zero_gain_floors_at_minus_sixty_db() {
    let vocal = AudioBuffer::zeros(10, 8000);
    let instrumental = AudioBuffer::new(vec![1.0; 10], 8000);
    let out = mix(vocal, instrumental, 1.0, 0.0).unwrap();
    assert!((out.samples[0] - 0.001).abs() < 1e-12);
}

#[test]
fn test_empty_vocal_gives_empty_output() {
    let out = mix(AudioBuffer::zeros(0, 8000), ramp(10, 8000), 1.0, 0.4).unwrap();
    assert!(out.is_empty());
}

#[test]
fn test_empty_instrumental_is_rejected() {
    let err = mix(ramp(10, 8000), AudioBuffer::zeros(0, 8000), 1.0, 0.4).unwrap_err();
    assert!(matches!(err, AudioError::InvalidParameter { .. }));
}

#[test]
fn test_instrumental_resampled_to_vocal_rate() {
    let vocal = AudioBuffer::zeros(1000, 8000);
    let instrumental = AudioBuffer::new(vec![0.5; 2000], 16000);
    let out = MixRequest::new(vocal, instrumental)
        .instrumental_gain(1.0)
        .mix()
        .unwrap();
    assert_eq!(out.sample_rate, 8000);
    assert_eq!(out.len(), 1000);
    assert!(out.samples.iter().all(|s| (s - 0.5).abs() < 1e-12));
}

#[test]
fn test_fade_out_silences_tail() {
    let vocal = AudioBuffer::zeros(8000, 8000);
    let instrumental = AudioBuffer::new(vec![1.0; 8000], 8000);
    let out = MixRequest::new(vocal, instrumental)
        .instrumental_gain(1.0)
        .fade_out(0.25)
        .mix()
        .unwrap();
    assert_eq!(out.samples[0], 1.0);
    assert_eq!(out.samples[5999], 1.0);
    assert!(out.samples[7000] < 0.6);
    assert_eq!(out.samples[7999], 0.0);
}

#[test]
fn test_non_finite_gain_rejected() {
    let result = MixRequest::new(ramp(10, 8000), ramp(10, 8000))
        .vocal_gain(f64::NAN)
        .mix();
    assert!(result.is_err());
}
