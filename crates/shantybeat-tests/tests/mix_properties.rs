//! Length and looping properties of the mixer.

use shantybeat_audio::mixer::{db_to_gain, gain_to_db, loop_to_length};
use shantybeat_audio::{mix, stretch_to_tempo, AudioBuffer, MixRequest, StretchMethod};
use shantybeat_tests::{click_track, tone};

fn ramp(len: usize, sample_rate: u32) -> AudioBuffer {
    AudioBuffer::new((0..len).map(|i| i as f64 / len as f64).collect(), sample_rate)
}

#[test]
fn output_length_always_equals_vocal_length() {
    let cases = [
        (16_000, 16_000, 3_000),
        (16_000, 40_000, 3_000),
        (1, 5, 16_000),
        (48_000, 48_000, 16_000),
        (0, 100, 16_000),
    ];
    for (vocal_len, inst_len, inst_rate) in cases {
        let vocal = ramp(vocal_len, 16_000);
        let instrumental = ramp(inst_len, inst_rate);
        let out = mix(vocal, instrumental, 1.0, 0.4).unwrap();
        assert_eq!(out.len(), vocal_len, "vocal {} inst {}@{}", vocal_len, inst_len, inst_rate);
        assert_eq!(out.sample_rate, 16_000);
    }
}

#[test]
fn looped_instrumental_repeats_exactly() {
    let instrumental = ramp(1_000, 8_000).samples;
    let looped = loop_to_length(&instrumental, 2_500);
    assert_eq!(looped.len(), 2_500);
    for i in 0..2_000 {
        assert_eq!(looped[i], instrumental[i % 1_000], "sample {}", i);
    }
    assert_eq!(looped[2_499], instrumental[499]);
}

#[test]
fn mix_is_gain_weighted_sum_over_loops() {
    let vocal = tone(440.0, 0.5, 8_000);
    let instrumental = ramp(1_000, 8_000);
    let out = MixRequest::new(vocal.clone(), instrumental.clone())
        .vocal_gain(1.0)
        .instrumental_gain(0.4)
        .mix()
        .unwrap();

    let g = db_to_gain(gain_to_db(0.4));
    for i in 0..2_000 {
        let expected = vocal.samples[i] + g * instrumental.samples[i % 1_000];
        assert!((out.samples[i] - expected).abs() < 1e-12, "sample {}", i);
    }
}

#[test]
fn zero_gain_is_sixty_db_down() {
    let vocal = AudioBuffer::silent(0.1, 8_000);
    let instrumental = AudioBuffer::new(vec![1.0; 800], 8_000);
    let out = mix(vocal, instrumental, 1.0, 0.0).unwrap();
    assert!((out.peak() - 0.001).abs() < 1e-9);
}

#[test]
fn empty_instrumental_is_rejected() {
    let vocal = tone(440.0, 0.5, 8_000);
    assert!(mix(vocal, AudioBuffer::zeros(0, 8_000), 1.0, 0.4).is_err());
}

#[test]
fn stretched_beat_still_fits_vocal() {
    let vocal = tone(330.0, 5.0, 16_000);
    let beat = click_track(104.0, 3.0, 16_000);
    let stretched = stretch_to_tempo(&beat, 104.0, 97.0, StretchMethod::PhaseVocoder).unwrap();
    let out = MixRequest::new(vocal, stretched).fade_out(1.0).mix().unwrap();
    assert_eq!(out.len(), 80_000);
    assert!(out.samples.iter().all(|s| s.is_finite()));
}
