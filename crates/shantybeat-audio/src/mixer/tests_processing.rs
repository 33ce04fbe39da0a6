//! Tests for gain conversion, looping and fades.

use super::*;

#[test]
fn test_gain_db_round_trip() {
    assert_eq!(gain_to_db(1.0), 0.0);
    assert!((gain_to_db(0.4) - (-7.9588)).abs() < 1e-3);
    assert!((db_to_gain(gain_to_db(0.4)) - 0.4).abs() < 1e-12);
}

#[test]
fn test_non_positive_gain_is_silence_floor() {
    assert_eq!(gain_to_db(0.0), SILENCE_DB);
    assert_eq!(gain_to_db(-1.0), SILENCE_DB);
    assert!((db_to_gain(SILENCE_DB) - 0.001).abs() < 1e-12);
}

#[test]
fn test_loop_to_length_repeats_whole_buffer() {
    let looped = loop_to_length(&[1.0, 2.0, 3.0], 8);
    assert_eq!(looped, vec![1.0, 2.0, 3.0, 1.0, 2.0, 3.0, 1.0, 2.0]);
}

#[test]
fn test_loop_to_length_truncates() {
    assert_eq!(loop_to_length(&[1.0, 2.0, 3.0], 2), vec![1.0, 2.0]);
    assert_eq!(loop_to_length(&[], 3), vec![0.0; 3]);
}

#[test]
fn test_fade_out_reaches_zero() {
    let mut samples = vec![1.0; 10];
    fade_out(&mut samples, 4);
    assert_eq!(&samples[..6], &[1.0; 6]);
    assert_eq!(samples[6], 0.75);
    assert_eq!(samples[9], 0.0);
}

#[test]
fn test_fade_out_skipped_when_too_long() {
    let mut samples = vec![1.0; 4];
    fade_out(&mut samples, 4);
    assert_eq!(samples, vec![1.0; 4]);
}
