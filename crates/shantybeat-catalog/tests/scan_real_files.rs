//! Scanning real WAV files with the onset tempo analyzer.

use std::fs;
use std::path::Path;

use pretty_assertions::assert_eq;
use shantybeat_catalog::{
    scan_directory, BeatAnalyzer, Catalog, SharedCatalog, TempoAnalyzer, CATALOG_FILE_NAME,
};

const SAMPLE_RATE: u32 = 22_050;

/// Writes a 16-bit click track with one click every `period` samples.
fn write_clicks(path: &Path, period: usize, clicks: usize) {
    let spec = hound::WavSpec {
        channels: 1,
        sample_rate: SAMPLE_RATE,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };
    let mut writer = hound::WavWriter::create(path, spec).unwrap();
    for n in 0..period * clicks {
        let i = n % period;
        let value = if i < 64 {
            let sign = if i % 2 == 0 { 1.0 } else { -1.0 };
            (-(i as f64) / 8.0).exp() * sign
        } else {
            0.0
        };
        writer.write_sample((value * 30_000.0) as i16).unwrap();
    }
    writer.finalize().unwrap();
}

fn expected_bpm(hops: usize) -> f64 {
    60.0 * (SAMPLE_RATE as f64 / 512.0) / hops as f64
}

#[test]
fn scanned_beats_carry_measured_tempo_and_length() {
    let dir = tempfile::tempdir().unwrap();
    let genre = dir.path().join("pirate-shanty");
    fs::create_dir_all(&genre).unwrap();
    write_clicks(&genre.join("steady.wav"), 22 * 512, 24);
    fs::write(genre.join("broken.wav"), b"RIFF but not really").unwrap();

    let mut catalog = Catalog::new();
    let report = scan_directory(dir.path(), &mut catalog, &TempoAnalyzer::default()).unwrap();
    assert_eq!(report.added, 1);
    assert_eq!(report.failed, 1);

    let entry = &catalog.entries("pirate-shanty")[0];
    assert_eq!(entry.filename, "steady.wav");
    assert!(
        (entry.bpm - expected_bpm(22)).abs() < 3.0,
        "bpm {} expected {}",
        entry.bpm,
        expected_bpm(22)
    );
    let seconds = (22 * 512 * 24) as f64 / SAMPLE_RATE as f64;
    assert!((entry.duration - seconds).abs() < 1e-6);
}

#[test]
fn catalog_file_survives_restart() {
    let dir = tempfile::tempdir().unwrap();
    let genre = dir.path().join("sea-songs");
    fs::create_dir_all(&genre).unwrap();
    write_clicks(&genre.join("a.wav"), 20 * 512, 20);
    write_clicks(&genre.join("b.wav"), 26 * 512, 16);
    let catalog_path = dir.path().join(CATALOG_FILE_NAME);

    let shared = SharedCatalog::load(&catalog_path).unwrap();
    let analyzer = TempoAnalyzer::default();
    let first = shared.rescan(dir.path(), &analyzer, false).unwrap();
    assert_eq!(first.added, 2);
    shared.save(&catalog_path).unwrap();

    let reopened = SharedCatalog::load(&catalog_path).unwrap();
    assert_eq!(reopened.snapshot(), shared.snapshot());
    let second = reopened.rescan(dir.path(), &analyzer, false).unwrap();
    assert_eq!(second.added, 0);
    assert_eq!(second.skipped, 2);
    assert_eq!(reopened.snapshot(), shared.snapshot());

    let duration = analyzer.duration(&genre.join("a.wav")).unwrap();
    assert!((duration - (20 * 512 * 20) as f64 / SAMPLE_RATE as f64).abs() < 1e-6);
}
