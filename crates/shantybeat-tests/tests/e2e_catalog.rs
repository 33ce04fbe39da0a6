//! Catalog scenarios on real WAV files: scan, persist, match.

use std::fs;

use pretty_assertions::assert_eq;
use shantybeat_catalog::{Catalog, CatalogEntry, SharedCatalog, TempoAnalyzer};
use shantybeat_cli::commands;
use shantybeat_tests::BeatLibraryFixture;

/// Tempo whose beat period is exactly `hops` analysis frames at 16 kHz.
fn hop_aligned_bpm(hops: usize) -> f64 {
    60.0 * 16_000.0 / (hops * 512) as f64
}

fn three_beat_library() -> BeatLibraryFixture {
    let fixture = BeatLibraryFixture::new();
    fixture.add_beat("pirate-shanty", "a_slow.wav", hop_aligned_bpm(24), 12.0);
    fixture.add_beat("pirate-shanty", "b_mid.wav", hop_aligned_bpm(18), 12.0);
    fixture.add_beat("pirate-shanty", "c_fast.wav", hop_aligned_bpm(12), 12.0);
    fixture
}

#[test]
fn scanned_tempos_drive_matching() {
    let fixture = three_beat_library();
    let shared = SharedCatalog::default();
    let report = shared
        .rescan(&fixture.beats_dir(), &TempoAnalyzer::default(), false)
        .unwrap();
    assert_eq!(report.added, 3);
    assert_eq!(report.failed, 0);

    let catalog = shared.snapshot();
    for (entry, hops) in catalog.entries("pirate-shanty").iter().zip([24, 18, 12]) {
        let expected = hop_aligned_bpm(hops);
        assert!(
            (entry.bpm - expected).abs() < 3.0,
            "{} measured {} expected {}",
            entry.filename,
            entry.bpm,
            expected
        );
        assert!((entry.duration - 12.0).abs() < 1e-6);
    }

    let found = shared.find_closest(97.0, "pirate-shanty", 15.0).unwrap();
    assert_eq!(found.filename, "b_mid.wav");
    assert!(shared.find_closest(97.0, "pirate-shanty", 2.0).is_none());
}

#[test]
fn scan_command_is_idempotent_on_disk() {
    let fixture = three_beat_library();
    let config = fixture.config();

    commands::scan::run(&config, false, true).unwrap();
    let first = fs::read(config.catalog_path()).unwrap();
    commands::scan::run(&config, false, true).unwrap();
    let second = fs::read(config.catalog_path()).unwrap();

    assert_eq!(first, second);
    let catalog = Catalog::load(&config.catalog_path()).unwrap();
    assert_eq!(catalog.total_entries(), 3);
}

#[test]
fn scan_command_creates_default_genre() {
    let fixture = BeatLibraryFixture::new();
    let config = fixture.config();
    commands::scan::run(&config, false, true).unwrap();

    assert!(fixture.beats_dir().join("pirate-shanty").is_dir());
    let catalog = Catalog::load(&config.catalog_path()).unwrap();
    assert!(catalog.has_genre("pirate-shanty"));
    assert_eq!(catalog.total_entries(), 0);
}

#[test]
fn add_command_lists_beat_with_measured_length() {
    let fixture = BeatLibraryFixture::new();
    let config = fixture.config();
    let path = fixture.add_beat("incoming", "found.wav", 100.0, 2.5);

    commands::add::run(&config, path.to_str().unwrap(), "sea-songs", 101.0).unwrap();
    let catalog = Catalog::load(&config.catalog_path()).unwrap();
    let entry = &catalog.entries("sea-songs")[0];
    assert_eq!(entry.filename, "found.wav");
    assert_eq!(entry.bpm, 101.0);
    assert!((entry.duration - 2.5).abs() < 1e-6);
}

#[test]
fn catalog_document_keeps_order_across_save_and_load() {
    let fixture = BeatLibraryFixture::new();
    let path = fixture.beats_dir().join("catalog.json");

    let mut catalog = Catalog::new();
    for (genre, name, bpm) in [
        ("zulu", "z2.wav", 100.0),
        ("alpha", "a1.wav", 96.0),
        ("zulu", "z1.wav", 104.0),
        ("mike", "m1.wav", 92.0),
    ] {
        let entry = CatalogEntry::new(fixture.beats_dir().join(genre).join(name), bpm, 8.0).unwrap();
        catalog.insert(genre, entry).unwrap();
    }
    catalog.save(&path).unwrap();

    let text = fs::read_to_string(&path).unwrap();
    let zulu = text.find("\"zulu\"").unwrap();
    let alpha = text.find("\"alpha\"").unwrap();
    let mike = text.find("\"mike\"").unwrap();
    assert!(zulu < alpha && alpha < mike);

    let loaded = Catalog::load(&path).unwrap();
    assert_eq!(loaded, catalog);
    let zulu_names: Vec<_> = loaded.entries("zulu").iter().map(|e| e.filename.clone()).collect();
    assert_eq!(zulu_names, vec!["z2.wav".to_string(), "z1.wav".to_string()]);
}

#[test]
fn corrupt_catalog_is_reported() {
    let fixture = BeatLibraryFixture::new();
    let config = fixture.config();
    fs::write(config.catalog_path(), "{ \"pirate-shanty\": [ {").unwrap();

    let err = commands::list::run(&config, true).unwrap_err();
    assert!(format!("{:#}", err).contains("catalog"));
}
