//! End-to-end archive tests through the public library API

use chrono::{Duration, Utc};
use tempfile::TempDir;

use lumina::archive::{ArchiveExporter, ArchiveImporter, ArchiveInfo};
use lumina::config::paths::LuminaPaths;
use lumina::config::DayBoundary;
use lumina::models::{JournalEntry, MediaKind};
use lumina::services::{calculate_streak, JournalService};
use lumina::storage::Storage;

fn storage_in(dir: &TempDir) -> Storage {
    Storage::new(LuminaPaths::with_base_dir(dir.path().to_path_buf())).unwrap()
}

#[test]
fn full_journal_survives_export_and_import() {
    let source_dir = TempDir::new().unwrap();
    let source = storage_in(&source_dir);
    let journal = JournalService::new(&source);

    let first = journal.create_entry("Painted the fence").unwrap();
    journal
        .attach_media(&first.id, MediaKind::Drawing, "image/png", b"fence sketch")
        .unwrap();
    journal
        .set_positive_reflection(&first.id, "Small steps", Some(&b"sunrise"[..]))
        .unwrap();
    journal.add_todo(&first.id, "buy more paint").unwrap();

    let second = journal.create_entry("Podcast walk").unwrap();
    journal
        .attach_external_media(&second.id, MediaKind::Audio, "audio/mpeg", "https://pod.example/ep1")
        .unwrap();

    let path = source_dir.path().join("journal.tar.gz");
    let export = ArchiveExporter::new(&source).export_to_file(&path).unwrap();
    assert_eq!(export.entry_count, 2);
    assert_eq!(export.media_written, 2);

    let info = ArchiveInfo::inspect_file(&path).unwrap();
    assert!(info.is_complete());
    assert_eq!(info.media_count, 2);

    let target_dir = TempDir::new().unwrap();
    let target = storage_in(&target_dir);
    assert!(ArchiveImporter::new(&target).import_file(&path));

    let mut restored = target.entries.get_all().unwrap();
    let mut original = source.entries.get_all().unwrap();
    restored.sort_by(|a, b| a.id.as_str().cmp(b.id.as_str()));
    original.sort_by(|a, b| a.id.as_str().cmp(b.id.as_str()));
    assert_eq!(restored, original);

    for entry in &restored {
        for blob in entry.blob_refs() {
            assert_eq!(
                target.blobs().get(blob).unwrap(),
                source.blobs().get(blob).unwrap()
            );
        }
    }
}

#[test]
fn import_replaces_existing_entries() {
    let source_dir = TempDir::new().unwrap();
    let source = storage_in(&source_dir);
    source.entries.save_entry(JournalEntry::new("from archive")).unwrap();
    let (bytes, _) = ArchiveExporter::new(&source).export_to_bytes().unwrap();

    let target_dir = TempDir::new().unwrap();
    let target = storage_in(&target_dir);
    target.entries.save_entry(JournalEntry::new("local one")).unwrap();
    target.entries.save_entry(JournalEntry::new("local two")).unwrap();

    assert!(ArchiveImporter::new(&target).import(bytes.as_slice()));

    let contents: Vec<String> = target
        .entries
        .get_all()
        .unwrap()
        .into_iter()
        .map(|e| e.content)
        .collect();
    assert_eq!(contents, vec!["from archive"]);
}

#[test]
fn corrupt_entry_slot_reads_as_empty() {
    let dir = TempDir::new().unwrap();
    let storage = storage_in(&dir);

    std::fs::write(storage.paths().entries_file(), "definitely { not json").unwrap();

    assert!(storage.entries.get_all().unwrap().is_empty());
    let (_, summary) = ArchiveExporter::new(&storage).export_to_bytes().unwrap();
    assert_eq!(summary.entry_count, 0);
}

#[test]
fn streak_survives_round_trip() {
    let source_dir = TempDir::new().unwrap();
    let source = storage_in(&source_dir);
    let now = Utc::now();
    for days in 0..3 {
        source
            .entries
            .save_entry(JournalEntry::with_created_at("daily", now - Duration::days(days)))
            .unwrap();
    }
    let (bytes, _) = ArchiveExporter::new(&source).export_to_bytes().unwrap();

    let target_dir = TempDir::new().unwrap();
    let target = storage_in(&target_dir);
    assert!(ArchiveImporter::new(&target).import(bytes.as_slice()));

    let before = calculate_streak(&source.entries.get_all().unwrap(), &now, DayBoundary::Calendar);
    let after = calculate_streak(&target.entries.get_all().unwrap(), &now, DayBoundary::Calendar);
    assert_eq!(before, 3);
    assert_eq!(after, before);
}
