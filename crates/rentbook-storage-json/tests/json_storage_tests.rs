use std::fs;

use rentbook_core::{PropertyStorage, RoomService};
use rentbook_domain::PropertyBook;
use rentbook_storage_json::{JsonBookStorage, StoragePaths};
use rust_decimal_macros::dec;
use tempfile::tempdir;

fn storage_in(dir: &std::path::Path, retention: usize) -> JsonBookStorage {
    JsonBookStorage::with_retention(StoragePaths::under(dir), retention).expect("create storage")
}

#[test]
fn json_storage_can_save_and_load_book() {
    let dir = tempdir().expect("tempdir");
    let storage = storage_in(dir.path(), 5);

    let mut book = PropertyBook::new("Sharma Niwas");
    RoomService::add(&mut book, 101, dec!(12000), dec!(500)).expect("room");
    storage.save_book("sharma", &book).expect("save book");

    assert!(storage.book_exists("sharma"));
    let loaded = storage.load_book("sharma").expect("load book");
    assert_eq!(loaded.name, "Sharma Niwas");
    assert_eq!(loaded.rooms.len(), 1);
    assert_eq!(loaded.rooms[0].rent, dec!(12000));
    assert_eq!(loaded.logs.len(), 1);

    let path = storage.book_path("sharma");
    assert!(path.exists());
    assert!(!path.with_extension("json.tmp").exists());
    assert_eq!(storage.list_books().expect("list"), vec!["sharma".to_string()]);
}

#[test]
fn missing_book_is_a_storage_error() {
    let dir = tempdir().expect("tempdir");
    let storage = storage_in(dir.path(), 5);
    assert!(!storage.book_exists("nowhere"));
    let err = storage.load_book("nowhere").expect_err("missing");
    assert!(err.to_string().contains("nowhere"));
}

#[test]
fn overwriting_keeps_a_bounded_number_of_backups() {
    let dir = tempdir().expect("tempdir");
    let storage = storage_in(dir.path(), 3);
    let mut book = PropertyBook::new("Rotating");

    for number in 1..=6 {
        RoomService::add(&mut book, number, dec!(1000), dec!(100)).expect("room");
        storage.save_book("rotating", &book).expect("save");
    }

    let backups = storage.list_backups("rotating").expect("list backups");
    assert_eq!(backups.len(), 3);
    let newest = storage.restore_backup(&backups[0]).expect("restore newest");
    assert_eq!(newest.rooms.len(), 5);
}

#[test]
fn explicit_backups_restore_the_snapshot() {
    let dir = tempdir().expect("tempdir");
    let storage = storage_in(dir.path(), 5);

    let mut book = PropertyBook::new("Snapshot");
    RoomService::add(&mut book, 101, dec!(12000), dec!(500)).expect("room");
    storage.save_book("snapshot", &book).expect("save");
    let info = storage
        .backup_book("snapshot", &book, Some("Before changes"))
        .expect("backup");
    assert!(info.id.ends_with("_before-changes.json"));

    RoomService::add(&mut book, 102, dec!(14000), dec!(600)).expect("room");
    storage.save_book("snapshot", &book).expect("save again");

    let listed = storage.list_backups("snapshot").expect("list");
    assert!(listed.iter().any(|entry| entry.id == info.id));

    let restored = storage.restore_backup(&info).expect("restore");
    assert_eq!(restored.rooms.len(), 1);
    assert_eq!(storage.load_book("snapshot").expect("reload").rooms.len(), 1);

    let metadata = storage.list_backup_metadata("snapshot").expect("metadata");
    assert!(metadata.iter().all(|entry| entry.size_bytes > 0));
}

#[test]
fn corrupt_files_surface_serde_errors() {
    let dir = tempdir().expect("tempdir");
    let storage = storage_in(dir.path(), 5);
    fs::write(storage.book_path("broken"), "{ not json").expect("write");
    let err = storage.load_book("broken").expect_err("corrupt");
    assert!(err.to_string().starts_with("Serialization error"));
}
