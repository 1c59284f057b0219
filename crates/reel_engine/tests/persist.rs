use std::fs;

use pretty_assertions::assert_eq;
use reel_core::{
    load_user_collections, CollectionManager, DragItem, KeyValueStore, VideoRef, COLLECTIONS_KEY,
};
use reel_engine::{ensure_output_dir, AtomicFileWriter, FileStore};
use tempfile::TempDir;

#[test]
fn creates_missing_output_dir() {
    let temp = TempDir::new().unwrap();
    let new_dir = temp.path().join("downloads").join("nested");
    assert!(!new_dir.exists());
    ensure_output_dir(&new_dir).unwrap();
    assert!(new_dir.is_dir());
}

#[test]
fn atomic_write_replaces_existing() {
    let temp = TempDir::new().unwrap();
    let writer = AtomicFileWriter::new(temp.path().to_path_buf());

    let first = writer.write("clip.mp4", b"first").unwrap();
    assert_eq!(first.file_name().unwrap(), "clip.mp4");
    assert_eq!(fs::read(&first).unwrap(), b"first");

    let second = writer.write("clip.mp4", b"second").unwrap();
    assert_eq!(first, second);
    assert_eq!(fs::read(&second).unwrap(), b"second");
    // Only the target remains; the temp file was renamed into place.
    assert_eq!(fs::read_dir(temp.path()).unwrap().count(), 1);
}

#[test]
fn no_partial_file_when_dir_is_a_file() {
    let temp = TempDir::new().unwrap();
    let file_path = temp.path().join("not_a_dir");
    fs::write(&file_path, "x").unwrap();

    let writer = AtomicFileWriter::new(file_path.clone());
    assert!(writer.write("clip.mp4", "data").is_err());
    assert!(!file_path.with_file_name("clip.mp4").exists());
}

#[test]
fn file_store_reads_back_what_it_wrote() {
    let temp = TempDir::new().unwrap();
    let mut store = FileStore::open(temp.path().join("state")).unwrap();

    assert_eq!(store.get("userId").unwrap(), None);
    store.set("userId", "\"user-7\"").unwrap();
    assert_eq!(store.get("userId").unwrap().as_deref(), Some("\"user-7\""));
    assert!(store.path_for("userId").ends_with("userId.json"));

    store.set("userId", "\"user-8\"").unwrap();
    assert_eq!(store.get("userId").unwrap().as_deref(), Some("\"user-8\""));
}

#[test]
fn file_store_keys_are_sanitized() {
    let temp = TempDir::new().unwrap();
    let mut store = FileStore::open(temp.path()).unwrap();

    store.set("a/b:c", "1").unwrap();
    let path = store.path_for("a/b:c");
    assert_eq!(path.parent(), Some(temp.path()));
    assert_eq!(fs::read_to_string(path).unwrap(), "1");
}

#[test]
fn collections_survive_a_restart_through_file_store() {
    let temp = TempDir::new().unwrap();
    let media = vec![
        VideoRef::new("https://cdn.example.com/a.mp4", "Promo"),
        VideoRef::new("https://cdn.example.com/b.mp4", "Teaser"),
    ];

    {
        let store = FileStore::open(temp.path()).unwrap();
        let mut manager = CollectionManager::new(store, media.clone());
        assert!(manager.create_collection("Favorites"));
        assert!(manager.move_into(&DragItem::from_video(media[1].clone()), "Favorites"));
    }

    let store = FileStore::open(temp.path()).unwrap();
    let stored = store.get(COLLECTIONS_KEY).unwrap().unwrap();
    assert!(!stored.contains("All Videos"));

    let loaded = load_user_collections(&store).unwrap();
    assert_eq!(loaded.get("Favorites"), Some(&vec![media[1].clone()]));

    let manager = CollectionManager::new(store, media.clone());
    assert_eq!(manager.collection("Favorites"), Some(&media[1..]));
}
