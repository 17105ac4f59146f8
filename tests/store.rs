//! Catalog Store Integration Tests
//!
//! Tests for reloading the live catalog and what readers observe.

use std::fs;

use emotes::library::CatalogStore;
use tempfile::TempDir;

fn write_emote(root: &std::path::Path, provider: &str, channel: &str, file: &str) {
    let dir = root.join(provider).join(channel);
    fs::create_dir_all(&dir).unwrap();
    fs::write(dir.join(file), b"image").unwrap();
}

#[test]
fn test_reload_picks_up_new_files() {
    let temp = TempDir::new().unwrap();
    write_emote(temp.path(), "twitch", "alice", "pog.png");

    let store = CatalogStore::new(temp.path());
    let reader = store.reader();
    store.load().unwrap();
    assert_eq!(reader.current().len(), 1);

    write_emote(temp.path(), "twitch", "bob", "wave.gif");
    store.load().unwrap();

    let current = reader.current();
    assert_eq!(current.len(), 2);
    assert!(current.get("twitch", "bob", "wave").is_some());
}

#[test]
fn test_failed_reload_keeps_previous_catalog() {
    let temp = TempDir::new().unwrap();
    let root = temp.path().join("emotes");
    write_emote(&root, "twitch", "alice", "pog.png");

    let store = CatalogStore::new(&root);
    let reader = store.reader();
    store.load().unwrap();

    fs::remove_dir_all(&root).unwrap();
    let err = store.load().unwrap_err();

    assert!(err.to_string().contains("could not open emote directory"));
    assert!(reader.current().get("twitch", "alice", "pog").is_some());
}

#[test]
fn test_snapshot_survives_reload() {
    let temp = TempDir::new().unwrap();
    write_emote(temp.path(), "twitch", "alice", "pog.png");

    let store = CatalogStore::new(temp.path());
    store.load().unwrap();
    let snapshot = store.current();

    fs::remove_file(temp.path().join("twitch").join("alice").join("pog.png")).unwrap();
    store.load().unwrap();

    assert_eq!(snapshot.len(), 1);
    assert!(store.current().is_empty());
}

#[test]
fn test_readers_share_one_slot() {
    let temp = TempDir::new().unwrap();
    write_emote(temp.path(), "twitch", "alice", "pog.png");

    let store = CatalogStore::new(temp.path());
    let first = store.reader();
    let second = first.clone();

    store.load().unwrap();

    assert_eq!(first.current(), second.current());
    assert_eq!(store.root(), temp.path());
}
