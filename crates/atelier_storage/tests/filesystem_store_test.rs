//! Tests for the filesystem byte store backend.

use atelier_storage::{content_hash, AssetPaths, ByteStore, FileSystemStore};
use tempfile::TempDir;
use uuid::Uuid;

#[tokio::test]
async fn test_write_and_read() {
    let temp_dir = TempDir::new().unwrap();
    let store = FileSystemStore::new(temp_dir.path()).unwrap();
    let paths = AssetPaths::new(Uuid::new_v4(), Uuid::new_v4());

    let data = b"Hello, world!";
    let path = paths.original("png");

    store.write(&path, data).await.unwrap();
    let retrieved = store.read(&path).await.unwrap();
    assert_eq!(retrieved, data);
}

#[tokio::test]
async fn test_write_creates_nested_directories() {
    let temp_dir = TempDir::new().unwrap();
    let store = FileSystemStore::new(temp_dir.path()).unwrap();
    let paths = AssetPaths::new(Uuid::new_v4(), Uuid::new_v4());

    store.write(&paths.thumbnail("jpg"), b"thumb").await.unwrap();

    let on_disk = temp_dir.path().join(paths.thumbnail("jpg"));
    assert!(on_disk.exists());
}

#[tokio::test]
async fn test_overwrite_replaces_content() {
    let temp_dir = TempDir::new().unwrap();
    let store = FileSystemStore::new(temp_dir.path()).unwrap();
    let paths = AssetPaths::new(Uuid::new_v4(), Uuid::new_v4());
    let path = paths.preview("jpg");

    store.write(&path, b"first").await.unwrap();
    store.write(&path, b"second").await.unwrap();

    assert_eq!(store.read(&path).await.unwrap(), b"second");
}

#[tokio::test]
async fn test_read_missing_is_not_found() {
    let temp_dir = TempDir::new().unwrap();
    let store = FileSystemStore::new(temp_dir.path()).unwrap();

    let result = store.read("missing/asset/original.png").await;
    assert!(result.is_err());
    assert!(matches!(
        result.unwrap_err().kind(),
        atelier_error::AtelierErrorKind::Storage(_)
    ));
}

#[tokio::test]
async fn test_delete_removes_object() {
    let temp_dir = TempDir::new().unwrap();
    let store = FileSystemStore::new(temp_dir.path()).unwrap();
    let paths = AssetPaths::new(Uuid::new_v4(), Uuid::new_v4());
    let path = paths.original("mp3");

    store.write(&path, b"Delete me").await.unwrap();
    assert!(store.exists(&path).await.unwrap());

    store.delete(&path).await.unwrap();
    assert!(!store.exists(&path).await.unwrap());
}

#[tokio::test]
async fn test_traversal_paths_are_rejected() {
    let temp_dir = TempDir::new().unwrap();
    let store = FileSystemStore::new(temp_dir.path()).unwrap();

    assert!(store.write("../escape.bin", b"x").await.is_err());
    assert!(store.read("/etc/passwd").await.is_err());
    assert!(store.delete("a/../../b").await.is_err());
}

#[tokio::test]
async fn test_no_temp_file_left_behind() {
    let temp_dir = TempDir::new().unwrap();
    let store = FileSystemStore::new(temp_dir.path()).unwrap();
    let paths = AssetPaths::new(Uuid::new_v4(), Uuid::new_v4());
    let path = paths.original("bin");

    store.write(&path, b"payload").await.unwrap();

    let dir = temp_dir.path().join(paths.prefix());
    let leftovers: Vec<_> = std::fs::read_dir(&dir)
        .unwrap()
        .filter_map(|e| e.ok())
        .filter(|e| e.path().extension().is_some_and(|ext| ext == "tmp"))
        .collect();
    assert!(leftovers.is_empty());
}

#[test]
fn test_content_hash_matches_known_digest() {
    // sha256 of the empty string
    assert_eq!(
        content_hash(b""),
        "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
    );
}
