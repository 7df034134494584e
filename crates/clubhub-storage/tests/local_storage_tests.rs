use std::sync::{Arc, Mutex};

use bytes::Bytes;
use clubhub_core::AssetFolder;
use clubhub_storage::{generate_object_key, LocalStorage, ProgressFn, Storage, StorageError};

fn recorder() -> (ProgressFn, Arc<Mutex<Vec<f64>>>) {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = seen.clone();
    let progress: ProgressFn = Arc::new(move |p| sink.lock().unwrap().push(p));
    (progress, seen)
}

async fn storage(dir: &tempfile::TempDir) -> LocalStorage {
    LocalStorage::new(dir.path(), "http://localhost:8080/assets/".to_string())
        .await
        .unwrap()
        .with_chunk_size(4)
}

#[tokio::test]
async fn upload_reports_chunked_progress_and_serves_url() {
    let dir = tempfile::tempdir().unwrap();
    let storage = storage(&dir).await;
    let key = generate_object_key(AssetFolder::Events, "hack night", Some("png"));
    let (progress, seen) = recorder();

    let url = storage
        .upload(&key, "image/png", Bytes::from_static(b"0123456789"), progress)
        .await
        .unwrap();

    assert_eq!(url, format!("http://localhost:8080/assets/{}", key));
    let seen = seen.lock().unwrap().clone();
    assert_eq!(seen, vec![0.0, 40.0, 80.0, 100.0]);
    assert_eq!(seen.iter().filter(|p| **p == 100.0).count(), 1);

    let on_disk = tokio::fs::read(dir.path().join(&key)).await.unwrap();
    assert_eq!(on_disk, b"0123456789");
    assert!(storage.exists(&key).await.unwrap());
}

#[tokio::test]
async fn delete_by_url_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let storage = storage(&dir).await;
    let key = generate_object_key(AssetFolder::Guests, "ada", Some("jpg"));
    let (progress, _) = recorder();
    let url = storage
        .upload(&key, "image/jpeg", Bytes::from_static(b"jpeg"), progress)
        .await
        .unwrap();

    let resolved = storage.key_from_url(&url).unwrap();
    assert_eq!(resolved, key);
    storage.delete(&resolved).await.unwrap();
    assert!(!storage.exists(&key).await.unwrap());

    let err = storage.delete(&resolved).await.unwrap_err();
    assert!(matches!(err, StorageError::NotFound(_)));
}

#[tokio::test]
async fn foreign_urls_and_traversal_are_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let storage = storage(&dir).await;

    assert_eq!(storage.key_from_url("https://elsewhere.org/events/a.png"), None);

    let (progress, seen) = recorder();
    let err = storage
        .upload("../escape.png", "image/png", Bytes::from_static(b"x"), progress)
        .await
        .unwrap_err();
    assert!(matches!(err, StorageError::InvalidKey(_)));
    assert!(seen.lock().unwrap().is_empty());
}
