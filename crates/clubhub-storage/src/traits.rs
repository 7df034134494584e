//! Storage abstraction trait
//!
//! This module defines the Storage trait that all storage backends must implement.

use std::sync::Arc;

use crate::StorageBackend;
use async_trait::async_trait;
use bytes::Bytes;
use thiserror::Error;

/// Storage operation errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Upload failed: {0}")]
    UploadFailed(String),

    #[error("Delete failed: {0}")]
    DeleteFailed(String),

    #[error("File not found: {0}")]
    NotFound(String),

    #[error("Invalid storage key: {0}")]
    InvalidKey(String),

    #[error("Storage unreachable: {0}")]
    Transport(String),

    #[error("Storage backend error: {0}")]
    BackendError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Progress callback receiving a percentage in `0.0..=100.0`.
pub type ProgressFn = Arc<dyn Fn(f64) + Send + Sync>;

/// Report `sent` of `total` bytes as a percentage.
pub fn report_progress(progress: &ProgressFn, sent: usize, total: usize) {
    let percent = if total == 0 {
        100.0
    } else {
        (sent as f64 / total as f64 * 100.0).clamp(0.0, 100.0)
    };
    progress(percent);
}

/// Storage abstraction trait
///
/// All storage backends (S3, local filesystem) must implement this trait, so the
/// upload and delete clients never couple to a provider.
///
/// **Key format:** see the crate root documentation.
#[async_trait]
pub trait Storage: Send + Sync {
    /// Store `data` under `storage_key` and return its public URL.
    ///
    /// `progress` is called with non-decreasing percentages while bytes are written,
    /// and with `100.0` exactly once after the object is durable.
    async fn upload(
        &self,
        storage_key: &str,
        content_type: &str,
        data: Bytes,
        progress: ProgressFn,
    ) -> StorageResult<String>;

    /// Delete an object by its storage key
    async fn delete(&self, storage_key: &str) -> StorageResult<()>;

    /// Check if an object exists
    async fn exists(&self, storage_key: &str) -> StorageResult<bool>;

    /// Public URL an object with this key is served from
    fn public_url(&self, storage_key: &str) -> String;

    /// Inverse of `public_url`: the key behind a URL this backend produced.
    ///
    /// Returns `None` for URLs that do not belong to this backend.
    fn key_from_url(&self, url: &str) -> Option<String>;

    /// Get the storage backend type
    fn backend_type(&self) -> StorageBackend;
}

/// Strip `base` from `url` and decode the remaining object key.
pub(crate) fn key_under_base(base: &str, url: &str) -> Option<String> {
    let base = base.trim_end_matches('/');
    let rest = url.strip_prefix(base)?.strip_prefix('/')?;
    let rest = rest.split(['?', '#']).next().unwrap_or(rest);
    if rest.is_empty() {
        return None;
    }
    urlencoding::decode(rest).ok().map(|key| key.into_owned())
}
