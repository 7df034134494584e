//! Upload and delete clients for form assets
//!
//! `AssetUploader` stores one local file and resolves with its public URL;
//! `AssetRemover` deletes a previously stored asset by URL. `StorageAssets`
//! implements both over any `Storage` backend and enforces the upload limits
//! before a single byte leaves the machine.

use std::fmt;
use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;
use clubhub_core::{AssetFolder, Config, LocalFile};
use clubhub_storage::{
    create_storage, generate_object_key, ProgressFn, Storage, StorageError, StorageResult,
};
use thiserror::Error;

/// Why an upload was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadErrorKind {
    NetworkError,
    SizeExceeded,
    UnsupportedType,
    StorageError,
}

impl UploadErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            UploadErrorKind::NetworkError => "network_error",
            UploadErrorKind::SizeExceeded => "size_exceeded",
            UploadErrorKind::UnsupportedType => "unsupported_type",
            UploadErrorKind::StorageError => "storage_error",
        }
    }
}

impl fmt::Display for UploadErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Error)]
#[error("Upload failed ({kind}): {message}")]
pub struct UploadError {
    pub kind: UploadErrorKind,
    pub message: String,
}

impl UploadError {
    pub fn new(kind: UploadErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

impl From<StorageError> for UploadError {
    fn from(err: StorageError) -> Self {
        let kind = match err {
            StorageError::Transport(_) => UploadErrorKind::NetworkError,
            _ => UploadErrorKind::StorageError,
        };
        UploadError::new(kind, err.to_string())
    }
}

/// One file waiting to be stored. Dropped once the upload resolves.
pub struct UploadTask {
    pub file: LocalFile,
    pub folder: AssetFolder,
    pub desired_name: String,
    pub progress: ProgressFn,
}

impl fmt::Debug for UploadTask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UploadTask")
            .field("file", &self.file)
            .field("folder", &self.folder)
            .field("desired_name", &self.desired_name)
            .finish_non_exhaustive()
    }
}

/// Stores a local file and returns the URL it is served from.
#[async_trait]
pub trait AssetUploader: Send + Sync {
    /// Progress is reported through `task.progress` only, ending with exactly one `100.0`.
    async fn upload(&self, task: UploadTask) -> Result<String, UploadError>;
}

/// Best-effort removal of a stored asset.
#[async_trait]
pub trait AssetRemover: Send + Sync {
    async fn delete_asset(&self, url: &str) -> StorageResult<()>;
}

/// Size and type limits applied before an upload starts.
#[derive(Debug, Clone)]
pub struct UploadLimits {
    pub max_size_bytes: usize,
    pub allowed_image_types: Vec<String>,
}

impl UploadLimits {
    pub fn from_config(config: &Config) -> Self {
        Self {
            max_size_bytes: config.max_upload_size_bytes(),
            allowed_image_types: config.allowed_image_types().to_vec(),
        }
    }

    pub fn check(&self, file: &LocalFile, folder: AssetFolder) -> Result<(), UploadError> {
        if file.len() > self.max_size_bytes {
            return Err(UploadError::new(
                UploadErrorKind::SizeExceeded,
                format!(
                    "{} is {} bytes, the limit is {} bytes",
                    file.file_name(),
                    file.len(),
                    self.max_size_bytes
                ),
            ));
        }
        if !folder.accepts(file.content_type(), &self.allowed_image_types) {
            return Err(UploadError::new(
                UploadErrorKind::UnsupportedType,
                format!(
                    "{} ({}) cannot be stored in {}",
                    file.file_name(),
                    file.content_type(),
                    folder
                ),
            ));
        }
        Ok(())
    }
}

/// Upload and delete client backed by a `Storage` implementation.
#[derive(Clone)]
pub struct StorageAssets {
    storage: Arc<dyn Storage>,
    limits: UploadLimits,
}

impl StorageAssets {
    pub fn new(storage: Arc<dyn Storage>, limits: UploadLimits) -> Self {
        Self { storage, limits }
    }

    /// Build the configured storage backend and wrap it.
    pub async fn from_config(config: &Config) -> StorageResult<Self> {
        let storage = create_storage(config).await?;
        Ok(Self::new(storage, UploadLimits::from_config(config)))
    }

    pub fn storage(&self) -> &Arc<dyn Storage> {
        &self.storage
    }

    pub fn limits(&self) -> &UploadLimits {
        &self.limits
    }
}

#[async_trait]
impl AssetUploader for StorageAssets {
    async fn upload(&self, task: UploadTask) -> Result<String, UploadError> {
        self.limits.check(&task.file, task.folder)?;

        let extension = task.file.extension();
        let key = generate_object_key(task.folder, &task.desired_name, extension.as_deref());
        let start = Instant::now();

        let url = self
            .storage
            .upload(
                &key,
                task.file.content_type(),
                task.file.data().clone(),
                task.progress,
            )
            .await
            .map_err(|e| {
                tracing::error!(error = %e, key = %key, "Asset upload failed");
                UploadError::from(e)
            })?;

        tracing::info!(
            key = %key,
            url = %url,
            size_bytes = task.file.len(),
            duration_ms = start.elapsed().as_millis() as u64,
            "Asset uploaded"
        );
        Ok(url)
    }
}

#[async_trait]
impl AssetRemover for StorageAssets {
    async fn delete_asset(&self, url: &str) -> StorageResult<()> {
        let key = self.storage.key_from_url(url).ok_or_else(|| {
            StorageError::InvalidKey(format!("{} is not served by this storage backend", url))
        })?;
        self.storage.delete(&key).await?;
        tracing::info!(key = %key, "Asset deleted");
        Ok(())
    }
}
