//! Form submit orchestration
//!
//! `FormOrchestrator::submit` drives one submission through
//! `Validating -> Uploading -> Persisting -> CleaningUp -> Idle`:
//!
//! - nothing reaches the network until the form validates and every pending file
//!   has been read;
//! - uploads run concurrently and share one progress readout;
//! - the entity endpoint is called only after every upload resolved, so a persisted
//!   asset field always points at a stored object;
//! - superseded assets are deleted only after an update persisted, and a failed
//!   delete is logged, never reported as a failed submission.
//!
//! Uploads that succeeded before a later failure are left in storage.

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use clubhub_api_client::ApiError;
use clubhub_core::models::EntityKind;
use clubhub_core::{AssetFolder, ErrorMetadata, FieldErrors, LocalFile, LogLevel};
use clubhub_storage::ProgressFn;
use futures::future::{join_all, try_join_all};
use thiserror::Error;
use tokio::sync::watch;

use crate::forms::{AdminForm, AssetField, ResolvedAssets};
use crate::gateway::EntityGateway;
use crate::generations::GenerationCatalog;
use crate::progress::ProgressAllocator;
use crate::uploader::{AssetRemover, AssetUploader, UploadError, UploadTask};

/// Where the current submission is. Published to subscribers on every change.
#[derive(Debug, Clone, PartialEq)]
pub enum SubmitPhase {
    Idle,
    Validating,
    Uploading {
        completed: usize,
        total: usize,
        percent: f64,
    },
    Persisting,
    CleaningUp,
    Failed {
        code: &'static str,
        message: String,
    },
}

impl SubmitPhase {
    /// Whether a submission is running.
    pub fn is_busy(&self) -> bool {
        !matches!(self, SubmitPhase::Idle | SubmitPhase::Failed { .. })
    }
}

/// Create a new record or update an existing one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitMode {
    Create,
    Update { id: String },
}

impl SubmitMode {
    pub fn update(id: impl Into<String>) -> Self {
        SubmitMode::Update { id: id.into() }
    }

    fn as_str(&self) -> &'static str {
        match self {
            SubmitMode::Create => "create",
            SubmitMode::Update { .. } => "update",
        }
    }
}

#[derive(Debug, Error)]
pub enum SubmitError {
    #[error("Validation failed: {0}")]
    Validation(FieldErrors),

    #[error("Upload of {field} failed: {source}")]
    Upload {
        field: &'static str,
        #[source]
        source: UploadError,
    },

    #[error("Failed to save {kind}: {source}")]
    Persist {
        kind: EntityKind,
        #[source]
        source: ApiError,
    },

    #[error("Failed to encode {kind} payload: {source}")]
    Encode {
        kind: EntityKind,
        #[source]
        source: serde_json::Error,
    },

    #[error("Saved {kind} but the response could not be read: {source}")]
    InvalidResponse {
        kind: EntityKind,
        #[source]
        source: serde_json::Error,
    },

    #[error("A submission is already in progress")]
    Busy,
}

impl ErrorMetadata for SubmitError {
    fn error_code(&self) -> &'static str {
        match self {
            SubmitError::Validation(_) => "VALIDATION_ERROR",
            SubmitError::Upload { .. } => "UPLOAD_FAILED",
            SubmitError::Persist { .. } => "PERSIST_FAILED",
            SubmitError::Encode { .. } => "ENCODE_FAILED",
            SubmitError::InvalidResponse { .. } => "INVALID_RESPONSE",
            SubmitError::Busy => "SUBMIT_IN_PROGRESS",
        }
    }

    fn is_recoverable(&self) -> bool {
        !matches!(
            self,
            SubmitError::Encode { .. } | SubmitError::InvalidResponse { .. }
        )
    }

    fn user_message(&self) -> String {
        match self {
            SubmitError::Validation(errors) => errors.to_string(),
            SubmitError::Upload { .. } => "Upload failed. Please try again.".to_string(),
            SubmitError::Persist { kind, source } => source
                .server_message()
                .map(String::from)
                .unwrap_or_else(|| format!("Failed to save {}", kind)),
            SubmitError::Encode { .. } => "Internal error".to_string(),
            SubmitError::InvalidResponse { .. } => {
                "Saved, but the server response could not be read".to_string()
            }
            SubmitError::Busy => "A submission is already in progress".to_string(),
        }
    }

    fn is_user_visible(&self) -> bool {
        true
    }

    fn log_level(&self) -> LogLevel {
        match self {
            SubmitError::Validation(_) | SubmitError::Busy => LogLevel::Debug,
            SubmitError::Upload { .. } => LogLevel::Warn,
            SubmitError::Persist { .. }
            | SubmitError::Encode { .. }
            | SubmitError::InvalidResponse { .. } => LogLevel::Error,
        }
    }
}

/// A superseded asset whose delete failed. Logged, never surfaced as an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CleanupFailure {
    pub url: String,
    pub reason: String,
}

/// Result of a successful submission.
#[derive(Debug, Clone)]
pub struct SubmitOutcome<R> {
    pub record: R,
    /// URLs of assets uploaded by this submission.
    pub uploaded: Vec<String>,
    /// Previous URLs a delete was issued for.
    pub superseded: Vec<String>,
    pub cleanup_failures: Vec<CleanupFailure>,
}

struct PendingUpload {
    field: &'static str,
    folder: AssetFolder,
    file: LocalFile,
    previous: Option<String>,
}

/// Releases the in-flight flag when a submission ends, however it ends.
struct BusyGuard<'a>(&'a AtomicBool);

impl<'a> BusyGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| BusyGuard(flag))
    }
}

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Submit handler shared by every admin form.
pub struct FormOrchestrator {
    uploader: Arc<dyn AssetUploader>,
    remover: Arc<dyn AssetRemover>,
    gateway: Arc<dyn EntityGateway>,
    catalog: Option<Arc<GenerationCatalog>>,
    progress_sink: Option<ProgressFn>,
    max_file_bytes: Option<usize>,
    phase: Arc<watch::Sender<SubmitPhase>>,
    in_flight: AtomicBool,
}

impl fmt::Debug for FormOrchestrator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FormOrchestrator")
            .field("phase", &*self.phase.borrow())
            .field("in_flight", &self.in_flight.load(Ordering::Relaxed))
            .finish_non_exhaustive()
    }
}

impl FormOrchestrator {
    pub fn new(
        uploader: Arc<dyn AssetUploader>,
        remover: Arc<dyn AssetRemover>,
        gateway: Arc<dyn EntityGateway>,
    ) -> Self {
        let (phase, _) = watch::channel(SubmitPhase::Idle);
        Self {
            uploader,
            remover,
            gateway,
            catalog: None,
            progress_sink: None,
            max_file_bytes: None,
            phase: Arc::new(phase),
            in_flight: AtomicBool::new(false),
        }
    }

    /// Keep this catalog current when a create introduces a new generation.
    pub fn with_generation_catalog(mut self, catalog: Arc<GenerationCatalog>) -> Self {
        self.catalog = Some(catalog);
        self
    }

    /// Extra sink for the aggregate upload percentage.
    pub fn with_progress_sink(mut self, sink: ProgressFn) -> Self {
        self.progress_sink = Some(sink);
        self
    }

    /// Refuse pending files on disk larger than this before reading them.
    pub fn with_max_file_size(mut self, max_bytes: usize) -> Self {
        self.max_file_bytes = Some(max_bytes);
        self
    }

    pub fn subscribe(&self) -> watch::Receiver<SubmitPhase> {
        self.phase.subscribe()
    }

    pub fn phase(&self) -> SubmitPhase {
        self.phase.borrow().clone()
    }

    pub fn is_busy(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    fn set_phase(&self, phase: SubmitPhase) {
        self.phase.send_replace(phase);
    }

    fn fail(&self, error: SubmitError) -> SubmitError {
        match error.log_level() {
            LogLevel::Debug => tracing::debug!(error = %error, "Submission rejected"),
            LogLevel::Warn => tracing::warn!(error = %error, "Submission failed"),
            LogLevel::Error => tracing::error!(error = %error, "Submission failed"),
        }
        self.set_phase(SubmitPhase::Failed {
            code: error.error_code(),
            message: error.user_message(),
        });
        error
    }

    /// Run one submission of `form`.
    #[tracing::instrument(
        skip(self, form, mode),
        fields(entity = %F::KIND, mode = mode.as_str())
    )]
    pub async fn submit<F: AdminForm>(
        &self,
        form: &F,
        mode: SubmitMode,
    ) -> Result<SubmitOutcome<F::Record>, SubmitError> {
        let _guard = BusyGuard::acquire(&self.in_flight).ok_or(SubmitError::Busy)?;

        self.set_phase(SubmitPhase::Validating);
        let (pending, mut resolved) = match self.prepare(form).await {
            Ok(prepared) => prepared,
            Err(errors) => {
                self.set_phase(SubmitPhase::Idle);
                tracing::debug!(errors = %errors, "Form validation failed");
                return Err(SubmitError::Validation(errors));
            }
        };

        let uploaded = if pending.is_empty() {
            Vec::new()
        } else {
            self.upload_all(form, &pending).await?
        };
        for (field, url) in &uploaded {
            resolved.set(*field, url.clone());
        }
        let uploaded_urls: Vec<String> = uploaded.iter().map(|(_, url)| url.clone()).collect();

        self.set_phase(SubmitPhase::Persisting);
        let payload = form
            .into_payload(&resolved)
            .map_err(|errors| self.fail(SubmitError::Validation(errors)))?;
        let body = serde_json::to_value(&payload).map_err(|source| {
            self.fail(SubmitError::Encode {
                kind: F::KIND,
                source,
            })
        })?;

        let persisted = match &mode {
            SubmitMode::Create => self.gateway.create(F::KIND, body).await,
            SubmitMode::Update { id } => self.gateway.update(F::KIND, id, body).await,
        };
        let saved = match persisted {
            Ok(saved) => saved,
            Err(source) => {
                if !uploaded_urls.is_empty() {
                    tracing::warn!(
                        orphaned = ?uploaded_urls,
                        "Uploaded assets left unreferenced after failed save"
                    );
                }
                return Err(self.fail(SubmitError::Persist {
                    kind: F::KIND,
                    source,
                }));
            }
        };

        if mode == SubmitMode::Create {
            if let (Some(catalog), Some(generation)) = (&self.catalog, form.generation()) {
                catalog.ensure(F::KIND, generation).await;
            }
        }

        let (superseded, cleanup_failures) = match mode {
            SubmitMode::Update { .. } => {
                self.set_phase(SubmitPhase::CleaningUp);
                self.clean_up(&pending, &resolved).await
            }
            SubmitMode::Create => (Vec::new(), Vec::new()),
        };
        self.set_phase(SubmitPhase::Idle);

        let record = serde_json::from_value(saved).map_err(|source| {
            tracing::error!(error = %source, entity = %F::KIND, "Unreadable record in save response");
            SubmitError::InvalidResponse {
                kind: F::KIND,
                source,
            }
        })?;

        tracing::info!(
            uploaded = uploaded_urls.len(),
            superseded = superseded.len(),
            cleanup_failures = cleanup_failures.len(),
            "Submission saved"
        );

        Ok(SubmitOutcome {
            record,
            uploaded: uploaded_urls,
            superseded,
            cleanup_failures,
        })
    }

    /// Validate the form and read every pending file.
    async fn prepare<F: AdminForm>(
        &self,
        form: &F,
    ) -> Result<(Vec<PendingUpload>, ResolvedAssets), FieldErrors> {
        let mut errors = match form.validate() {
            Ok(()) => FieldErrors::new(),
            Err(errors) => errors,
        };

        let mut pending = Vec::new();
        let mut resolved = ResolvedAssets::new();
        for slot in form.assets() {
            match slot.value {
                AssetField::Empty => {}
                AssetField::Stored(_) => {
                    if let Some(url) = slot.value.current_url() {
                        resolved.set(slot.field, url);
                    }
                }
                AssetField::Pending { source, previous } => {
                    match source.load(self.max_file_bytes).await {
                        Ok(file) => pending.push(PendingUpload {
                            field: slot.field,
                            folder: slot.folder,
                            file,
                            previous: previous.clone(),
                        }),
                        Err(e) => errors.add(slot.field, format!("Could not read file: {}", e)),
                    }
                }
            }
        }

        errors.into_result()?;
        Ok((pending, resolved))
    }

    /// Upload every pending file concurrently; the first failure cancels the rest.
    async fn upload_all<F: AdminForm>(
        &self,
        form: &F,
        pending: &[PendingUpload],
    ) -> Result<Vec<(&'static str, String)>, SubmitError> {
        let total = pending.len();
        self.set_phase(SubmitPhase::Uploading {
            completed: 0,
            total,
            percent: 0.0,
        });

        let phase = Arc::clone(&self.phase);
        let extra = self.progress_sink.clone();
        let sink: ProgressFn = Arc::new(move |percent| {
            phase.send_modify(|current| {
                if let SubmitPhase::Uploading { percent: p, .. } = current {
                    *p = percent;
                }
            });
            if let Some(extra) = &extra {
                extra(percent);
            }
        });
        let Some(allocator) = ProgressAllocator::new(total, sink) else {
            return Ok(Vec::new());
        };

        let desired_name = form.desired_name();
        let stored = Arc::new(Mutex::new(Vec::new()));
        let uploads = pending.iter().enumerate().map(|(index, upload)| {
            let task = UploadTask {
                file: upload.file.clone(),
                folder: upload.folder,
                desired_name: desired_name.clone(),
                progress: allocator.slice(index),
            };
            let stored = Arc::clone(&stored);
            let field = upload.field;
            async move {
                let url = self
                    .uploader
                    .upload(task)
                    .await
                    .map_err(|source| SubmitError::Upload { field, source })?;
                stored
                    .lock()
                    .unwrap_or_else(|e| e.into_inner())
                    .push(url.clone());
                self.phase.send_modify(|current| {
                    if let SubmitPhase::Uploading { completed, .. } = current {
                        *completed += 1;
                    }
                });
                Ok::<_, SubmitError>((field, url))
            }
        });

        match try_join_all(uploads).await {
            Ok(urls) => Ok(urls),
            Err(error) => {
                let orphaned = stored.lock().unwrap_or_else(|e| e.into_inner()).clone();
                if !orphaned.is_empty() {
                    tracing::warn!(orphaned = ?orphaned, "Uploads left behind by failed submission");
                }
                Err(self.fail(error))
            }
        }
    }

    /// Delete every previous asset that a new upload replaced.
    async fn clean_up(
        &self,
        pending: &[PendingUpload],
        resolved: &ResolvedAssets,
    ) -> (Vec<String>, Vec<CleanupFailure>) {
        let superseded: Vec<String> = pending
            .iter()
            .filter_map(|upload| {
                let previous = upload.previous.as_deref()?;
                let current = resolved.url(upload.field);
                (current.as_deref() != Some(previous)).then(|| previous.to_string())
            })
            .collect();

        let deletes = superseded.iter().map(|url| async move {
            match self.remover.delete_asset(url).await {
                Ok(()) => None,
                Err(e) => {
                    tracing::warn!(url = %url, error = %e, "Failed to delete superseded asset");
                    Some(CleanupFailure {
                        url: url.clone(),
                        reason: e.to_string(),
                    })
                }
            }
        });
        let failures = join_all(deletes).await.into_iter().flatten().collect();

        (superseded, failures)
    }
}
