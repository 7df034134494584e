//! Clubhub Admin Library
//!
//! The asset-upload-and-cleanup workflow behind every admin form: upload and
//! delete clients over object storage, a progress allocator that merges several
//! uploads into one readout, the submit orchestrator, and the per-entity forms.
//! Generation selection and the publicly visible generation live here too.

pub mod app;
pub mod display;
pub mod forms;
pub mod gateway;
pub mod generations;
pub mod orchestrator;
pub mod progress;
pub mod uploader;

pub use app::{AdminApp, SetupError};
pub use display::DisplayContext;
pub use forms::{AdminForm, AssetField, ResolvedAssets};
pub use gateway::{EntityGateway, GenerationSource, SettingsStore};
pub use generations::{GenerationCatalog, GenerationError};
pub use orchestrator::{
    CleanupFailure, FormOrchestrator, SubmitError, SubmitMode, SubmitOutcome, SubmitPhase,
};
pub use progress::{compose, ProgressAllocator};
pub use uploader::{
    AssetRemover, AssetUploader, StorageAssets, UploadError, UploadErrorKind, UploadLimits,
    UploadTask,
};
