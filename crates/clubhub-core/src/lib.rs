//! Clubhub Core Library
//!
//! This crate provides the configuration, error metadata, asset handles, typed entity
//! models and field validation shared by every clubhub component.

pub mod assets;
pub mod config;
pub mod constants;
pub mod error;
pub mod models;
pub mod storage_types;
pub mod validation;
pub mod video;

// Re-export commonly used types
pub use assets::{AssetFolder, LocalFile};
pub use config::{ClubhubConfig, Config};
pub use error::{ErrorMetadata, LogLevel};
pub use storage_types::StorageBackend;
pub use validation::FieldErrors;
pub use video::extract_youtube_id;
