//! Clubhub Storage Library
//!
//! Object storage for club assets. It provides the `Storage` trait and
//! implementations for S3-compatible providers and the local filesystem.
//!
//! # Object key format
//!
//! Every backend stores objects under `{folder}/{slug}-{timestamp}-{suffix}.{ext}`,
//! where `folder` is an `AssetFolder`, `slug` is derived from the desired name,
//! `timestamp` is the UTC upload time with nanoseconds and `suffix` is random. Keys
//! must not contain `..` or a leading `/`. Key generation lives in the `keys` module
//! so all backends stay consistent.

pub mod factory;
pub mod keys;
#[cfg(feature = "storage-local")]
pub mod local;
#[cfg(feature = "storage-s3")]
pub mod s3;
pub mod traits;

// Re-export commonly used types
pub use clubhub_core::StorageBackend;
pub use factory::create_storage;
pub use keys::generate_object_key;
#[cfg(feature = "storage-local")]
pub use local::LocalStorage;
#[cfg(feature = "storage-s3")]
pub use s3::S3Storage;
pub use traits::{report_progress, ProgressFn, Storage, StorageError, StorageResult};
