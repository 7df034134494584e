//! Shared key generation for storage backends.
//!
//! Key format: `{folder}/{slug}-{YYYYMMDDTHHMMSSnnnnnnnnnZ}-{8 hex}.{ext}`. The
//! timestamp and random suffix make every key unique, so two uploads with the same
//! desired name never overwrite each other.

use chrono::Utc;
use clubhub_core::constants::{FALLBACK_ASSET_STEM, MAX_ASSET_STEM_LENGTH};
use clubhub_core::AssetFolder;
use uuid::Uuid;

use crate::{StorageError, StorageResult};

/// Generate a collision-free object key for an asset.
pub fn generate_object_key(folder: AssetFolder, desired_name: &str, extension: Option<&str>) -> String {
    let stem = slugify(strip_extension(desired_name));
    let timestamp = Utc::now().format("%Y%m%dT%H%M%S%9fZ");
    let suffix = Uuid::new_v4().simple().to_string();
    let suffix = &suffix[..8];

    let extension = extension
        .map(|e| e.trim_start_matches('.').to_lowercase())
        .filter(|e| !e.is_empty() && e.chars().all(|c| c.is_ascii_alphanumeric()));

    match extension {
        Some(ext) => format!("{}/{}-{}-{}.{}", folder.as_str(), stem, timestamp, suffix, ext),
        None => format!("{}/{}-{}-{}", folder.as_str(), stem, timestamp, suffix),
    }
}

/// Reject keys that could escape the bucket or base directory.
pub fn validate_key(storage_key: &str) -> StorageResult<()> {
    if storage_key.is_empty() {
        return Err(StorageError::InvalidKey("Storage key is empty".to_string()));
    }
    if storage_key.contains("..") || storage_key.starts_with('/') || storage_key.contains('\\') {
        return Err(StorageError::InvalidKey(
            "Storage key contains invalid characters".to_string(),
        ));
    }
    Ok(())
}

fn strip_extension(name: &str) -> &str {
    let name = name.rsplit(['/', '\\']).next().unwrap_or(name);
    match name.rsplit_once('.') {
        Some((stem, _)) if !stem.is_empty() => stem,
        _ => name,
    }
}

/// Lowercase ASCII slug: alphanumerics kept, runs of anything else become one `-`.
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut pending_dash = false;

    for c in name.chars() {
        if c.is_ascii_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            slug.push(c.to_ascii_lowercase());
            pending_dash = false;
        } else {
            pending_dash = true;
        }
        if slug.len() >= MAX_ASSET_STEM_LENGTH {
            break;
        }
    }

    let slug = slug.trim_end_matches('-').to_string();
    if slug.is_empty() {
        FALLBACK_ASSET_STEM.to_string()
    } else {
        slug
    }
}
