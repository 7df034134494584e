//! Asset folders and local file handles
//!
//! An asset is any user-supplied binary file (image, PDF) that lives in object storage
//! and is referenced by URL from an entity record. `AssetFolder` is the closed set of
//! logical folders the admin forms upload into; `LocalFile` is a non-empty file that
//! has not been uploaded yet.

use std::fmt;
use std::path::Path;

use bytes::Bytes;
use serde::{Deserialize, Serialize};

/// Logical destination folder for uploaded assets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AssetFolder {
    BoardMembers,
    Articles,
    ArticleDocuments,
    Events,
    Guests,
    Partners,
    Podcasts,
    Reels,
    Honorees,
    Projects,
}

/// Which content types a folder accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetKind {
    Image,
    Document,
}

impl AssetFolder {
    pub const ALL: [AssetFolder; 10] = [
        AssetFolder::BoardMembers,
        AssetFolder::Articles,
        AssetFolder::ArticleDocuments,
        AssetFolder::Events,
        AssetFolder::Guests,
        AssetFolder::Partners,
        AssetFolder::Podcasts,
        AssetFolder::Reels,
        AssetFolder::Honorees,
        AssetFolder::Projects,
    ];

    /// Key prefix used in object storage.
    pub fn as_str(&self) -> &'static str {
        match self {
            AssetFolder::BoardMembers => "board-members",
            AssetFolder::Articles => "articles",
            AssetFolder::ArticleDocuments => "article-documents",
            AssetFolder::Events => "events",
            AssetFolder::Guests => "guests",
            AssetFolder::Partners => "partners",
            AssetFolder::Podcasts => "podcasts",
            AssetFolder::Reels => "reels",
            AssetFolder::Honorees => "honorees",
            AssetFolder::Projects => "projects",
        }
    }

    pub fn kind(&self) -> AssetKind {
        match self {
            AssetFolder::ArticleDocuments => AssetKind::Document,
            _ => AssetKind::Image,
        }
    }

    /// Whether `content_type` may be stored in this folder.
    ///
    /// Image folders accept any type in `allowed_image_types`; document folders accept PDF.
    pub fn accepts(&self, content_type: &str, allowed_image_types: &[String]) -> bool {
        let normalized = normalize_mime_type(content_type).to_lowercase();
        match self.kind() {
            AssetKind::Image => allowed_image_types
                .iter()
                .any(|allowed| allowed.eq_ignore_ascii_case(&normalized)),
            AssetKind::Document => normalized == "application/pdf",
        }
    }
}

impl fmt::Display for AssetFolder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for AssetFolder {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        AssetFolder::ALL
            .iter()
            .copied()
            .find(|folder| folder.as_str() == s)
            .ok_or_else(|| anyhow::anyhow!("Unknown asset folder: {}", s))
    }
}

/// Normalize MIME type by stripping parameters (e.g. "image/jpeg; q=1" -> "image/jpeg").
pub fn normalize_mime_type(content_type: &str) -> &str {
    content_type
        .split(';')
        .next()
        .map(|s| s.trim())
        .unwrap_or(content_type)
}

/// Content type implied by a file extension, if the extension is known.
pub fn content_type_for_extension(extension: &str) -> Option<&'static str> {
    let content_type = match extension.to_lowercase().as_str() {
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "avif" => "image/avif",
        "svg" => "image/svg+xml",
        "pdf" => "application/pdf",
        _ => return None,
    };
    Some(content_type)
}

/// Preferred extension for a content type, used when building object keys.
pub fn extension_for_content_type(content_type: &str) -> Option<&'static str> {
    let extension = match normalize_mime_type(content_type).to_lowercase().as_str() {
        "image/jpeg" => "jpg",
        "image/png" => "png",
        "image/gif" => "gif",
        "image/webp" => "webp",
        "image/avif" => "avif",
        "image/svg+xml" => "svg",
        "application/pdf" => "pdf",
        _ => return None,
    };
    Some(extension)
}

/// A local file waiting to be uploaded. Always non-empty.
#[derive(Clone, PartialEq, Eq)]
pub struct LocalFile {
    file_name: String,
    content_type: String,
    data: Bytes,
}

impl LocalFile {
    /// Wrap in-memory bytes. Returns `None` for empty content.
    pub fn from_bytes(
        file_name: impl Into<String>,
        content_type: Option<&str>,
        data: impl Into<Bytes>,
    ) -> Option<Self> {
        let data = data.into();
        if data.is_empty() {
            return None;
        }
        let file_name = file_name.into();
        let content_type = content_type
            .map(|ct| normalize_mime_type(ct).to_lowercase())
            .unwrap_or_else(|| guess_content_type(&file_name).to_string());
        Some(LocalFile {
            file_name,
            content_type,
            data,
        })
    }

    /// Read a file from disk. Empty files are reported as `InvalidData`.
    pub async fn read(path: impl AsRef<Path>) -> std::io::Result<Self> {
        Self::read_limited(path, None).await
    }

    /// Like [`LocalFile::read`], but files larger than `max_bytes` are rejected
    /// with `InvalidInput` before any content is buffered.
    pub async fn read_limited(
        path: impl AsRef<Path>,
        max_bytes: Option<usize>,
    ) -> std::io::Result<Self> {
        let path = path.as_ref();
        if let Some(max_bytes) = max_bytes {
            let size = tokio::fs::metadata(path).await?.len();
            if size > max_bytes as u64 {
                return Err(std::io::Error::new(
                    std::io::ErrorKind::InvalidInput,
                    format!(
                        "{} is {} bytes, the limit is {} bytes",
                        path.display(),
                        size,
                        max_bytes
                    ),
                ));
            }
        }
        let data = tokio::fs::read(path).await?;
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("upload")
            .to_string();
        LocalFile::from_bytes(file_name, None, data).ok_or_else(|| {
            std::io::Error::new(
                std::io::ErrorKind::InvalidData,
                format!("{} is empty", path.display()),
            )
        })
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn content_type(&self) -> &str {
        &self.content_type
    }

    pub fn data(&self) -> &Bytes {
        &self.data
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Always false; kept for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Extension for the stored object: the file's own, else one implied by its type.
    pub fn extension(&self) -> Option<String> {
        Path::new(&self.file_name)
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase())
            .filter(|e| !e.is_empty())
            .or_else(|| extension_for_content_type(&self.content_type).map(String::from))
    }
}

impl fmt::Debug for LocalFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LocalFile")
            .field("file_name", &self.file_name)
            .field("content_type", &self.content_type)
            .field("len", &self.data.len())
            .finish()
    }
}

fn guess_content_type(file_name: &str) -> &'static str {
    Path::new(file_name)
        .extension()
        .and_then(|e| e.to_str())
        .and_then(content_type_for_extension)
        .unwrap_or("application/octet-stream")
}
