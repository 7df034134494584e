//! Admin forms
//!
//! A form holds what the admin typed plus one `AssetField` per file input. The
//! orchestrator asks the form for its asset slots, uploads the pending ones and
//! hands the resolved URLs back to `into_payload`, which builds the typed request
//! body for the entity endpoint.

pub mod article;
pub mod board_member;
pub mod event;
pub mod honoree;
pub mod podcast;
pub mod project;
pub mod reel;

use std::collections::BTreeMap;
use std::path::PathBuf;

use clubhub_core::models::{EntityKind, EntityRecord};
use clubhub_core::{AssetFolder, FieldErrors, LocalFile};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use validator::{ValidateUrl, ValidationErrors};

pub use article::ArticleForm;
pub use board_member::BoardMemberForm;
pub use event::EventForm;
pub use honoree::HonoreeForm;
pub use podcast::PodcastForm;
pub use project::ProjectForm;
pub use reel::ReelForm;

/// Where a pending file comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileSource {
    Loaded(LocalFile),
    Path(PathBuf),
}

impl FileSource {
    /// Read the file if it is still on disk, refusing files over `max_bytes`.
    pub async fn load(&self, max_bytes: Option<usize>) -> std::io::Result<LocalFile> {
        match self {
            FileSource::Loaded(file) => Ok(file.clone()),
            FileSource::Path(path) => LocalFile::read_limited(path, max_bytes).await,
        }
    }
}

/// Value of one file input.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(from = "AssetFieldDraft")]
pub enum AssetField {
    #[default]
    Empty,
    /// Already stored; submitted unchanged.
    Stored(String),
    /// A local file that replaces `previous` once uploaded.
    Pending {
        source: FileSource,
        previous: Option<String>,
    },
}

impl AssetField {
    pub fn stored(url: impl Into<String>) -> Self {
        AssetField::Stored(url.into())
    }

    pub fn pending(file: LocalFile, previous: Option<String>) -> Self {
        AssetField::Pending {
            source: FileSource::Loaded(file),
            previous: non_blank(previous),
        }
    }

    pub fn from_path(path: impl Into<PathBuf>, previous: Option<String>) -> Self {
        AssetField::Pending {
            source: FileSource::Path(path.into()),
            previous: non_blank(previous),
        }
    }

    pub fn is_pending(&self) -> bool {
        matches!(self, AssetField::Pending { .. })
    }

    /// URL submitted when nothing is uploaded for this field.
    pub fn current_url(&self) -> Option<&str> {
        match self {
            AssetField::Stored(url) if !url.trim().is_empty() => Some(url),
            _ => None,
        }
    }

    /// URL that a pending upload supersedes.
    pub fn previous_url(&self) -> Option<&str> {
        match self {
            AssetField::Pending { previous, .. } => previous.as_deref(),
            _ => None,
        }
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// JSON shape of an asset field in a draft: `null`, a URL, or `{ "path", "previous" }`.
#[derive(Deserialize)]
#[serde(untagged)]
enum AssetFieldDraft {
    Url(String),
    File {
        path: PathBuf,
        #[serde(default)]
        previous: Option<String>,
    },
    Empty(()),
}

impl From<AssetFieldDraft> for AssetField {
    fn from(draft: AssetFieldDraft) -> Self {
        match draft {
            AssetFieldDraft::Url(url) if url.trim().is_empty() => AssetField::Empty,
            AssetFieldDraft::Url(url) => AssetField::Stored(url),
            AssetFieldDraft::File { path, previous } => AssetField::from_path(path, previous),
            AssetFieldDraft::Empty(()) => AssetField::Empty,
        }
    }
}

/// One file input of a form.
#[derive(Debug, Clone, Copy)]
pub struct AssetSlot<'a> {
    pub field: &'static str,
    pub folder: AssetFolder,
    pub value: &'a AssetField,
}

impl<'a> AssetSlot<'a> {
    pub fn new(field: &'static str, folder: AssetFolder, value: &'a AssetField) -> Self {
        Self {
            field,
            folder,
            value,
        }
    }
}

/// Final URL of every asset field after the upload phase.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolvedAssets {
    urls: BTreeMap<&'static str, String>,
}

impl ResolvedAssets {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, field: &'static str, url: impl Into<String>) {
        self.urls.insert(field, url.into());
    }

    pub fn url(&self, field: &str) -> Option<String> {
        self.urls.get(field).cloned()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &str)> {
        self.urls.iter().map(|(field, url)| (*field, url.as_str()))
    }
}

/// A create/update form for one entity kind.
pub trait AdminForm: Send + Sync {
    type Payload: Serialize + Send + Sync;
    type Record: EntityRecord + DeserializeOwned;

    const KIND: EntityKind;

    /// Client-side field checks. Never touches the network.
    fn validate(&self) -> Result<(), FieldErrors>;

    /// File inputs, in a stable order.
    fn assets(&self) -> Vec<AssetSlot<'_>>;

    /// Base name for uploaded object keys.
    fn desired_name(&self) -> String;

    /// Build the request body; asset fields take their URL from `assets`.
    fn into_payload(&self, assets: &ResolvedAssets) -> Result<Self::Payload, FieldErrors>;

    /// Grouping key the payload belongs to, for generation-partitioned kinds.
    fn generation(&self) -> Option<&str> {
        None
    }
}

/// Merge derived `validator` rules with a form's custom checks.
pub(crate) fn finish_validation(
    derived: Result<(), ValidationErrors>,
    mut errors: FieldErrors,
) -> Result<(), FieldErrors> {
    if let Err(derived) = derived {
        errors.merge(derived.into());
    }
    errors.into_result()
}

/// Optional link field: blank is fine, anything else must be a URL.
pub(crate) fn check_optional_url(
    errors: &mut FieldErrors,
    field: &str,
    value: &Option<String>,
    label: &str,
) {
    if let Some(url) = optional_text(value) {
        if !url.validate_url() {
            errors.add(field, format!("Invalid {}", label));
        }
    }
}

/// Trimmed value, or `None` when blank.
pub(crate) fn optional_text(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(String::from)
}

/// Trimmed, non-blank list entries.
pub(crate) fn clean_list(items: &[String]) -> Vec<String> {
    items
        .iter()
        .map(|item| item.trim())
        .filter(|item| !item.is_empty())
        .map(String::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Deserialize)]
    struct Draft {
        #[serde(default)]
        cover: AssetField,
        logo: AssetField,
        photo: AssetField,
        badge: AssetField,
    }

    #[test]
    fn draft_shapes_map_to_fields() {
        let draft: Draft = serde_json::from_str(
            r#"{
                "logo": "https://cdn.example.org/partners/a.png",
                "photo": {"path": "/tmp/photo.jpg", "previous": "https://cdn.example.org/old.jpg"},
                "badge": null
            }"#,
        )
        .unwrap();

        assert_eq!(draft.cover, AssetField::Empty);
        assert_eq!(
            draft.logo.current_url(),
            Some("https://cdn.example.org/partners/a.png")
        );
        assert!(draft.photo.is_pending());
        assert_eq!(
            draft.photo.previous_url(),
            Some("https://cdn.example.org/old.jpg")
        );
        assert_eq!(draft.badge, AssetField::Empty);
    }

    #[test]
    fn blank_previous_is_dropped() {
        let field = AssetField::from_path("/tmp/a.png", Some("  ".to_string()));
        assert_eq!(field.previous_url(), None);
        assert_eq!(field.current_url(), None);
    }
}
