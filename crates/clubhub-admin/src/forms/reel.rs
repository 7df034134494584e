use clubhub_core::models::{EntityKind, ReelPayload, ReelRecord};
use clubhub_core::validation::require_text;
use clubhub_core::{extract_youtube_id, AssetFolder, FieldErrors};
use serde::Deserialize;

use super::{AdminForm, AssetField, AssetSlot, ResolvedAssets};

const THUMBNAIL: &str = "thumbnail";

/// Short-form video. The admin pastes any YouTube link; only the id is stored.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReelForm {
    pub title: String,
    pub video_url: String,
    #[serde(default)]
    pub thumbnail: AssetField,
}

impl ReelForm {
    pub fn video_id(&self) -> Option<String> {
        extract_youtube_id(&self.video_url)
    }
}

impl AdminForm for ReelForm {
    type Payload = ReelPayload;
    type Record = ReelRecord;

    const KIND: EntityKind = EntityKind::Reels;

    fn validate(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();
        require_text(&mut errors, "title", &self.title, "Title");
        if self.video_url.trim().is_empty() {
            errors.add("video_url", "Video URL is required");
        } else if self.video_id().is_none() {
            errors.add("video_url", "Not a recognizable YouTube link");
        }
        errors.into_result()
    }

    fn assets(&self) -> Vec<AssetSlot<'_>> {
        vec![AssetSlot::new(THUMBNAIL, AssetFolder::Reels, &self.thumbnail)]
    }

    fn desired_name(&self) -> String {
        self.title.clone()
    }

    fn into_payload(&self, assets: &ResolvedAssets) -> Result<ReelPayload, FieldErrors> {
        let video_id = self.video_id().ok_or_else(|| {
            let mut errors = FieldErrors::new();
            errors.add("video_url", "Not a recognizable YouTube link");
            errors
        })?;
        Ok(ReelPayload {
            title: self.title.trim().to_string(),
            video_id,
            thumbnail_url: assets.url(THUMBNAIL),
        })
    }
}
