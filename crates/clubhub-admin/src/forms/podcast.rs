use clubhub_core::models::{EntityKind, PodcastPayload, PodcastRecord};
use clubhub_core::validation::require_text;
use clubhub_core::{AssetFolder, FieldErrors};
use serde::Deserialize;
use validator::Validate;

use super::{
    check_optional_url, finish_validation, optional_text, AdminForm, AssetField, AssetSlot,
    ResolvedAssets,
};

const COVER: &str = "cover";
const GUEST_AVATAR: &str = "guest_avatar";

#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct PodcastForm {
    pub title: String,
    #[validate(range(min = 1, message = "Episode number must be at least 1"))]
    pub episode: u32,
    #[serde(default)]
    pub guest_name: Option<String>,
    /// Audio or embed link.
    #[serde(default)]
    pub listen_url: Option<String>,
    #[serde(default)]
    pub cover: AssetField,
    #[serde(default)]
    pub guest_avatar: AssetField,
}

impl AdminForm for PodcastForm {
    type Payload = PodcastPayload;
    type Record = PodcastRecord;

    const KIND: EntityKind = EntityKind::Podcasts;

    fn validate(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();
        require_text(&mut errors, "title", &self.title, "Title");
        check_optional_url(&mut errors, "listen_url", &self.listen_url, "listen URL");
        finish_validation(Validate::validate(self), errors)
    }

    fn assets(&self) -> Vec<AssetSlot<'_>> {
        vec![
            AssetSlot::new(COVER, AssetFolder::Podcasts, &self.cover),
            AssetSlot::new(GUEST_AVATAR, AssetFolder::Guests, &self.guest_avatar),
        ]
    }

    fn desired_name(&self) -> String {
        format!("episode {} {}", self.episode, self.title)
    }

    fn into_payload(&self, assets: &ResolvedAssets) -> Result<PodcastPayload, FieldErrors> {
        Ok(PodcastPayload {
            title: self.title.trim().to_string(),
            episode: self.episode,
            guest_name: optional_text(&self.guest_name),
            listen_url: optional_text(&self.listen_url),
            cover_url: assets.url(COVER),
            guest_avatar_url: assets.url(GUEST_AVATAR),
        })
    }
}
