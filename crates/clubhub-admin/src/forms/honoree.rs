use clubhub_core::models::{EntityKind, HonoreePayload, HonoreeRecord};
use clubhub_core::validation::require_text;
use clubhub_core::{AssetFolder, FieldErrors};
use serde::Deserialize;
use validator::Validate;

use super::{finish_validation, AdminForm, AssetField, AssetSlot, ResolvedAssets};

const PHOTO: &str = "photo";

/// Hall-of-fame entry.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct HonoreeForm {
    pub name: String,
    #[validate(length(max = 500, message = "Achievement must be at most 500 characters"))]
    pub achievement: String,
    pub generation: String,
    #[serde(default)]
    pub photo: AssetField,
}

impl AdminForm for HonoreeForm {
    type Payload = HonoreePayload;
    type Record = HonoreeRecord;

    const KIND: EntityKind = EntityKind::Honorees;

    fn validate(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();
        require_text(&mut errors, "name", &self.name, "Name");
        require_text(&mut errors, "achievement", &self.achievement, "Achievement");
        require_text(&mut errors, "generation", &self.generation, "Generation");
        finish_validation(Validate::validate(self), errors)
    }

    fn assets(&self) -> Vec<AssetSlot<'_>> {
        vec![AssetSlot::new(PHOTO, AssetFolder::Honorees, &self.photo)]
    }

    fn desired_name(&self) -> String {
        self.name.clone()
    }

    fn into_payload(&self, assets: &ResolvedAssets) -> Result<HonoreePayload, FieldErrors> {
        Ok(HonoreePayload {
            name: self.name.trim().to_string(),
            achievement: self.achievement.trim().to_string(),
            generation: self.generation.trim().to_string(),
            photo_url: assets.url(PHOTO),
        })
    }

    fn generation(&self) -> Option<&str> {
        Some(self.generation.trim()).filter(|g| !g.is_empty())
    }
}
