use clubhub_core::models::{BoardMemberPayload, BoardMemberRecord, EntityKind};
use clubhub_core::validation::require_text;
use clubhub_core::{AssetFolder, FieldErrors};
use serde::Deserialize;
use validator::Validate;

use super::{
    check_optional_url, finish_validation, optional_text, AdminForm, AssetField, AssetSlot,
    ResolvedAssets,
};

const AVATAR: &str = "avatar";

/// Executive or management board member.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct BoardMemberForm {
    #[validate(length(max = 120, message = "Name must be at most 120 characters"))]
    pub name: String,
    pub role: String,
    pub generation: String,
    #[serde(default)]
    pub linkedin_url: Option<String>,
    #[serde(default)]
    pub avatar: AssetField,
}

impl AdminForm for BoardMemberForm {
    type Payload = BoardMemberPayload;
    type Record = BoardMemberRecord;

    const KIND: EntityKind = EntityKind::BoardMembers;

    fn validate(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();
        require_text(&mut errors, "name", &self.name, "Name");
        require_text(&mut errors, "role", &self.role, "Role");
        require_text(&mut errors, "generation", &self.generation, "Generation");
        check_optional_url(&mut errors, "linkedin_url", &self.linkedin_url, "LinkedIn URL");
        finish_validation(Validate::validate(self), errors)
    }

    fn assets(&self) -> Vec<AssetSlot<'_>> {
        vec![AssetSlot::new(AVATAR, AssetFolder::BoardMembers, &self.avatar)]
    }

    fn desired_name(&self) -> String {
        self.name.clone()
    }

    fn into_payload(&self, assets: &ResolvedAssets) -> Result<BoardMemberPayload, FieldErrors> {
        Ok(BoardMemberPayload {
            name: self.name.trim().to_string(),
            role: self.role.trim().to_string(),
            generation: self.generation.trim().to_string(),
            avatar_url: assets.url(AVATAR),
            linkedin_url: optional_text(&self.linkedin_url),
        })
    }

    fn generation(&self) -> Option<&str> {
        Some(self.generation.trim()).filter(|g| !g.is_empty())
    }
}
