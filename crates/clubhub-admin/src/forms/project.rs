use clubhub_core::models::{EntityKind, ProjectPayload, ProjectRecord, ProjectStatus};
use clubhub_core::validation::require_text;
use clubhub_core::{AssetFolder, FieldErrors};
use serde::Deserialize;

use super::{check_optional_url, optional_text, AdminForm, AssetField, AssetSlot, ResolvedAssets};

const COVER: &str = "cover";

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectForm {
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub repository_url: Option<String>,
    pub status: ProjectStatus,
    #[serde(default)]
    pub cover: AssetField,
}

impl AdminForm for ProjectForm {
    type Payload = ProjectPayload;
    type Record = ProjectRecord;

    const KIND: EntityKind = EntityKind::Projects;

    fn validate(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();
        require_text(&mut errors, "title", &self.title, "Title");
        require_text(&mut errors, "description", &self.description, "Description");
        check_optional_url(
            &mut errors,
            "repository_url",
            &self.repository_url,
            "repository URL",
        );
        errors.into_result()
    }

    fn assets(&self) -> Vec<AssetSlot<'_>> {
        vec![AssetSlot::new(COVER, AssetFolder::Projects, &self.cover)]
    }

    fn desired_name(&self) -> String {
        self.title.clone()
    }

    fn into_payload(&self, assets: &ResolvedAssets) -> Result<ProjectPayload, FieldErrors> {
        Ok(ProjectPayload {
            title: self.title.trim().to_string(),
            description: self.description.trim().to_string(),
            repository_url: optional_text(&self.repository_url),
            status: self.status,
            cover_url: assets.url(COVER),
        })
    }
}
