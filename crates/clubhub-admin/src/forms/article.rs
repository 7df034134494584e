use clubhub_core::models::{ArticlePayload, ArticleRecord, EntityKind};
use clubhub_core::validation::{require_non_blank_items, require_text};
use clubhub_core::{AssetFolder, FieldErrors};
use serde::Deserialize;
use validator::Validate;

use super::{clean_list, finish_validation, AdminForm, AssetField, AssetSlot, ResolvedAssets};

const COVER: &str = "cover";
const DOCUMENT: &str = "document";

/// Article with a cover image and a PDF body.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ArticleForm {
    #[validate(length(max = 200, message = "Title must be at most 200 characters"))]
    pub title: String,
    #[serde(default)]
    #[validate(length(max = 2000, message = "Summary must be at most 2000 characters"))]
    pub summary: String,
    #[serde(default)]
    pub labels: Vec<String>,
    #[serde(default)]
    pub authors: Vec<String>,
    #[serde(default)]
    pub cover: AssetField,
    #[serde(default)]
    pub document: AssetField,
}

impl AdminForm for ArticleForm {
    type Payload = ArticlePayload;
    type Record = ArticleRecord;

    const KIND: EntityKind = EntityKind::Articles;

    fn validate(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();
        require_text(&mut errors, "title", &self.title, "Title");
        require_non_blank_items(&mut errors, "labels", &self.labels, "label");
        require_non_blank_items(&mut errors, "authors", &self.authors, "author");
        finish_validation(Validate::validate(self), errors)
    }

    fn assets(&self) -> Vec<AssetSlot<'_>> {
        vec![
            AssetSlot::new(COVER, AssetFolder::Articles, &self.cover),
            AssetSlot::new(DOCUMENT, AssetFolder::ArticleDocuments, &self.document),
        ]
    }

    fn desired_name(&self) -> String {
        self.title.clone()
    }

    fn into_payload(&self, assets: &ResolvedAssets) -> Result<ArticlePayload, FieldErrors> {
        Ok(ArticlePayload {
            title: self.title.trim().to_string(),
            summary: self.summary.trim().to_string(),
            labels: clean_list(&self.labels),
            authors: clean_list(&self.authors),
            cover_url: assets.url(COVER),
            document_url: assets.url(DOCUMENT),
        })
    }
}
