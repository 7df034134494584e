//! Entity methods for the club API client.
//!
//! Every collection shares the same REST shape, so the methods are generic over the
//! record type and use `EntityRecord::KIND` to pick the path.

use clubhub_core::models::{DisplaySettings, EntityKind, EntityRecord, ListQuery, Page};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::{ApiClient, ApiResult};

/// Known generation keys for a grouped collection. Matches GET /{entity}/generations.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum GenerationList {
    Plain(Vec<String>),
    Wrapped { generations: Vec<String> },
}

impl GenerationList {
    pub fn into_vec(self) -> Vec<String> {
        match self {
            GenerationList::Plain(list) => list,
            GenerationList::Wrapped { generations } => generations,
        }
    }
}

fn collection_path(kind: EntityKind) -> String {
    format!("/{}", kind.path_segment())
}

fn item_path(kind: EntityKind, id: &str) -> String {
    format!("/{}/{}", kind.path_segment(), urlencoding::encode(id))
}

impl ApiClient {
    /// List one page of records with pagination and filters.
    pub async fn list<R: EntityRecord>(&self, query: &ListQuery) -> ApiResult<Page<R>> {
        self.get(&collection_path(R::KIND), &query.to_query_pairs())
            .await
    }

    /// Get a single record by ID.
    pub async fn fetch<R: EntityRecord>(&self, id: &str) -> ApiResult<R> {
        self.get(&item_path(R::KIND, id), &[]).await
    }

    /// Create a record. POST /{entity}.
    pub async fn create<P, R>(&self, kind: EntityKind, payload: &P) -> ApiResult<R>
    where
        P: Serialize + Sync,
        R: DeserializeOwned,
    {
        self.post_json(&collection_path(kind), payload).await
    }

    /// Replace a record. PUT /{entity}/{id}.
    pub async fn update<P, R>(&self, kind: EntityKind, id: &str, payload: &P) -> ApiResult<R>
    where
        P: Serialize + Sync,
        R: DeserializeOwned,
    {
        self.put_json(&item_path(kind, id), payload).await
    }

    /// Delete a record by ID.
    pub async fn remove(&self, kind: EntityKind, id: &str) -> ApiResult<()> {
        self.delete(&item_path(kind, id)).await
    }

    /// Untyped list, for callers that only print the response.
    pub async fn list_raw(
        &self,
        kind: EntityKind,
        query: &ListQuery,
    ) -> ApiResult<serde_json::Value> {
        self.get(&collection_path(kind), &query.to_query_pairs())
            .await
    }

    /// Untyped single record.
    pub async fn fetch_raw(&self, kind: EntityKind, id: &str) -> ApiResult<serde_json::Value> {
        self.get(&item_path(kind, id), &[]).await
    }

    /// Distinct generation keys of a grouped collection.
    pub async fn generations(&self, kind: EntityKind) -> ApiResult<Vec<String>> {
        let list: GenerationList = self
            .get(&format!("/{}/generations", kind.path_segment()), &[])
            .await?;
        Ok(list.into_vec())
    }

    /// Read the global display settings.
    pub async fn settings(&self) -> ApiResult<DisplaySettings> {
        self.get("/settings", &[]).await
    }

    /// Write the global display settings and return what the server stored.
    pub async fn save_settings(&self, settings: &DisplaySettings) -> ApiResult<DisplaySettings> {
        self.post_json("/settings", settings).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn item_paths_escape_ids() {
        assert_eq!(item_path(EntityKind::Articles, "abc-123"), "/articles/abc-123");
        assert_eq!(item_path(EntityKind::Reels, "a/b c"), "/reels/a%2Fb%20c");
    }

    #[test]
    fn generation_list_shapes() {
        let plain: GenerationList = serde_json::from_str(r#"["Gen 5","Gen 6"]"#).unwrap();
        let wrapped: GenerationList =
            serde_json::from_str(r#"{"generations":["Gen 5","Gen 6"]}"#).unwrap();
        assert_eq!(plain.into_vec(), wrapped.into_vec());
    }
}
