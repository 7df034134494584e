//! Known generation keys per grouped entity kind
//!
//! Board members and honorees are partitioned by generation ("Gen 6", "2025A").
//! The catalog caches the keys offered in the admin selector. A key must be in
//! the cache before it can be selected, and `ensure` refreshes from the server
//! after a create introduced a key the cache has not seen.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use clubhub_api_client::ApiError;
use clubhub_core::models::EntityKind;
use thiserror::Error;
use tokio::sync::RwLock;

use crate::gateway::GenerationSource;

#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("{kind} records are not grouped by generation")]
    NotGrouped { kind: EntityKind },

    #[error("Unknown {kind} generation: {generation}")]
    Unknown { kind: EntityKind, generation: String },

    #[error(transparent)]
    Api(#[from] ApiError),
}

#[derive(Default)]
struct CatalogState {
    known: HashMap<EntityKind, Vec<String>>,
    /// Keys `ensure` added that the server has not listed yet.
    local: HashMap<EntityKind, HashSet<String>>,
    selected: HashMap<EntityKind, String>,
}

pub struct GenerationCatalog {
    source: Arc<dyn GenerationSource>,
    state: RwLock<CatalogState>,
}

impl GenerationCatalog {
    pub fn new(source: Arc<dyn GenerationSource>) -> Self {
        Self {
            source,
            state: RwLock::new(CatalogState::default()),
        }
    }

    fn grouped(kind: EntityKind) -> Result<(), GenerationError> {
        if kind.has_generations() {
            Ok(())
        } else {
            Err(GenerationError::NotGrouped { kind })
        }
    }

    /// Replace the cached keys with the server's list.
    ///
    /// Keys added by `ensure` survive until the server lists them; every other
    /// key the server dropped is forgotten.
    pub async fn refresh(&self, kind: EntityKind) -> Result<Vec<String>, GenerationError> {
        Self::grouped(kind)?;
        let mut generations = self.source.generations(kind).await?;
        let mut seen = HashSet::new();
        generations.retain(|g| !g.trim().is_empty() && seen.insert(g.clone()));

        let mut state = self.state.write().await;
        if let Some(local) = state.local.get_mut(&kind) {
            local.retain(|g| !seen.contains(g));
            let mut unlisted: Vec<String> = local.iter().cloned().collect();
            unlisted.sort();
            generations.extend(unlisted);
        }
        state.known.insert(kind, generations.clone());
        Ok(generations)
    }

    pub async fn known(&self, kind: EntityKind) -> Vec<String> {
        self.state
            .read()
            .await
            .known
            .get(&kind)
            .cloned()
            .unwrap_or_default()
    }

    pub async fn contains(&self, kind: EntityKind, generation: &str) -> bool {
        self.state
            .read()
            .await
            .known
            .get(&kind)
            .is_some_and(|known| known.iter().any(|g| g == generation))
    }

    /// Make `generation` selectable, refreshing from the server if it is new.
    ///
    /// When the refresh fails or the server does not list the key yet, it is added
    /// to the cache directly, since the record that carries it was just saved.
    pub async fn ensure(&self, kind: EntityKind, generation: &str) -> Vec<String> {
        if !kind.has_generations() || self.contains(kind, generation).await {
            return self.known(kind).await;
        }

        if let Err(e) = self.refresh(kind).await {
            tracing::warn!(
                entity = %kind,
                error = %e,
                "Failed to refresh generations; adding the new one locally"
            );
        }

        let mut state = self.state.write().await;
        let known = state.known.entry(kind).or_default();
        if known.iter().any(|g| g == generation) {
            return known.clone();
        }
        known.push(generation.to_string());
        let known = known.clone();
        state
            .local
            .entry(kind)
            .or_default()
            .insert(generation.to_string());
        tracing::debug!(entity = %kind, generation = %generation, "Generation added locally");
        known
    }

    /// Select a generation that is already in the cache.
    pub async fn select(&self, kind: EntityKind, generation: &str) -> Result<(), GenerationError> {
        Self::grouped(kind)?;
        let mut state = self.state.write().await;
        let is_known = state
            .known
            .get(&kind)
            .is_some_and(|known| known.iter().any(|g| g == generation));
        if !is_known {
            return Err(GenerationError::Unknown {
                kind,
                generation: generation.to_string(),
            });
        }
        state.selected.insert(kind, generation.to_string());
        Ok(())
    }

    pub async fn selected(&self, kind: EntityKind) -> Option<String> {
        self.state.read().await.selected.get(&kind).cloned()
    }
}
