//! Typed request and response records for the club API.
//!
//! Every entity has a `*Payload` (body of create/update) and a `*Record` (what the
//! server returns). Asset fields are plain URL strings; the admin forms are the only
//! place that knows whether a URL came from a fresh upload.

pub mod article;
pub mod board_member;
pub mod event;
pub mod honoree;
pub mod podcast;
pub mod project;
pub mod reel;
pub mod settings;

use std::fmt;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::constants::DEFAULT_PAGE_LIMIT;

pub use article::{ArticlePayload, ArticleRecord};
pub use board_member::{BoardMemberPayload, BoardMemberRecord};
pub use event::{EventMode, EventPayload, EventRecord, EventStatus};
pub use honoree::{HonoreePayload, HonoreeRecord};
pub use podcast::{PodcastPayload, PodcastRecord};
pub use project::{ProjectPayload, ProjectRecord, ProjectStatus};
pub use reel::{ReelPayload, ReelRecord};
pub use settings::DisplaySettings;

/// Entity collections exposed by the club API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EntityKind {
    BoardMembers,
    Articles,
    Events,
    Podcasts,
    Reels,
    Honorees,
    Projects,
}

impl EntityKind {
    pub const ALL: [EntityKind; 7] = [
        EntityKind::BoardMembers,
        EntityKind::Articles,
        EntityKind::Events,
        EntityKind::Podcasts,
        EntityKind::Reels,
        EntityKind::Honorees,
        EntityKind::Projects,
    ];

    /// Path segment under the API prefix.
    pub fn path_segment(&self) -> &'static str {
        match self {
            EntityKind::BoardMembers => "board-members",
            EntityKind::Articles => "articles",
            EntityKind::Events => "events",
            EntityKind::Podcasts => "podcasts",
            EntityKind::Reels => "reels",
            EntityKind::Honorees => "honorees",
            EntityKind::Projects => "projects",
        }
    }

    /// Whether records of this kind are partitioned by generation.
    pub fn has_generations(&self) -> bool {
        matches!(self, EntityKind::BoardMembers | EntityKind::Honorees)
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path_segment())
    }
}

impl std::str::FromStr for EntityKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.to_lowercase().replace('_', "-");
        EntityKind::ALL
            .iter()
            .copied()
            .find(|kind| kind.path_segment() == normalized)
            .ok_or_else(|| anyhow::anyhow!("Unknown entity kind: {}", s))
    }
}

/// A record type served by one entity collection.
pub trait EntityRecord: DeserializeOwned + Send {
    const KIND: EntityKind;

    fn id(&self) -> &str;
}

macro_rules! entity_record {
    ($record:ty, $kind:expr) => {
        impl EntityRecord for $record {
            const KIND: EntityKind = $kind;

            fn id(&self) -> &str {
                &self.id
            }
        }
    };
}

entity_record!(BoardMemberRecord, EntityKind::BoardMembers);
entity_record!(ArticleRecord, EntityKind::Articles);
entity_record!(EventRecord, EntityKind::Events);
entity_record!(PodcastRecord, EntityKind::Podcasts);
entity_record!(ReelRecord, EntityKind::Reels);
entity_record!(HonoreeRecord, EntityKind::Honorees);
entity_record!(ProjectRecord, EntityKind::Projects);

/// Pagination and filter parameters for list endpoints.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListQuery {
    pub page: u32,
    pub limit: u32,
    pub labels: Vec<String>,
    pub generation: Option<String>,
    pub status: Option<String>,
    pub mode: Option<String>,
}

impl Default for ListQuery {
    fn default() -> Self {
        Self {
            page: 1,
            limit: DEFAULT_PAGE_LIMIT,
            labels: Vec::new(),
            generation: None,
            status: None,
            mode: None,
        }
    }
}

impl ListQuery {
    pub fn page(page: u32, limit: u32) -> Self {
        Self {
            page,
            limit,
            ..Self::default()
        }
    }

    pub fn with_generation(mut self, generation: impl Into<String>) -> Self {
        self.generation = Some(generation.into());
        self
    }

    /// Query string pairs; empty filters are omitted.
    pub fn to_query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut query = vec![
            ("page", self.page.max(1).to_string()),
            ("limit", self.limit.max(1).to_string()),
        ];
        let labels: Vec<&str> = self
            .labels
            .iter()
            .map(|l| l.trim())
            .filter(|l| !l.is_empty())
            .collect();
        if !labels.is_empty() {
            query.push(("labels", labels.join(",")));
        }
        if let Some(generation) = self.generation.as_deref().filter(|g| !g.is_empty()) {
            query.push(("generation", generation.to_string()));
        }
        if let Some(status) = self.status.as_deref().filter(|s| !s.is_empty()) {
            query.push(("status", status.to_string()));
        }
        if let Some(mode) = self.mode.as_deref().filter(|m| !m.is_empty()) {
            query.push(("mode", mode.to_string()));
        }
        query
    }
}

/// One page of a list response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page<T> {
    #[serde(alias = "items")]
    pub data: Vec<T>,
    #[serde(default)]
    pub page: u32,
    #[serde(default)]
    pub limit: u32,
    #[serde(default)]
    pub total: u64,
}
