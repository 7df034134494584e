//! Entity persistence seam
//!
//! The orchestrator, generation catalog and display context talk to the club API
//! through these traits. `ApiClient` implements them; tests use in-memory doubles.

use async_trait::async_trait;
use clubhub_api_client::{ApiClient, ApiError};
use clubhub_core::models::{DisplaySettings, EntityKind};
use serde_json::Value;

/// Create/update endpoints, with bodies already serialized to JSON.
#[async_trait]
pub trait EntityGateway: Send + Sync {
    async fn create(&self, kind: EntityKind, payload: Value) -> Result<Value, ApiError>;

    async fn update(&self, kind: EntityKind, id: &str, payload: Value) -> Result<Value, ApiError>;
}

/// Known generation keys of grouped collections.
#[async_trait]
pub trait GenerationSource: Send + Sync {
    async fn generations(&self, kind: EntityKind) -> Result<Vec<String>, ApiError>;
}

/// The global display settings record.
#[async_trait]
pub trait SettingsStore: Send + Sync {
    async fn load_settings(&self) -> Result<DisplaySettings, ApiError>;

    async fn save_settings(&self, settings: &DisplaySettings) -> Result<DisplaySettings, ApiError>;
}

#[async_trait]
impl EntityGateway for ApiClient {
    async fn create(&self, kind: EntityKind, payload: Value) -> Result<Value, ApiError> {
        ApiClient::create(self, kind, &payload).await
    }

    async fn update(&self, kind: EntityKind, id: &str, payload: Value) -> Result<Value, ApiError> {
        ApiClient::update(self, kind, id, &payload).await
    }
}

#[async_trait]
impl GenerationSource for ApiClient {
    async fn generations(&self, kind: EntityKind) -> Result<Vec<String>, ApiError> {
        ApiClient::generations(self, kind).await
    }
}

#[async_trait]
impl SettingsStore for ApiClient {
    async fn load_settings(&self) -> Result<DisplaySettings, ApiError> {
        self.settings().await
    }

    async fn save_settings(&self, settings: &DisplaySettings) -> Result<DisplaySettings, ApiError> {
        ApiClient::save_settings(self, settings).await
    }
}
