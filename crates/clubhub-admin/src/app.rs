//! Wiring of the admin services from configuration.

use std::sync::Arc;

use clubhub_api_client::{ApiClient, ApiError};
use clubhub_core::Config;
use clubhub_storage::StorageError;
use thiserror::Error;

use crate::display::DisplayContext;
use crate::generations::GenerationCatalog;
use crate::orchestrator::FormOrchestrator;
use crate::uploader::StorageAssets;

#[derive(Debug, Error)]
pub enum SetupError {
    #[error("API client setup failed: {0}")]
    Api(#[from] ApiError),

    #[error("Storage setup failed: {0}")]
    Storage(#[from] StorageError),
}

/// Root owner of the admin services. Everything else borrows from here.
pub struct AdminApp {
    api: Arc<ApiClient>,
    assets: Arc<StorageAssets>,
    catalog: Arc<GenerationCatalog>,
    display: DisplayContext,
}

impl AdminApp {
    pub async fn from_config(config: &Config) -> Result<Self, SetupError> {
        let api = Arc::new(ApiClient::from_config(config)?);
        let assets = Arc::new(StorageAssets::from_config(config).await?);
        Ok(Self::new(api, assets))
    }

    pub fn new(api: Arc<ApiClient>, assets: Arc<StorageAssets>) -> Self {
        let catalog = Arc::new(GenerationCatalog::new(api.clone()));
        let display = DisplayContext::new(api.clone());
        Self {
            api,
            assets,
            catalog,
            display,
        }
    }

    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    pub fn assets(&self) -> &StorageAssets {
        &self.assets
    }

    pub fn generations(&self) -> &Arc<GenerationCatalog> {
        &self.catalog
    }

    pub fn display(&self) -> &DisplayContext {
        &self.display
    }

    /// A fresh orchestrator for one form instance.
    pub fn orchestrator(&self) -> FormOrchestrator {
        FormOrchestrator::new(self.assets.clone(), self.assets.clone(), self.api.clone())
            .with_generation_catalog(self.catalog.clone())
            .with_max_file_size(self.assets.limits().max_size_bytes)
    }
}
