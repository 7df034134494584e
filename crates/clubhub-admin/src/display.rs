//! Which board generation the public site shows
//!
//! `DisplayContext` is created once by the application root and handed to every
//! consumer. Consumers hold a `watch::Receiver` and see each change; only `load`
//! and `publish` write to the channel.

use std::sync::Arc;

use clubhub_api_client::ApiError;
use clubhub_core::models::DisplaySettings;
use tokio::sync::watch;

use crate::gateway::SettingsStore;

pub struct DisplayContext {
    store: Arc<dyn SettingsStore>,
    visible: watch::Sender<Option<String>>,
}

impl DisplayContext {
    pub fn new(store: Arc<dyn SettingsStore>) -> Self {
        let (visible, _) = watch::channel(None);
        Self { store, visible }
    }

    pub fn subscribe(&self) -> watch::Receiver<Option<String>> {
        self.visible.subscribe()
    }

    /// Generation currently shown, as last loaded or published.
    pub fn current(&self) -> Option<String> {
        self.visible.borrow().clone()
    }

    /// Read the stored setting and broadcast it.
    pub async fn load(&self) -> Result<Option<String>, ApiError> {
        let settings = self.store.load_settings().await?;
        self.visible.send_replace(settings.visible_generation.clone());
        Ok(settings.visible_generation)
    }

    /// Store a new visible generation and broadcast what the server kept.
    ///
    /// Subscribers are not notified when the write fails.
    pub async fn publish(&self, generation: Option<String>) -> Result<Option<String>, ApiError> {
        let generation = generation
            .map(|g| g.trim().to_string())
            .filter(|g| !g.is_empty());
        let saved = self
            .store
            .save_settings(&DisplaySettings {
                visible_generation: generation,
            })
            .await?;
        tracing::info!(
            visible_generation = ?saved.visible_generation,
            "Display generation updated"
        );
        self.visible.send_replace(saved.visible_generation.clone());
        Ok(saved.visible_generation)
    }
}
