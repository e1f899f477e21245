//! Generation engine choice and backend health

use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::{info, instrument, warn};

use crate::application::dto::ModelHealth;
use crate::application::error::ForgeError;
use crate::application::ports::outbound::{ForgeApiPort, PreferencesPort};
use crate::domain::value_objects::GenerationEngine;

/// Last observed backend availability; `None` until the first poll
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BackendHealth {
    pub api_ok: Option<bool>,
    pub model: Option<ModelHealth>,
}

pub struct EngineService {
    api: Arc<dyn ForgeApiPort>,
    preferences: Arc<dyn PreferencesPort>,
    engine: RwLock<GenerationEngine>,
    health: RwLock<BackendHealth>,
}

impl EngineService {
    /// Read the stored choice once. Unreadable preferences fall back to the cloud engine.
    pub async fn load(api: Arc<dyn ForgeApiPort>, preferences: Arc<dyn PreferencesPort>) -> Self {
        let engine = match preferences.load_engine().await {
            Ok(stored) => stored.unwrap_or_default(),
            Err(err) => {
                warn!(error = %err, "Could not read engine preference");
                GenerationEngine::default()
            }
        };
        info!(engine = %engine, "Generation engine");
        Self {
            api,
            preferences,
            engine: RwLock::new(engine),
            health: RwLock::new(BackendHealth::default()),
        }
    }

    pub async fn current(&self) -> GenerationEngine {
        *self.engine.read().await
    }

    pub async fn health(&self) -> BackendHealth {
        self.health.read().await.clone()
    }

    /// Switch engines, persist the choice and re-poll health.
    ///
    /// The in-memory choice changes even if persisting it fails.
    #[instrument(skip(self))]
    pub async fn set_engine(&self, engine: GenerationEngine) -> Result<(), ForgeError> {
        *self.engine.write().await = engine;
        let persisted = self.preferences.save_engine(engine).await;
        self.poll_health().await;
        persisted?;
        info!(engine = %engine, "Switched generation engine");
        Ok(())
    }

    pub async fn toggle(&self) -> Result<GenerationEngine, ForgeError> {
        let next = self.current().await.toggled();
        self.set_engine(next).await?;
        Ok(next)
    }

    /// Poll `/health` and `/health/model`. Failures mark the backend offline.
    pub async fn poll_health(&self) -> BackendHealth {
        let (api, model) = tokio::join!(self.api.health(), self.api.model_health());
        let api_ok = match api {
            Ok(status) => status.ok,
            Err(err) => {
                warn!(error = %err, "Backend health check failed");
                false
            }
        };
        let model = model
            .map_err(|err| warn!(error = %err, "Model health check failed"))
            .ok();
        let health = BackendHealth {
            api_ok: Some(api_ok),
            model,
        };
        *self.health.write().await = health.clone();
        health
    }
}
