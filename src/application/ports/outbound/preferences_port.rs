use async_trait::async_trait;

use crate::domain::value_objects::GenerationEngine;

#[derive(Debug, thiserror::Error)]
pub enum PreferencesError {
    #[error("Storage error: {0}")]
    Storage(String),
    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Settings that survive a restart
#[async_trait]
pub trait PreferencesPort: Send + Sync {
    /// `None` when nothing has been stored yet
    async fn load_engine(&self) -> Result<Option<GenerationEngine>, PreferencesError>;
    async fn save_engine(&self, engine: GenerationEngine) -> Result<(), PreferencesError>;
}
