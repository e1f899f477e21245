//! JSON file storage for user preferences

use std::io::ErrorKind;
use std::path::PathBuf;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::application::ports::outbound::{PreferencesError, PreferencesPort};
use crate::domain::value_objects::GenerationEngine;

#[derive(Debug, Default, Serialize, Deserialize)]
struct StoredPreferences {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    engine: Option<GenerationEngine>,
}

/// Preferences kept in a single JSON document on disk
pub struct FilePreferences {
    path: PathBuf,
}

impl FilePreferences {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    async fn read(&self) -> Result<StoredPreferences, PreferencesError> {
        match tokio::fs::read(&self.path).await {
            Ok(bytes) => serde_json::from_slice(&bytes)
                .map_err(|e| PreferencesError::Serialization(e.to_string())),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(StoredPreferences::default()),
            Err(e) => Err(PreferencesError::Storage(e.to_string())),
        }
    }
}

#[async_trait]
impl PreferencesPort for FilePreferences {
    async fn load_engine(&self) -> Result<Option<GenerationEngine>, PreferencesError> {
        Ok(self.read().await?.engine)
    }

    async fn save_engine(&self, engine: GenerationEngine) -> Result<(), PreferencesError> {
        // Unreadable files are replaced rather than blocking the save.
        let mut stored = self.read().await.unwrap_or_default();
        stored.engine = Some(engine);

        let json = serde_json::to_vec_pretty(&stored)
            .map_err(|e| PreferencesError::Serialization(e.to_string()))?;
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| PreferencesError::Storage(e.to_string()))?;
        }
        tokio::fs::write(&self.path, json)
            .await
            .map_err(|e| PreferencesError::Storage(e.to_string()))?;
        debug!(path = %self.path.display(), engine = %engine, "Saved engine preference");
        Ok(())
    }
}
