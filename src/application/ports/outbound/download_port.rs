use std::path::PathBuf;

use async_trait::async_trait;

use crate::application::dto::ExportFile;

#[derive(Debug, thiserror::Error)]
pub enum DownloadError {
    #[error("Failed to write {path}: {message}")]
    Write { path: PathBuf, message: String },
}

/// Destination for exported files
#[async_trait]
pub trait DownloadPort: Send + Sync {
    /// Store `file`, returning where it ended up
    async fn deliver(&self, file: &ExportFile) -> Result<PathBuf, DownloadError>;
}
