//! Errors returned by client actions

use crate::application::ports::outbound::{ApiError, DownloadError, PreferencesError};

#[derive(Debug, thiserror::Error)]
pub enum ForgeError {
    #[error(transparent)]
    Api(#[from] ApiError),

    /// The same kind of operation is already in flight
    #[error("{0} already in progress")]
    Busy(&'static str),

    /// The action's preconditions do not hold; nothing was changed
    #[error("Not ready: {0}")]
    NotReady(&'static str),

    #[error("{0} export is not available")]
    UnsupportedExport(&'static str),

    #[error(transparent)]
    Preferences(#[from] PreferencesError),

    #[error(transparent)]
    Download(#[from] DownloadError),

    #[error("Failed to render export: {0}")]
    Render(#[from] serde_json::Error),
}

impl ForgeError {
    pub fn is_busy(&self) -> bool {
        matches!(self, Self::Busy(_))
    }

    pub fn is_not_ready(&self) -> bool {
        matches!(self, Self::NotReady(_))
    }
}
