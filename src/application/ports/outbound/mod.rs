//! Outbound ports - Interfaces the client requires from external systems

mod download_port;
mod forge_api_port;
mod preferences_port;

pub use download_port::{DownloadError, DownloadPort};
pub use forge_api_port::{ApiError, ForgeApiPort};
pub use preferences_port::{PreferencesError, PreferencesPort};
