//! Generation engine selection

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Backend used to fulfil generative (text/image) requests
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum GenerationEngine {
    /// Cloud-hosted models
    #[default]
    #[serde(rename = "google")]
    Cloud,
    /// Locally hosted inference
    #[serde(rename = "local")]
    Local,
}

impl GenerationEngine {
    /// Value sent in the `engine` query parameter
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Cloud => "google",
            Self::Local => "local",
        }
    }

    pub fn toggled(&self) -> Self {
        match self {
            Self::Cloud => Self::Local,
            Self::Local => Self::Cloud,
        }
    }
}

impl fmt::Display for GenerationEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GenerationEngine {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "google" | "cloud" => Ok(Self::Cloud),
            "local" => Ok(Self::Local),
            other => Err(format!("Unknown engine: {}", other)),
        }
    }
}
