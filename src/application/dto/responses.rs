//! Response bodies returned by the Forge API

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::domain::entities::{
    BackstoryResult, CharacterDraft, Creature, MagicItem, ProgressionPlan, Spell,
};
use crate::domain::value_objects::{
    CharacterId, CreatureId, MagicItemId, ProgressionId, SpellId,
};

/// Full saved character as returned by `library/get`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CharacterRecord {
    pub id: CharacterId,
    pub name: String,
    pub created_at: String,
    pub draft: CharacterDraft,
    #[serde(default)]
    pub backstory: Option<BackstoryResult>,
    #[serde(default)]
    pub progression: Option<ProgressionPlan>,
    #[serde(default)]
    pub portrait_base64: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MagicItemRecord {
    pub id: MagicItemId,
    pub name: String,
    pub created_at: String,
    pub item: MagicItem,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpellRecord {
    pub id: SpellId,
    pub name: String,
    pub created_at: String,
    pub spell: Spell,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreatureRecord {
    pub id: CreatureId,
    pub name: String,
    pub created_at: String,
    pub creature: Creature,
    #[serde(default)]
    pub portrait_base64: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressionRecord {
    pub id: ProgressionId,
    pub name: String,
    pub created_at: String,
    pub plan: ProgressionPlan,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteAck {
    pub ok: bool,
}

/// `/health`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthStatus {
    pub ok: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageModelInfo {
    pub model: String,
    pub base_model: String,
    pub device: String,
    pub dtype: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextModelInfo {
    pub url: String,
    pub model: String,
    pub reachable: bool,
}

/// `/health/model` - local inference availability
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelHealth {
    pub mode_default: String,
    pub image: ImageModelInfo,
    pub text: TextModelInfo,
}

/// A binary download with the filename it should be saved under
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportFile {
    pub filename: String,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

impl ExportFile {
    pub fn new(filename: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            filename: filename.into(),
            content_type: None,
            bytes,
        }
    }

    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }
}

/// Download formats offered for a record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExportFormat {
    Json,
    Markdown,
    Pdf,
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Markdown => "md",
            Self::Pdf => "pdf",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "md" | "markdown" => Ok(Self::Markdown),
            "pdf" => Ok(Self::Pdf),
            other => Err(format!("Unknown export format: {}", other)),
        }
    }
}
