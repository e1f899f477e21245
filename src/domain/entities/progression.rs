//! Level progression plans

use serde::{Deserialize, Serialize};

/// Play style hint for the progression planner
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProgressionStyle {
    Martial,
    Caster,
    Face,
    #[default]
    Balanced,
}

/// Choices made at one level
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelPick {
    pub level: u8,
    #[serde(default)]
    pub hp_gain: Option<i32>,
    #[serde(default)]
    pub features: Vec<String>,
    #[serde(default)]
    pub subclass: Option<String>,
    #[serde(default)]
    pub asi: Option<String>,
    #[serde(default)]
    pub spells_known: Vec<String>,
    #[serde(default)]
    pub prepared: Vec<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

/// Per-level advancement schedule up to a target level
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressionPlan {
    #[serde(default)]
    pub name: Option<String>,
    pub class_index: String,
    pub target_level: u8,
    #[serde(default)]
    pub picks: Vec<LevelPick>,
    #[serde(default)]
    pub notes_markdown: String,
}

impl ProgressionPlan {
    pub fn pick_for(&self, level: u8) -> Option<&LevelPick> {
        self.picks.iter().find(|p| p.level == level)
    }
}
