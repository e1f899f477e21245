//! Request bodies sent to the Forge API

use serde::{Deserialize, Serialize};

use crate::domain::entities::{
    BackstoryLength, BackstoryResult, BackstoryTone, CharacterDraft, Creature, MagicItem,
    ProgressionPlan, ProgressionStyle, Spell,
};
use crate::domain::value_objects::{Ability, AbilityAssignment};

/// Seeds a draft generation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerateDraftRequest {
    pub class_index: String,
    pub race_index: String,
    pub background_index: String,
    pub level: u8,
    pub scores: Vec<i32>,
    pub assignment: Vec<Ability>,
}

impl GenerateDraftRequest {
    pub fn new(
        class_index: impl Into<String>,
        race_index: impl Into<String>,
        background_index: impl Into<String>,
        level: u8,
        scores: &[i32],
        assignment: &AbilityAssignment,
    ) -> Self {
        Self {
            class_index: class_index.into(),
            race_index: race_index.into(),
            background_index: background_index.into(),
            level,
            scores: scores.to_vec(),
            assignment: assignment.as_slice().to_vec(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BackstoryRequest {
    pub name: Option<String>,
    pub tone: BackstoryTone,
    pub length: BackstoryLength,
    pub include_hooks: bool,
    pub custom_inspiration: Option<String>,
    pub draft: CharacterDraft,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortraitRequest {
    pub draft: CharacterDraft,
    pub backstory: Option<BackstoryResult>,
}

/// A draft with everything attached to it, as saved or exported
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CharacterBundle {
    pub draft: CharacterDraft,
    pub backstory: Option<BackstoryResult>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub portrait_base64: Option<String>,
    pub progression: Option<ProgressionPlan>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgressionRequest {
    pub class_index: String,
    pub target_level: u8,
    pub allow_feats: bool,
    pub style: ProgressionStyle,
    pub draft: CharacterDraft,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanEnvelope {
    pub plan: ProgressionPlan,
}

/// Hints for magic item generation; all optional
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MagicItemRequest {
    pub name: Option<String>,
    pub item_type: Option<String>,
    pub rarity: Option<String>,
    pub requires_attunement: Option<bool>,
    pub prompt: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemEnvelope {
    pub item: MagicItem,
}

/// Hints for spell generation; all optional
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpellRequest {
    pub name: Option<String>,
    pub level: Option<u8>,
    pub school: Option<String>,
    pub classes: Option<Vec<String>>,
    pub target: Option<String>,
    pub intent: Option<String>,
    pub prompt: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpellEnvelope {
    pub spell: Spell,
}

/// Hints for creature generation; all optional
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatureRequest {
    pub name: Option<String>,
    pub size: Option<String>,
    pub creature_type: Option<String>,
    pub challenge_rating: Option<String>,
    pub base_stat_block: Option<String>,
    pub prompt: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreatureEnvelope {
    pub creature: Creature,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub portrait_base64: Option<String>,
}
