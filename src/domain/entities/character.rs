//! Character draft - the generated 5e sheet held before it is saved

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::domain::value_objects::Ability;

pub const MIN_LEVEL: u8 = 1;
pub const MAX_LEVEL: u8 = 20;

/// Clamp a level typed by the user into `[1, 20]`
pub fn clamp_level(level: i64) -> u8 {
    // Bounded by MAX_LEVEL.
    level.clamp(i64::from(MIN_LEVEL), i64::from(MAX_LEVEL)) as u8
}

/// Scores and modifiers for all six abilities
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AbilityBlock {
    #[serde(rename = "STR")]
    pub strength: i32,
    #[serde(rename = "DEX")]
    pub dexterity: i32,
    #[serde(rename = "CON")]
    pub constitution: i32,
    #[serde(rename = "INT")]
    pub intelligence: i32,
    #[serde(rename = "WIS")]
    pub wisdom: i32,
    #[serde(rename = "CHA")]
    pub charisma: i32,
    #[serde(rename = "STR_mod")]
    pub strength_mod: i32,
    #[serde(rename = "DEX_mod")]
    pub dexterity_mod: i32,
    #[serde(rename = "CON_mod")]
    pub constitution_mod: i32,
    #[serde(rename = "INT_mod")]
    pub intelligence_mod: i32,
    #[serde(rename = "WIS_mod")]
    pub wisdom_mod: i32,
    #[serde(rename = "CHA_mod")]
    pub charisma_mod: i32,
}

impl AbilityBlock {
    pub fn score(&self, ability: Ability) -> i32 {
        match ability {
            Ability::Str => self.strength,
            Ability::Dex => self.dexterity,
            Ability::Con => self.constitution,
            Ability::Int => self.intelligence,
            Ability::Wis => self.wisdom,
            Ability::Cha => self.charisma,
        }
    }

    pub fn modifier(&self, ability: Ability) -> i32 {
        match ability {
            Ability::Str => self.strength_mod,
            Ability::Dex => self.dexterity_mod,
            Ability::Con => self.constitution_mod,
            Ability::Int => self.intelligence_mod,
            Ability::Wis => self.wisdom_mod,
            Ability::Cha => self.charisma_mod,
        }
    }

    /// Signed modifier as printed on a sheet, e.g. `+2` or `-1`
    pub fn signed_modifier(&self, ability: Ability) -> String {
        let modifier = self.modifier(ability);
        if modifier >= 0 {
            format!("+{}", modifier)
        } else {
            modifier.to_string()
        }
    }
}

/// A proficiency granted by class, race or background
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Proficiency {
    #[serde(rename = "type")]
    pub kind: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
}

/// Generated character sheet
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CharacterDraft {
    #[serde(default)]
    pub name: Option<String>,
    pub level: u8,
    pub cls: String,
    pub race: String,
    pub background: String,
    pub hit_die: u8,
    pub proficiency_bonus: i32,
    pub abilities: AbilityBlock,
    pub speed: u32,
    #[serde(default)]
    pub saving_throws: Vec<String>,
    #[serde(default)]
    pub languages: Vec<String>,
    #[serde(default)]
    pub proficiencies: Vec<Proficiency>,
    #[serde(default)]
    pub equipment: Vec<String>,
    #[serde(default)]
    pub armor_class_basic: i32,
    #[serde(default)]
    pub features: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spell_slots: Option<BTreeMap<String, u32>>,
}

impl CharacterDraft {
    /// Apply the name typed by the user, keeping the draft's own name when blank
    pub fn with_name_override(&self, typed: &str) -> Self {
        let cleaned = typed.trim();
        let mut named = self.clone();
        if !cleaned.is_empty() {
            named.name = Some(cleaned.to_string());
        }
        named
    }

    pub fn display_name(&self) -> String {
        match &self.name {
            Some(name) if !name.trim().is_empty() => name.clone(),
            _ => format!("{} {} L{}", self.race, self.cls, self.level),
        }
    }
}
