//! Navigational sections of the client

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Which panel the user is looking at
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Section {
    #[default]
    #[serde(rename = "home")]
    Home,
    #[serde(rename = "char-new")]
    CharacterNew,
    #[serde(rename = "char-lib")]
    CharacterLibrary,
    #[serde(rename = "item-new")]
    ItemNew,
    #[serde(rename = "item-lib")]
    ItemLibrary,
    #[serde(rename = "spell-new")]
    SpellNew,
    #[serde(rename = "spell-lib")]
    SpellLibrary,
    #[serde(rename = "creature-new")]
    CreatureNew,
    #[serde(rename = "creature-lib")]
    CreatureLibrary,
}

/// The entity kinds that own a draft and a library
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Character,
    MagicItem,
    Spell,
    Creature,
}

impl Section {
    pub const ALL: [Section; 9] = [
        Section::Home,
        Section::CharacterNew,
        Section::CharacterLibrary,
        Section::ItemNew,
        Section::ItemLibrary,
        Section::SpellNew,
        Section::SpellLibrary,
        Section::CreatureNew,
        Section::CreatureLibrary,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Home => "home",
            Self::CharacterNew => "char-new",
            Self::CharacterLibrary => "char-lib",
            Self::ItemNew => "item-new",
            Self::ItemLibrary => "item-lib",
            Self::SpellNew => "spell-new",
            Self::SpellLibrary => "spell-lib",
            Self::CreatureNew => "creature-new",
            Self::CreatureLibrary => "creature-lib",
        }
    }

    /// The library this section displays, if it is a library section
    pub fn library(&self) -> Option<EntityKind> {
        match self {
            Self::CharacterLibrary => Some(EntityKind::Character),
            Self::ItemLibrary => Some(EntityKind::MagicItem),
            Self::SpellLibrary => Some(EntityKind::Spell),
            Self::CreatureLibrary => Some(EntityKind::Creature),
            _ => None,
        }
    }

    /// The creation section for an entity kind
    pub fn new_for(kind: EntityKind) -> Self {
        match kind {
            EntityKind::Character => Self::CharacterNew,
            EntityKind::MagicItem => Self::ItemNew,
            EntityKind::Spell => Self::SpellNew,
            EntityKind::Creature => Self::CreatureNew,
        }
    }

    /// The library section for an entity kind
    pub fn library_for(kind: EntityKind) -> Self {
        match kind {
            EntityKind::Character => Self::CharacterLibrary,
            EntityKind::MagicItem => Self::ItemLibrary,
            EntityKind::Spell => Self::SpellLibrary,
            EntityKind::Creature => Self::CreatureLibrary,
        }
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Section {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Section::ALL
            .iter()
            .copied()
            .find(|section| section.as_str() == s)
            .ok_or_else(|| format!("Unknown section: {}", s))
    }
}
