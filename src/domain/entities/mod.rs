//! Domain entities - Generated records and the listings that hold them
//!
//! These types double as the Forge API's JSON contract, so they carry serde
//! derives with the wire field names.

mod backstory;
mod character;
mod creature;
mod library;
mod magic_item;
mod progression;
mod rules;
mod spell;

pub use backstory::{BackstoryLength, BackstoryOptions, BackstoryResult, BackstoryTone};
pub use character::{clamp_level, AbilityBlock, CharacterDraft, Proficiency, MAX_LEVEL, MIN_LEVEL};
pub use creature::Creature;
pub use library::{LibraryRow, ListResponse, SavedRecord};
pub use magic_item::MagicItem;
pub use progression::{LevelPick, ProgressionPlan, ProgressionStyle};
pub use rules::{RuleCatalog, RuleList, RuleRef};
pub use spell::Spell;
