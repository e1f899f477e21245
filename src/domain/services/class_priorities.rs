//! Class-driven ability priorities and creation gating
//!
//! Rolled scores arrive sorted high to low, so a class priority list doubles
//! as an assignment: the highest score goes to the class's primary ability.

use crate::domain::value_objects::{Ability, AbilityAssignment};

use Ability::{Cha, Con, Dex, Int, Str, Wis};

/// Priority order per dnd5eapi class index
const CLASS_PRIORITIES: [(&str, [Ability; 6]); 12] = [
    ("barbarian", [Str, Con, Dex, Wis, Cha, Int]),
    ("bard", [Cha, Dex, Con, Wis, Int, Str]),
    ("cleric", [Wis, Con, Str, Dex, Cha, Int]),
    ("druid", [Wis, Con, Dex, Int, Cha, Str]),
    ("fighter", [Str, Con, Dex, Wis, Int, Cha]),
    ("monk", [Dex, Wis, Con, Str, Int, Cha]),
    ("paladin", [Str, Cha, Con, Wis, Dex, Int]),
    ("ranger", [Dex, Wis, Con, Str, Int, Cha]),
    ("rogue", [Dex, Int, Con, Wis, Cha, Str]),
    ("sorcerer", [Cha, Con, Dex, Wis, Int, Str]),
    ("warlock", [Cha, Con, Dex, Wis, Int, Str]),
    ("wizard", [Int, Con, Dex, Wis, Cha, Str]),
];

/// Class indices with a known priority order
pub fn known_classes() -> impl Iterator<Item = &'static str> {
    CLASS_PRIORITIES.iter().map(|(class, _)| *class)
}

/// Default assignment for a class; unknown classes get the canonical order.
pub fn auto_assignment_for_class(class_index: &str) -> AbilityAssignment {
    CLASS_PRIORITIES
        .iter()
        .find(|(class, _)| *class == class_index)
        .and_then(|(_, order)| AbilityAssignment::from_order(order))
        .unwrap_or_default()
}

/// Class, race and background are all picked
pub fn can_roll(class_index: &str, race_index: &str, background_index: &str) -> bool {
    !class_index.is_empty() && !race_index.is_empty() && !background_index.is_empty()
}

/// Everything a draft generation request needs is present
pub fn can_generate(
    has_ability_set: bool,
    class_index: &str,
    race_index: &str,
    background_index: &str,
    assignment: &AbilityAssignment,
) -> bool {
    has_ability_set
        && can_roll(class_index, race_index, background_index)
        && assignment.len() == Ability::ALL.len()
}
