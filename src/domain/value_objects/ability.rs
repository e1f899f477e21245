//! Ability identifiers, rolled ability sets and score assignments

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// One of the six 5e abilities
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Ability {
    Str,
    Dex,
    Con,
    Int,
    Wis,
    Cha,
}

impl Ability {
    /// Canonical order used whenever no better assignment is known
    pub const ALL: [Ability; 6] = [
        Ability::Str,
        Ability::Dex,
        Ability::Con,
        Ability::Int,
        Ability::Wis,
        Ability::Cha,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Str => "STR",
            Self::Dex => "DEX",
            Self::Con => "CON",
            Self::Int => "INT",
            Self::Wis => "WIS",
            Self::Cha => "CHA",
        }
    }
}

impl fmt::Display for Ability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Ability {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "STR" => Ok(Self::Str),
            "DEX" => Ok(Self::Dex),
            "CON" => Ok(Self::Con),
            "INT" => Ok(Self::Int),
            "WIS" => Ok(Self::Wis),
            "CHA" => Ok(Self::Cha),
            other => Err(format!("Unknown ability: {}", other)),
        }
    }
}

/// Dice detail for a single rolled score (4d6, lowest dropped)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AbilityRoll {
    pub dice: Vec<u8>,
    pub dropped_index: usize,
    pub total: i32,
}

/// Six rolled scores, sorted descending, with the method that produced them
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AbilitySet {
    pub method: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
    #[serde(default)]
    pub rolls: Vec<AbilityRoll>,
    pub scores: Vec<i32>,
}

impl AbilitySet {
    /// Rebuild a set from scores read back off a saved sheet
    pub fn loaded(scores: impl IntoIterator<Item = i32>) -> Self {
        let mut scores: Vec<i32> = scores.into_iter().collect();
        scores.sort_unstable_by(|a, b| b.cmp(a));
        Self {
            method: "loaded".to_string(),
            seed: None,
            rolls: Vec::new(),
            scores,
        }
    }
}

/// Maps position `i` of an [`AbilitySet`] onto an ability.
///
/// The assignment is kept a permutation of [`Ability::ALL`]: assigning an
/// ability to a slot swaps it with whichever slot held it before.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AbilityAssignment(Vec<Ability>);

impl AbilityAssignment {
    pub fn canonical() -> Self {
        Self(Ability::ALL.to_vec())
    }

    /// Build from an explicit order. Returns `None` unless every ability appears once.
    pub fn from_order(order: &[Ability]) -> Option<Self> {
        if order.len() != Ability::ALL.len() {
            return None;
        }
        if Ability::ALL.iter().all(|a| order.contains(a)) {
            Some(Self(order.to_vec()))
        } else {
            None
        }
    }

    pub fn as_slice(&self) -> &[Ability] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn is_complete(&self) -> bool {
        self.0.len() == Ability::ALL.len()
    }

    pub fn get(&self, slot: usize) -> Option<Ability> {
        self.0.get(slot).copied()
    }

    /// Put `ability` in `slot`, swapping out the slot that previously held it.
    pub fn assign(&mut self, slot: usize, ability: Ability) -> bool {
        if slot >= self.0.len() {
            return false;
        }
        if let Some(previous) = self.0.iter().position(|a| *a == ability) {
            self.0.swap(previous, slot);
        } else {
            self.0[slot] = ability;
        }
        true
    }

    /// Derive the assignment that reproduces `scores` from a sorted set.
    ///
    /// Ties go to the first unused ability in canonical order.
    pub fn from_scores(sorted_scores: &[i32], score_of: impl Fn(Ability) -> i32) -> Self {
        let mut used: Vec<Ability> = Vec::with_capacity(Ability::ALL.len());
        for score in sorted_scores {
            if let Some(ability) = Ability::ALL
                .iter()
                .copied()
                .find(|a| score_of(*a) == *score && !used.contains(a))
            {
                used.push(ability);
            }
        }
        Self(used)
    }
}

impl Default for AbilityAssignment {
    fn default() -> Self {
        Self::canonical()
    }
}

/// Keep only the digits of a seed typed by the user
pub fn sanitize_seed(input: &str) -> String {
    input.chars().filter(|c| c.is_ascii_digit()).collect()
}

/// Parse a sanitized seed; empty means "let the server pick"
pub fn parse_seed(input: &str) -> Option<u64> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse().ok()
}
