//! Reference data (classes, races, backgrounds) fetched from the rules API

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// A named reference such as `{"index": "fighter", "name": "Fighter"}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleRef {
    pub index: String,
    pub name: String,
    #[serde(default)]
    pub url: String,
}

impl RuleRef {
    pub fn new(index: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            index: index.into(),
            name: name.into(),
            url: String::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleList {
    #[serde(default)]
    pub count: usize,
    pub results: Vec<RuleRef>,
}

/// Loaded pickers plus lowercase name→index lookups
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RuleCatalog {
    pub classes: Vec<RuleRef>,
    pub races: Vec<RuleRef>,
    pub backgrounds: Vec<RuleRef>,
    class_index: HashMap<String, String>,
    race_index: HashMap<String, String>,
    background_index: HashMap<String, String>,
}

impl RuleCatalog {
    pub fn new(classes: Vec<RuleRef>, races: Vec<RuleRef>, backgrounds: Vec<RuleRef>) -> Self {
        Self {
            class_index: by_name(&classes),
            race_index: by_name(&races),
            background_index: by_name(&backgrounds),
            classes,
            races,
            backgrounds,
        }
    }

    pub fn is_loaded(&self) -> bool {
        !self.classes.is_empty() && !self.races.is_empty() && !self.backgrounds.is_empty()
    }

    pub fn class_index_for(&self, name: &str) -> Option<&str> {
        self.class_index.get(&name.to_lowercase()).map(String::as_str)
    }

    pub fn race_index_for(&self, name: &str) -> Option<&str> {
        self.race_index.get(&name.to_lowercase()).map(String::as_str)
    }

    pub fn background_index_for(&self, name: &str) -> Option<&str> {
        self.background_index
            .get(&name.to_lowercase())
            .map(String::as_str)
    }
}

fn by_name(refs: &[RuleRef]) -> HashMap<String, String> {
    refs.iter()
        .map(|r| (r.name.to_lowercase(), r.index.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_lookup_is_case_insensitive() {
        let catalog = RuleCatalog::new(
            vec![RuleRef::new("fighter", "Fighter")],
            vec![RuleRef::new("half-elf", "Half-Elf")],
            vec![RuleRef::new("acolyte", "Acolyte")],
        );
        assert!(catalog.is_loaded());
        assert_eq!(catalog.class_index_for("FIGHTER"), Some("fighter"));
        assert_eq!(catalog.race_index_for("half-elf"), Some("half-elf"));
        assert_eq!(catalog.background_index_for("Sage"), None);
        assert!(!RuleCatalog::default().is_loaded());
    }
}
