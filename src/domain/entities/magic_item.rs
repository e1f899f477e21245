//! Magic item entity

use serde::{Deserialize, Serialize};

/// Generated magic item
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MagicItem {
    pub name: String,
    pub item_type: String,
    pub rarity: String,
    #[serde(default)]
    pub requires_attunement: bool,
    pub description: String,
    #[serde(default)]
    pub properties: Vec<String>,
    #[serde(default)]
    pub charges: Option<i32>,
    #[serde(default)]
    pub bonus: Option<i32>,
    #[serde(default)]
    pub damage: Option<String>,
}

impl MagicItem {
    /// Markdown card rendered locally for download
    pub fn to_markdown(&self) -> String {
        let mut md = format!(
            "# {}\n\n- Type: {}\n- Rarity: {}\n- Attunement: {}\n\n## Description\n{}\n\n",
            self.name,
            self.item_type,
            self.rarity,
            if self.requires_attunement { "Yes" } else { "No" },
            self.description
        );
        if !self.properties.is_empty() {
            md.push_str("## Properties\n- ");
            md.push_str(&self.properties.join("\n- "));
            md.push('\n');
        }
        md
    }
}
