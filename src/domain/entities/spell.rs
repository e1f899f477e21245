//! Spell entity

use serde::{Deserialize, Serialize};

/// Generated spell
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Spell {
    pub name: String,
    pub level: u8,
    pub school: String,
    #[serde(default)]
    pub classes: Vec<String>,
    pub casting_time: String,
    pub range: String,
    pub duration: String,
    pub components: String,
    #[serde(default)]
    pub concentration: bool,
    #[serde(default)]
    pub ritual: bool,
    pub description: String,
    #[serde(default)]
    pub damage: Option<String>,
    #[serde(default)]
    pub save: Option<String>,
}

impl Spell {
    pub fn to_markdown(&self) -> String {
        let yes_no = |flag: bool| if flag { "Yes" } else { "No" };
        let mut md = format!(
            "# {} (Level {} {})\n\n- Classes: {}\n- Casting Time: {}\n- Range: {}\n- Duration: {}\n- Components: {}\n- Concentration: {}\n- Ritual: {}\n\n{}\n\n",
            self.name,
            self.level,
            self.school,
            self.classes.join(", "),
            self.casting_time,
            self.range,
            self.duration,
            self.components,
            yes_no(self.concentration),
            yes_no(self.ritual),
            self.description
        );
        if let Some(damage) = &self.damage {
            md.push_str(&format!("Damage: {}\n", damage));
        }
        if let Some(save) = &self.save {
            md.push_str(&format!("Save: {}\n", save));
        }
        md
    }
}
