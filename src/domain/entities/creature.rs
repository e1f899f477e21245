//! Creature (monster / NPC stat block) entity

use serde::{Deserialize, Serialize};

use crate::domain::entities::AbilityBlock;
use crate::domain::value_objects::Ability;

/// Generated creature stat block
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Creature {
    pub name: String,
    pub size: String,
    pub creature_type: String,
    pub challenge_rating: String,
    pub armor_class: i32,
    pub hit_points: i32,
    pub hit_dice: String,
    pub speed: String,
    pub ability_scores: AbilityBlock,
    #[serde(default)]
    pub saving_throws: Vec<String>,
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default)]
    pub damage_resistances: Vec<String>,
    #[serde(default)]
    pub damage_immunities: Vec<String>,
    #[serde(default)]
    pub condition_immunities: Vec<String>,
    #[serde(default)]
    pub senses: String,
    #[serde(default)]
    pub languages: Vec<String>,
    #[serde(default)]
    pub traits: Vec<String>,
    #[serde(default)]
    pub actions: Vec<String>,
    #[serde(default)]
    pub spells: Vec<String>,
    pub description: String,
}

impl Creature {
    pub fn to_markdown(&self) -> String {
        let mut md = format!(
            "# {}\n\n- Size: {}\n- Type: {}\n- Challenge Rating: {}\n- Armor Class: {}\n- Hit Points: {} ({})\n- Speed: {}\n\n## Ability Scores\n",
            self.name,
            self.size,
            self.creature_type,
            self.challenge_rating,
            self.armor_class,
            self.hit_points,
            self.hit_dice,
            self.speed
        );
        for ability in Ability::ALL {
            md.push_str(&format!(
                "- {}: {} ({})\n",
                ability,
                self.ability_scores.score(ability),
                self.ability_scores.signed_modifier(ability)
            ));
        }
        md.push('\n');

        push_list(&mut md, "Saving Throws", &self.saving_throws, "\n- ");
        push_list(&mut md, "Skills", &self.skills, "\n- ");
        push_list(&mut md, "Damage Resistances", &self.damage_resistances, ", ");
        push_list(&mut md, "Damage Immunities", &self.damage_immunities, ", ");
        push_list(&mut md, "Condition Immunities", &self.condition_immunities, ", ");
        md.push_str(&format!("## Senses\n{}\n\n", self.senses));
        push_list(&mut md, "Languages", &self.languages, ", ");
        push_list(&mut md, "Traits", &self.traits, "\n- ");
        push_list(&mut md, "Actions", &self.actions, "\n- ");
        push_list(&mut md, "Spells", &self.spells, ", ");
        md.push_str(&format!("## Description\n{}\n", self.description));
        md
    }
}

fn push_list(md: &mut String, heading: &str, entries: &[String], separator: &str) {
    if entries.is_empty() {
        return;
    }
    md.push_str(&format!("## {}\n- {}\n\n", heading, entries.join(separator)));
}
