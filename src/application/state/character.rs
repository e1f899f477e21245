//! Working state of the character creation flow

use super::preview::{PortraitCache, PreviewStore};
use crate::application::dto::CharacterBundle;
use crate::domain::entities::{
    clamp_level, BackstoryOptions, BackstoryResult, CharacterDraft, ProgressionPlan,
    ProgressionStyle, MIN_LEVEL,
};
use crate::domain::services::{can_generate, can_roll, invalidated_by, DerivedState};
use crate::domain::value_objects::{sanitize_seed, AbilityAssignment, AbilitySet, CharacterId};

/// Knobs for progression generation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgressionOptions {
    pub target_level: u8,
    pub allow_feats: bool,
    pub style: ProgressionStyle,
}

impl Default for ProgressionOptions {
    fn default() -> Self {
        Self {
            target_level: 5,
            allow_feats: true,
            style: ProgressionStyle::default(),
        }
    }
}

#[derive(Debug)]
pub struct CharacterState {
    pub class_index: String,
    pub race_index: String,
    pub background_index: String,
    pub level: u8,
    pub seed_input: String,
    pub abilities: Option<AbilitySet>,
    pub assignment: AbilityAssignment,
    pub draft: Option<CharacterDraft>,
    pub name: String,
    pub backstory_options: BackstoryOptions,
    pub backstory: Option<BackstoryResult>,
    pub progression_options: ProgressionOptions,
    pub progression: Option<ProgressionPlan>,
    pub portrait: PortraitCache,
    /// Library id the draft was loaded from or last saved as
    pub open_record: Option<CharacterId>,
}

impl CharacterState {
    pub fn new(previews: PreviewStore) -> Self {
        Self {
            class_index: String::new(),
            race_index: String::new(),
            background_index: String::new(),
            level: MIN_LEVEL,
            seed_input: String::new(),
            abilities: None,
            assignment: AbilityAssignment::canonical(),
            draft: None,
            name: String::new(),
            backstory_options: BackstoryOptions::default(),
            backstory: None,
            progression_options: ProgressionOptions::default(),
            progression: None,
            portrait: PortraitCache::new(previews),
            open_record: None,
        }
    }

    fn clear_node(&mut self, node: DerivedState) {
        match node {
            DerivedState::Abilities => {
                self.abilities = None;
                self.assignment = AbilityAssignment::canonical();
            }
            DerivedState::Draft => {
                self.draft = None;
                self.open_record = None;
            }
            DerivedState::Name => self.name.clear(),
            DerivedState::Backstory => self.backstory = None,
            DerivedState::Portrait => self.portrait.clear(),
            DerivedState::Progression => self.progression = None,
        }
    }

    /// Clear everything derived from `changed`, leaving `changed` itself alone
    pub fn invalidate(&mut self, changed: DerivedState) {
        for node in invalidated_by(changed) {
            self.clear_node(node);
        }
    }

    /// Clear `node` and everything derived from it
    pub fn discard(&mut self, node: DerivedState) {
        self.clear_node(node);
        self.invalidate(node);
    }

    /// Install a fresh roll. The assignment goes back to canonical order.
    pub fn set_abilities(&mut self, set: AbilitySet) {
        self.invalidate(DerivedState::Abilities);
        self.abilities = Some(set);
        self.assignment = AbilityAssignment::canonical();
    }

    /// Whether the current roll and assignment are still the ones a draft
    /// request was built from
    pub fn rolled_with(&self, scores: &[i32], assignment: &AbilityAssignment) -> bool {
        self.abilities
            .as_ref()
            .is_some_and(|set| set.scores == scores)
            && self.assignment == *assignment
    }

    /// Install a new draft, dropping whatever hung off the old one
    pub fn set_draft(&mut self, draft: CharacterDraft, fallback_name: String) {
        self.invalidate(DerivedState::Draft);
        self.name = match &draft.name {
            Some(name) if !name.trim().is_empty() => name.clone(),
            _ => fallback_name,
        };
        self.draft = Some(draft);
    }

    /// Back to an empty creation form
    pub fn reset(&mut self) {
        self.class_index.clear();
        self.race_index.clear();
        self.background_index.clear();
        self.level = MIN_LEVEL;
        self.seed_input.clear();
        self.discard(DerivedState::Abilities);
    }

    pub fn set_level(&mut self, level: i64) {
        self.level = clamp_level(level);
    }

    pub fn set_seed_input(&mut self, input: &str) {
        self.seed_input = sanitize_seed(input);
    }

    pub fn can_roll(&self) -> bool {
        can_roll(&self.class_index, &self.race_index, &self.background_index)
    }

    pub fn can_generate(&self) -> bool {
        can_generate(
            self.abilities.is_some(),
            &self.class_index,
            &self.race_index,
            &self.background_index,
            &self.assignment,
        )
    }

    /// The draft with the typed name applied
    pub fn named_draft(&self) -> Option<CharacterDraft> {
        self.draft
            .as_ref()
            .map(|draft| draft.with_name_override(&self.name))
    }

    /// Draft plus attachments, as saved or exported
    pub fn bundle(&self, include_portrait: bool) -> Option<CharacterBundle> {
        let draft = self.named_draft()?;
        Some(CharacterBundle {
            draft,
            backstory: self.backstory.clone(),
            portrait_base64: if include_portrait {
                self.portrait.encoded().map(str::to_string)
            } else {
                None
            },
            progression: self.progression.clone(),
        })
    }

    pub fn snapshot(&self) -> CharacterView {
        CharacterView {
            class_index: self.class_index.clone(),
            race_index: self.race_index.clone(),
            background_index: self.background_index.clone(),
            level: self.level,
            seed_input: self.seed_input.clone(),
            abilities: self.abilities.clone(),
            assignment: self.assignment.clone(),
            draft: self.draft.clone(),
            name: self.name.clone(),
            backstory: self.backstory.clone(),
            progression: self.progression.clone(),
            portrait_url: self.portrait.url(),
            open_record: self.open_record,
            can_roll: self.can_roll(),
            can_generate: self.can_generate(),
        }
    }
}

/// Read-only copy of [`CharacterState`] for rendering
#[derive(Debug, Clone, PartialEq)]
pub struct CharacterView {
    pub class_index: String,
    pub race_index: String,
    pub background_index: String,
    pub level: u8,
    pub seed_input: String,
    pub abilities: Option<AbilitySet>,
    pub assignment: AbilityAssignment,
    pub draft: Option<CharacterDraft>,
    pub name: String,
    pub backstory: Option<BackstoryResult>,
    pub progression: Option<ProgressionPlan>,
    pub portrait_url: Option<String>,
    pub open_record: Option<CharacterId>,
    pub can_roll: bool,
    pub can_generate: bool,
}
