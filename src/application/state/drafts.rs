//! Working drafts for the single-record slices (items, spells, creatures)

use super::preview::{PortraitCache, PreviewStore};
use crate::domain::entities::Creature;
use crate::domain::value_objects::{CreatureId, RecordId};

/// A generated or loaded record, plus the library id it is tied to
#[derive(Debug, Clone, PartialEq)]
pub struct DraftSlot<I, T> {
    draft: Option<T>,
    open_record: Option<I>,
}

impl<I, T> Default for DraftSlot<I, T> {
    fn default() -> Self {
        Self {
            draft: None,
            open_record: None,
        }
    }
}

impl<I: RecordId, T> DraftSlot<I, T> {
    pub fn draft(&self) -> Option<&T> {
        self.draft.as_ref()
    }

    pub fn open_record(&self) -> Option<I> {
        self.open_record
    }

    /// A freshly generated draft is not tied to any saved record
    pub fn set_generated(&mut self, draft: T) {
        self.draft = Some(draft);
        self.open_record = None;
    }

    pub fn set_loaded(&mut self, id: I, draft: T) {
        self.draft = Some(draft);
        self.open_record = Some(id);
    }

    pub fn mark_saved(&mut self, id: I) {
        if self.draft.is_some() {
            self.open_record = Some(id);
        }
    }

    pub fn clear(&mut self) {
        self.draft = None;
        self.open_record = None;
    }

    /// Clear the draft only if it belongs to `id`
    pub fn clear_if_open(&mut self, id: I) -> bool {
        if self.open_record == Some(id) {
            self.clear();
            true
        } else {
            false
        }
    }
}

/// Creature draft with its portrait
#[derive(Debug)]
pub struct CreatureDraft {
    pub slot: DraftSlot<CreatureId, Creature>,
    pub portrait: PortraitCache,
}

impl CreatureDraft {
    pub fn new(previews: PreviewStore) -> Self {
        Self {
            slot: DraftSlot::default(),
            portrait: PortraitCache::new(previews),
        }
    }

    /// A new creature never inherits the old one's portrait
    pub fn set_generated(&mut self, creature: Creature) {
        self.portrait.clear();
        self.slot.set_generated(creature);
    }

    pub fn clear(&mut self) {
        self.portrait.clear();
        self.slot.clear();
    }

    pub fn clear_if_open(&mut self, id: CreatureId) -> bool {
        let cleared = self.slot.clear_if_open(id);
        if cleared {
            self.portrait.clear();
        }
        cleared
    }
}
