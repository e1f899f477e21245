//! Navigation state and its query-string form
//!
//! Keys: `sec` for the section, then page/search/sort per library with the
//! prefixes `c` (characters), `i` (items), `s` (spells) and `k` (creatures).

use url::form_urlencoded;

use super::library::LibraryParams;
use crate::domain::value_objects::{EntityKind, LibrarySort, Section};

/// Everything that is mirrored into the URL
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionSnapshot {
    pub section: Section,
    pub characters: LibraryParams,
    pub items: LibraryParams,
    pub spells: LibraryParams,
    pub creatures: LibraryParams,
}

impl SessionSnapshot {
    pub fn library(&self, kind: EntityKind) -> &LibraryParams {
        match kind {
            EntityKind::Character => &self.characters,
            EntityKind::MagicItem => &self.items,
            EntityKind::Spell => &self.spells,
            EntityKind::Creature => &self.creatures,
        }
    }

    fn library_mut(&mut self, kind: EntityKind) -> &mut LibraryParams {
        match kind {
            EntityKind::Character => &mut self.characters,
            EntityKind::MagicItem => &mut self.items,
            EntityKind::Spell => &mut self.spells,
            EntityKind::Creature => &mut self.creatures,
        }
    }
}

const LIBRARY_KEYS: [(EntityKind, char); 4] = [
    (EntityKind::Character, 'c'),
    (EntityKind::MagicItem, 'i'),
    (EntityKind::Spell, 's'),
    (EntityKind::Creature, 'k'),
];

fn kind_for_prefix(prefix: char) -> Option<EntityKind> {
    LIBRARY_KEYS
        .iter()
        .find(|(_, p)| *p == prefix)
        .map(|(kind, _)| *kind)
}

/// Serialize a snapshot; every key is always written
pub fn to_query_string(snapshot: &SessionSnapshot) -> String {
    let mut serializer = form_urlencoded::Serializer::new(String::new());
    serializer.append_pair("sec", snapshot.section.as_str());
    for (kind, prefix) in LIBRARY_KEYS {
        let params = snapshot.library(kind);
        serializer.append_pair(&format!("{}p", prefix), &params.page.to_string());
        serializer.append_pair(&format!("{}s", prefix), &params.search);
        serializer.append_pair(&format!("{}o", prefix), params.sort.as_str());
    }
    serializer.finish()
}

/// Parse a query string, with or without the leading `?`.
///
/// Missing or unknown values fall back to their defaults one key at a time.
pub fn from_query_string(query: &str) -> SessionSnapshot {
    let query = query.strip_prefix('?').unwrap_or(query);
    let mut snapshot = SessionSnapshot::default();
    for (key, value) in form_urlencoded::parse(query.as_bytes()) {
        if key == "sec" {
            snapshot.section = value.parse().unwrap_or_default();
            continue;
        }
        let mut chars = key.chars();
        let (Some(prefix), Some(field), None) = (chars.next(), chars.next(), chars.next()) else {
            continue;
        };
        let Some(kind) = kind_for_prefix(prefix) else {
            continue;
        };
        let params = snapshot.library_mut(kind);
        match field {
            'p' => {
                if let Ok(page) = value.parse::<u32>() {
                    if page >= 1 {
                        params.page = page;
                    }
                }
            }
            's' => params.search = value.into_owned(),
            'o' => {
                if let Ok(sort) = value.parse::<LibrarySort>() {
                    params.sort = sort;
                }
            }
            _ => {}
        }
    }
    snapshot
}
