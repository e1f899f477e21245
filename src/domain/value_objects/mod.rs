//! Value objects - Immutable objects defined by their attributes

mod ability;
mod engine;
mod ids;
mod library_query;
mod section;

pub use ability::{parse_seed, sanitize_seed, Ability, AbilityAssignment, AbilityRoll, AbilitySet};
pub use engine::GenerationEngine;
pub use ids::*;
pub use library_query::{clamp_page, page_count, LibrarySort, ListQuery};
pub use section::{EntityKind, Section};
