//! Domain services - Pure rules that need no I/O

pub mod class_priorities;
pub mod invalidation;
pub mod naming;

pub use class_priorities::{auto_assignment_for_class, can_generate, can_roll};
pub use invalidation::{invalidated_by, DerivedState};
pub use naming::{default_character_name, file_stem, filename_from_disposition, title_case};
