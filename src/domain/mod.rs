//! Domain layer - Core creation rules with no I/O
//!
//! This layer contains:
//! - Entities: character drafts, backstories, progression plans, magic items,
//!   spells, creatures and library listings
//! - Value Objects: abilities, identifiers, engine choice, sections, sort keys
//! - Domain Services: class priorities, gating predicates, naming and the
//!   invalidation table for derived character state

pub mod entities;
pub mod services;
pub mod value_objects;
