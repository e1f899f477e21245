//! Forge Client - Creation front-end for a 5e TTRPG assistant
//!
//! The client drives the Forge API to:
//! - Roll, assign and generate player characters with backstories, portraits
//!   and level progressions
//! - Generate magic items, spells and creatures
//! - Browse, search and manage the saved libraries of each
//! - Export records as JSON, Markdown or PDF

pub mod application;
pub mod domain;
pub mod infrastructure;
