//! Infrastructure layer - External adapters and implementations
//!
//! This layer contains:
//! - Forge API: reqwest client for the REST backend
//! - Preferences: JSON file store for the engine choice
//! - Downloads: directory sink for exported files
//! - Config: Application configuration
//! - State: Shared application state

pub mod config;
pub mod downloads;
pub mod forge_api;
pub mod preferences;
pub mod state;
