//! Application layer - client state slices and the actions that drive them

pub mod dto;
pub mod error;
pub mod ports;
pub mod services;
pub mod state;

pub use error::ForgeError;
