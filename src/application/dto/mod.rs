//! Data Transfer Objects - Request and response bodies of the Forge API

pub mod requests;
pub mod responses;

pub use requests::*;
pub use responses::*;
