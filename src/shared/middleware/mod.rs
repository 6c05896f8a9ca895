// Shared middleware (extractors)
pub mod auth;

pub use auth::*;
