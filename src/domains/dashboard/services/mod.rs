// Dashboard domain services
pub mod stats_service;
pub mod state;

pub use stats_service::*;
pub use state::*;
