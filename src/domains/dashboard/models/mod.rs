// Dashboard domain models
pub mod stats;

pub use stats::*;
