// Chain clients (placeholder implementations, no network access)
pub mod chain;
pub mod bitcoin;
pub mod tron;

pub use chain::*;
pub use bitcoin::*;
pub use tron::*;
