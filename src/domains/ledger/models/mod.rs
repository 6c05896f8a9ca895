// Ledger domain models
pub mod transaction;

pub use transaction::*;
