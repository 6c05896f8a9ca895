// Shared errors
pub mod account_error;
pub mod wallet_error;
pub mod ledger_error;
pub mod stats_error;

pub use account_error::*;
pub use wallet_error::*;
pub use ledger_error::*;
pub use stats_error::*;
