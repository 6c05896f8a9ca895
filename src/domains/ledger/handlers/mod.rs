// Ledger domain handlers
pub mod transaction_handler;
