// Ledger repositories
pub mod transaction_repository;
