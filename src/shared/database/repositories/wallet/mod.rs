// Wallet repositories
pub mod wallet_repository;
