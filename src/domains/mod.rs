// Domain modules
pub mod auth;
pub mod admin;
pub mod wallet;
pub mod ledger;
pub mod dashboard;
