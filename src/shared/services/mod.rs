// Shared services
pub mod app_state;
pub mod wallet_locks;

pub use app_state::*;
pub use wallet_locks::*;
