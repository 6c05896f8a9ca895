// Auth domain services
pub mod password;
pub mod jwt_service;
pub mod user_service;
pub mod state;

pub use jwt_service::*;
pub use user_service::*;
pub use state::*;
