// Shared database layer
pub mod connection;
pub mod store;
pub mod memory;
pub mod postgres;
pub mod repositories;

pub use connection::*;
pub use store::*;
pub use memory::MemoryStore;
pub use postgres::PgStore;
