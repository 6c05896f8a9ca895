// Dashboard domain handlers
pub mod dashboard_handler;
