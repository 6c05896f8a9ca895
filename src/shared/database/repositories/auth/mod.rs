// Account repositories (users, admins)
pub mod user_repository;
pub mod admin_repository;
