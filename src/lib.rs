// Crypto wallet admin server library
// (main.rs와 tests/ 통합 테스트가 함께 사용)
pub mod domains;
pub mod shared;
pub mod routes;
