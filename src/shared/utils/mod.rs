/// 공유 유틸리티 모듈
/// Shared Utilities Module
///
/// 역할:
/// - 페이지네이션 (PageParams → PageRequest → Page<T>)
/// - 요청 경계 검증
pub mod pagination;
pub mod validation;

pub use pagination::*;
pub use validation::*;
