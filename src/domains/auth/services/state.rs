// Auth domain state
// 인증 도메인 상태
use crate::shared::database::Database;
use crate::domains::auth::services::{JwtService, UserService};

/// Auth domain state
/// 사용자 계정 서비스 + JWT 서비스 (관리자 도메인도 JWT 공유)
#[derive(Clone)]
pub struct AuthState {
    pub user_service: UserService,
    pub jwt_service: JwtService,
}

impl AuthState {
    /// Create AuthState with database and JWT service
    /// AuthState 생성 (데이터베이스와 JWT 서비스 필요)
    pub fn new(db: Database, jwt_service: JwtService) -> Self {
        Self {
            user_service: UserService::new(db),
            jwt_service,
        }
    }
}
