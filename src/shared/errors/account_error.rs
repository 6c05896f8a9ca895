use thiserror::Error;
use axum::{http::StatusCode, Json};
use serde_json::json;

/// 계정(사용자/관리자) 관련 에러
/// Account-related errors (users and admins)
#[derive(Error, Debug)]
pub enum AccountError {
    /// 중복 (field: "Username", "Email", "Admin username", "Admin email")
    /// Unique field already taken
    #[error("{field} already exists")]
    AlreadyExists { field: &'static str },

    /// 계정을 찾을 수 없음 ("User", "Admin")
    #[error("{entity} not found")]
    NotFound { entity: &'static str },

    /// 잘못된 자격 증명 또는 비활성 계정
    /// Unknown account, wrong password, or inactive account
    #[error("{0}")]
    InvalidCredentials(&'static str),

    /// 현재 비밀번호 불일치
    #[error("Current password is incorrect")]
    InvalidCurrentPassword,

    /// 요청 검증 실패
    #[error("{0}")]
    Validation(String),

    /// 비밀번호 해싱 실패
    /// Failed to hash password
    #[error("Failed to hash password: {0}")]
    PasswordHashingFailed(String),

    /// 잘못된 또는 만료된 토큰
    /// Invalid or expired token
    #[error("Invalid or expired token")]
    InvalidToken,

    /// 토큰이 제공되지 않음
    /// Token not provided
    #[error("Token not provided")]
    MissingToken,

    /// 데이터베이스 에러
    /// Database error
    #[error("Database error: {0}")]
    DatabaseError(String),

    /// 내부 서버 에러
    /// Internal server error
    #[error("Internal server error: {0}")]
    Internal(String),
}

impl AccountError {
    pub fn user_not_found() -> Self {
        AccountError::NotFound { entity: "User" }
    }

    pub fn admin_not_found() -> Self {
        AccountError::NotFound { entity: "Admin" }
    }
}

/// AccountError를 HTTP 응답으로 변환
impl From<AccountError> for (StatusCode, Json<serde_json::Value>) {
    fn from(err: AccountError) -> Self {
        let status = match &err {
            AccountError::AlreadyExists { .. }
            | AccountError::InvalidCurrentPassword
            | AccountError::Validation(_) => StatusCode::BAD_REQUEST,
            AccountError::NotFound { .. } => StatusCode::NOT_FOUND,
            AccountError::InvalidCredentials(_)
            | AccountError::InvalidToken
            | AccountError::MissingToken => StatusCode::UNAUTHORIZED,
            AccountError::PasswordHashingFailed(_)
            | AccountError::DatabaseError(_)
            | AccountError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        (status, Json(json!({ "error": err.to_string() })))
    }
}
