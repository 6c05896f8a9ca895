use thiserror::Error;
use axum::{http::StatusCode, Json};
use serde_json::json;

/// 지갑 관련 에러
/// Wallet-related errors
#[derive(Error, Debug)]
pub enum WalletError {
    /// "Wallet", "User"
    #[error("{entity} not found")]
    NotFound { entity: &'static str },

    /// 체인 클라이언트가 등록되지 않은 통화
    #[error("Unsupported currency: {currency}")]
    UnsupportedCurrency { currency: String },

    /// 체인 클라이언트 호출 실패 (키 생성, 잔액 조회)
    #[error("Chain client error: {0}")]
    ChainClient(String),

    #[error("{0}")]
    Validation(String),

    /// 데이터베이스 에러
    /// Database error
    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

/// WalletError를 HTTP 응답으로 변환
impl From<WalletError> for (StatusCode, Json<serde_json::Value>) {
    fn from(err: WalletError) -> Self {
        let status = match &err {
            WalletError::NotFound { .. } => StatusCode::NOT_FOUND,
            WalletError::UnsupportedCurrency { .. } | WalletError::Validation(_) => {
                StatusCode::BAD_REQUEST
            }
            WalletError::ChainClient(_) => StatusCode::BAD_GATEWAY,
            WalletError::DatabaseError(_) | WalletError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        (status, Json(json!({ "error": err.to_string() })))
    }
}
