use thiserror::Error;
use axum::{http::StatusCode, Json};
use serde_json::json;
use rust_decimal::Decimal;

/// 원장(트랜잭션 기록) 관련 에러
/// Ledger errors
#[derive(Error, Debug)]
pub enum LedgerError {
    /// "Wallet", "Transaction"
    #[error("{entity} not found")]
    NotFound { entity: &'static str },

    /// 잔액 부족 (amount 기준, 수수료 미포함)
    #[error("Insufficient balance: required={required}, available={available}")]
    InsufficientBalance { required: Decimal, available: Decimal },

    #[error("Unsupported currency: {currency}")]
    UnsupportedCurrency { currency: String },

    /// 체인 전송 ~ 커밋 구간 실패 (롤백됨)
    #[error("Failed to send transaction: {0}")]
    SendFailed(String),

    /// 결과 잔액이 NUMERIC(20,8) 범위를 벗어남 (기록 / 잔액 변경 없음)
    #[error("Resulting balance of wallet {wallet_id} is out of range")]
    BalanceOutOfRange { wallet_id: u64 },

    #[error("{0}")]
    Validation(String),

    /// 데이터베이스 에러
    /// Database error
    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

/// LedgerError를 HTTP 응답으로 변환
impl From<LedgerError> for (StatusCode, Json<serde_json::Value>) {
    fn from(err: LedgerError) -> Self {
        let status = match &err {
            LedgerError::NotFound { .. } => StatusCode::NOT_FOUND,
            LedgerError::InsufficientBalance { .. }
            | LedgerError::UnsupportedCurrency { .. }
            | LedgerError::SendFailed(_)
            | LedgerError::BalanceOutOfRange { .. }
            | LedgerError::Validation(_) => StatusCode::BAD_REQUEST,
            LedgerError::DatabaseError(_) | LedgerError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        (status, Json(json!({ "error": err.to_string() })))
    }
}
