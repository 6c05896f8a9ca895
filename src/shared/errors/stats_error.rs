use thiserror::Error;
use axum::{http::StatusCode, Json};
use serde_json::json;

/// 통계 조회 에러
#[derive(Error, Debug)]
pub enum StatsError {
    /// start > end 등
    #[error("{0}")]
    Validation(String),

    #[error("Database error: {0}")]
    DatabaseError(String),
}

impl From<StatsError> for (StatusCode, Json<serde_json::Value>) {
    fn from(err: StatsError) -> Self {
        let status = match &err {
            StatsError::Validation(_) => StatusCode::BAD_REQUEST,
            StatsError::DatabaseError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        (status, Json(json!({ "error": err.to_string() })))
    }
}
