use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use crate::domains::wallet::models::Currency;
use crate::domains::ledger::models::{TransactionStatus, TransactionType};

/// 대시보드 시스템 통계 (요청마다 재계산)
/// System-wide rollup, recomputed per request
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
#[schema(as = SystemStats)]
pub struct SystemStats {
    pub total_users: u64,
    pub active_users: u64,
    pub total_wallets: u64,
    pub bitcoin_wallets: u64,
    pub usdt_wallets: u64,
    pub total_transactions: u64,
    pub pending_transactions: u64,
    pub confirmed_transactions: u64,
    pub failed_transactions: u64,
    /// CONFIRMED 트랜잭션 금액 합계
    #[schema(value_type = String, example = "1.50000000")]
    pub total_bitcoin_volume: Decimal,
    #[schema(value_type = String, example = "250.00000000")]
    pub total_usdt_volume: Decimal,
    /// 00:00 UTC 이후
    pub users_registered_today: u64,
    pub transactions_today: u64,
    pub last_updated: DateTime<Utc>,
}

/// 기간 조회 파라미터 (양 끝 포함)
#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PeriodQuery {
    /// RFC3339
    pub start: DateTime<Utc>,
    /// RFC3339
    pub end: DateTime<Utc>,
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct VolumeQuery {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub currency: Currency,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PeriodCountResponse {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub count: u64,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct VolumeResponse {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub currency: Currency,
    #[schema(value_type = String)]
    pub volume: Decimal,
}

/// 대시보드 사용자 목록 필터
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct UserFilter {
    pub active: Option<bool>,
}

/// 대시보드 지갑 목록 필터
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct WalletFilter {
    pub currency: Option<Currency>,
    pub active: Option<bool>,
}

/// 대시보드 트랜잭션 목록 필터
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct TransactionFilter {
    pub status: Option<TransactionStatus>,
    #[serde(rename = "type")]
    pub tx_type: Option<TransactionType>,
}
