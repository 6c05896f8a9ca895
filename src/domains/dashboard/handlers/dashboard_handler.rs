use crate::domains::auth::models::{MessageResponse, UserResponse};
use crate::domains::dashboard::models::{
    PeriodCountResponse, PeriodQuery, SystemStats, TransactionFilter, UserFilter, VolumeQuery,
    VolumeResponse, WalletFilter,
};
use crate::domains::ledger::models::TransactionResponse;
use crate::domains::wallet::models::WalletResponse;
use crate::shared::services::AppState;
use crate::shared::errors::{AccountError, LedgerError, StatsError, WalletError};
use crate::shared::utils::{
    Page, PageParams, SearchParams, TransactionPage, UserPage, WalletPage, TRANSACTION_SORT_FIELDS,
    USER_SORT_FIELDS, WALLET_SORT_FIELDS,
};
use axum::{extract::{Path, Query, State}, http::StatusCode, Json};

/// 시스템 통계 (요청마다 재계산)
#[utoipa::path(
    get,
    path = "/api/admin/dashboard/stats",
    responses(
        (status = 200, description = "System statistics", body = SystemStats),
        (status = 500, description = "Internal server error")
    ),
    tag = "Dashboard"
)]
pub async fn get_stats(
    State(app_state): State<AppState>,
) -> Result<Json<SystemStats>, (StatusCode, Json<serde_json::Value>)> {
    let stats = app_state
        .dashboard_state
        .stats_service
        .system_statistics()
        .await
        .map_err(|e: StatsError| -> (StatusCode, Json<serde_json::Value>) { e.into() })?;

    Ok(Json(stats))
}

// ---------------------------------------------------------------------
// 사용자 관리
// ---------------------------------------------------------------------

#[utoipa::path(
    get,
    path = "/api/admin/dashboard/users",
    params(PageParams, UserFilter),
    responses((status = 200, description = "Users page", body = UserPage)),
    tag = "Dashboard"
)]
pub async fn list_users(
    State(app_state): State<AppState>,
    Query(params): Query<PageParams>,
    Query(filter): Query<UserFilter>,
) -> Result<Json<Page<UserResponse>>, (StatusCode, Json<serde_json::Value>)> {
    let page = params.to_request(USER_SORT_FIELDS).map_err(AccountError::Validation)?;

    let users = app_state
        .auth_state
        .user_service
        .list_paged(filter.active, &page)
        .await
        .map_err(|e: AccountError| -> (StatusCode, Json<serde_json::Value>) { e.into() })?;

    Ok(Json(users.map(UserResponse::from)))
}

#[utoipa::path(
    get,
    path = "/api/admin/dashboard/users/search",
    params(SearchParams, PageParams),
    responses((status = 200, description = "Matching users", body = UserPage)),
    tag = "Dashboard"
)]
pub async fn search_users(
    State(app_state): State<AppState>,
    Query(search): Query<SearchParams>,
    Query(params): Query<PageParams>,
) -> Result<Json<Page<UserResponse>>, (StatusCode, Json<serde_json::Value>)> {
    let page = params.to_request(USER_SORT_FIELDS).map_err(AccountError::Validation)?;

    let users = app_state
        .auth_state
        .user_service
        .search(&search.query, &page)
        .await
        .map_err(|e: AccountError| -> (StatusCode, Json<serde_json::Value>) { e.into() })?;

    Ok(Json(users.map(UserResponse::from)))
}

#[utoipa::path(
    put,
    path = "/api/admin/dashboard/users/{id}/toggle-status",
    params(("id" = u64, Path, description = "User ID")),
    responses(
        (status = 200, description = "Active flag flipped", body = UserResponse),
        (status = 404, description = "User not found")
    ),
    tag = "Dashboard"
)]
pub async fn toggle_user_status(
    State(app_state): State<AppState>,
    Path(id): Path<u64>,
) -> Result<Json<UserResponse>, (StatusCode, Json<serde_json::Value>)> {
    let user = app_state
        .auth_state
        .user_service
        .toggle_status(id)
        .await
        .map_err(|e: AccountError| -> (StatusCode, Json<serde_json::Value>) { e.into() })?;

    Ok(Json(user.into()))
}

// ---------------------------------------------------------------------
// 지갑 관리
// ---------------------------------------------------------------------

#[utoipa::path(
    get,
    path = "/api/admin/dashboard/wallets",
    params(PageParams, WalletFilter),
    responses((status = 200, description = "Wallets page", body = WalletPage)),
    tag = "Dashboard"
)]
pub async fn list_wallets(
    State(app_state): State<AppState>,
    Query(params): Query<PageParams>,
    Query(filter): Query<WalletFilter>,
) -> Result<Json<Page<WalletResponse>>, (StatusCode, Json<serde_json::Value>)> {
    let page = params.to_request(WALLET_SORT_FIELDS).map_err(WalletError::Validation)?;

    let wallets = app_state
        .wallet_state
        .wallet_service
        .list_paged(filter.currency, filter.active, &page)
        .await
        .map_err(|e: WalletError| -> (StatusCode, Json<serde_json::Value>) { e.into() })?;

    Ok(Json(wallets.map(WalletResponse::from)))
}

#[utoipa::path(
    get,
    path = "/api/admin/dashboard/wallets/search",
    params(SearchParams, PageParams),
    responses((status = 200, description = "Matching wallets (address, owner username / email)", body = WalletPage)),
    tag = "Dashboard"
)]
pub async fn search_wallets(
    State(app_state): State<AppState>,
    Query(search): Query<SearchParams>,
    Query(params): Query<PageParams>,
) -> Result<Json<Page<WalletResponse>>, (StatusCode, Json<serde_json::Value>)> {
    let page = params.to_request(WALLET_SORT_FIELDS).map_err(WalletError::Validation)?;

    let wallets = app_state
        .wallet_state
        .wallet_service
        .search(&search.query, &page)
        .await
        .map_err(|e: WalletError| -> (StatusCode, Json<serde_json::Value>) { e.into() })?;

    Ok(Json(wallets.map(WalletResponse::from)))
}

/// 활성 지갑만 비활성화, 비활성 지갑은 그대로 200
#[utoipa::path(
    put,
    path = "/api/admin/dashboard/wallets/{id}/toggle-status",
    params(("id" = u64, Path, description = "Wallet ID")),
    responses(
        (status = 200, description = "Wallet after toggle", body = WalletResponse),
        (status = 404, description = "Wallet not found")
    ),
    tag = "Dashboard"
)]
pub async fn toggle_wallet_status(
    State(app_state): State<AppState>,
    Path(id): Path<u64>,
) -> Result<Json<WalletResponse>, (StatusCode, Json<serde_json::Value>)> {
    let wallet = app_state
        .wallet_state
        .wallet_service
        .toggle_status(id)
        .await
        .map_err(|e: WalletError| -> (StatusCode, Json<serde_json::Value>) { e.into() })?;

    Ok(Json(wallet.into()))
}

#[utoipa::path(
    post,
    path = "/api/admin/dashboard/wallets/{id}/refresh-balance",
    params(("id" = u64, Path, description = "Wallet ID")),
    responses(
        (status = 200, description = "Balance replaced with the chain-reported value", body = WalletResponse),
        (status = 404, description = "Wallet not found")
    ),
    tag = "Dashboard"
)]
pub async fn refresh_wallet_balance(
    State(app_state): State<AppState>,
    Path(id): Path<u64>,
) -> Result<Json<WalletResponse>, (StatusCode, Json<serde_json::Value>)> {
    let wallet = app_state
        .wallet_state
        .wallet_service
        .refresh_wallet_balance(id)
        .await
        .map_err(|e: WalletError| -> (StatusCode, Json<serde_json::Value>) { e.into() })?;

    Ok(Json(wallet.into()))
}

// ---------------------------------------------------------------------
// 트랜잭션 관리
// ---------------------------------------------------------------------

#[utoipa::path(
    get,
    path = "/api/admin/dashboard/transactions",
    params(PageParams, TransactionFilter),
    responses((status = 200, description = "Transactions page", body = TransactionPage)),
    tag = "Dashboard"
)]
pub async fn list_transactions(
    State(app_state): State<AppState>,
    Query(params): Query<PageParams>,
    Query(filter): Query<TransactionFilter>,
) -> Result<Json<Page<TransactionResponse>>, (StatusCode, Json<serde_json::Value>)> {
    let page = params.to_request(TRANSACTION_SORT_FIELDS).map_err(LedgerError::Validation)?;

    let txs = app_state
        .ledger_state
        .transaction_service
        .list_paged(filter.status, filter.tx_type, &page)
        .await
        .map_err(|e: LedgerError| -> (StatusCode, Json<serde_json::Value>) { e.into() })?;

    Ok(Json(txs.map(TransactionResponse::from)))
}

#[utoipa::path(
    get,
    path = "/api/admin/dashboard/transactions/search",
    params(SearchParams, PageParams),
    responses((status = 200, description = "Matching transactions (hash, from / to address)", body = TransactionPage)),
    tag = "Dashboard"
)]
pub async fn search_transactions(
    State(app_state): State<AppState>,
    Query(search): Query<SearchParams>,
    Query(params): Query<PageParams>,
) -> Result<Json<Page<TransactionResponse>>, (StatusCode, Json<serde_json::Value>)> {
    let page = params.to_request(TRANSACTION_SORT_FIELDS).map_err(LedgerError::Validation)?;

    let txs = app_state
        .ledger_state
        .transaction_service
        .search(&search.query, &page)
        .await
        .map_err(|e: LedgerError| -> (StatusCode, Json<serde_json::Value>) { e.into() })?;

    Ok(Json(txs.map(TransactionResponse::from)))
}

#[utoipa::path(
    get,
    path = "/api/admin/dashboard/transactions/pending",
    params(PageParams),
    responses((status = 200, description = "PENDING transactions", body = TransactionPage)),
    tag = "Dashboard"
)]
pub async fn pending_transactions(
    State(app_state): State<AppState>,
    Query(params): Query<PageParams>,
) -> Result<Json<Page<TransactionResponse>>, (StatusCode, Json<serde_json::Value>)> {
    let page = params.to_request(TRANSACTION_SORT_FIELDS).map_err(LedgerError::Validation)?;

    let txs = app_state
        .ledger_state
        .transaction_service
        .pending(&page)
        .await
        .map_err(|e: LedgerError| -> (StatusCode, Json<serde_json::Value>) { e.into() })?;

    Ok(Json(txs.map(TransactionResponse::from)))
}

// ---------------------------------------------------------------------
// 기간 분석
// ---------------------------------------------------------------------

#[utoipa::path(
    get,
    path = "/api/admin/dashboard/analytics/users-registered",
    params(PeriodQuery),
    responses(
        (status = 200, description = "Users registered within [start, end]", body = PeriodCountResponse),
        (status = 400, description = "start is after end")
    ),
    tag = "Dashboard"
)]
pub async fn users_registered(
    State(app_state): State<AppState>,
    Query(period): Query<PeriodQuery>,
) -> Result<Json<PeriodCountResponse>, (StatusCode, Json<serde_json::Value>)> {
    let count = app_state
        .dashboard_state
        .stats_service
        .users_registered_in_period(period.start, period.end)
        .await
        .map_err(|e: StatsError| -> (StatusCode, Json<serde_json::Value>) { e.into() })?;

    Ok(Json(PeriodCountResponse {
        start: period.start,
        end: period.end,
        count,
    }))
}

#[utoipa::path(
    get,
    path = "/api/admin/dashboard/analytics/transactions",
    params(PeriodQuery),
    responses(
        (status = 200, description = "Transactions created within [start, end]", body = PeriodCountResponse),
        (status = 400, description = "start is after end")
    ),
    tag = "Dashboard"
)]
pub async fn transactions_in_period(
    State(app_state): State<AppState>,
    Query(period): Query<PeriodQuery>,
) -> Result<Json<PeriodCountResponse>, (StatusCode, Json<serde_json::Value>)> {
    let count = app_state
        .dashboard_state
        .stats_service
        .transactions_in_period(period.start, period.end)
        .await
        .map_err(|e: StatsError| -> (StatusCode, Json<serde_json::Value>) { e.into() })?;

    Ok(Json(PeriodCountResponse {
        start: period.start,
        end: period.end,
        count,
    }))
}

#[utoipa::path(
    get,
    path = "/api/admin/dashboard/analytics/volume",
    params(VolumeQuery),
    responses(
        (status = 200, description = "CONFIRMED volume within [start, end]", body = VolumeResponse),
        (status = 400, description = "start is after end")
    ),
    tag = "Dashboard"
)]
pub async fn volume_in_period(
    State(app_state): State<AppState>,
    Query(query): Query<VolumeQuery>,
) -> Result<Json<VolumeResponse>, (StatusCode, Json<serde_json::Value>)> {
    let volume = app_state
        .dashboard_state
        .stats_service
        .volume_in_period(query.start, query.end, query.currency)
        .await
        .map_err(|e: StatsError| -> (StatusCode, Json<serde_json::Value>) { e.into() })?;

    Ok(Json(VolumeResponse {
        start: query.start,
        end: query.end,
        currency: query.currency,
        volume,
    }))
}

/// 개발용 샘플 데이터 생성 (지갑 2개 이상 필요)
#[utoipa::path(
    post,
    path = "/api/admin/dashboard/create-sample-data",
    responses(
        (status = 200, description = "success=false when fewer than two wallets exist", body = MessageResponse)
    ),
    tag = "Dashboard"
)]
pub async fn create_sample_data(
    State(app_state): State<AppState>,
) -> Result<Json<MessageResponse>, (StatusCode, Json<serde_json::Value>)> {
    let created = app_state
        .ledger_state
        .transaction_service
        .create_sample_transactions()
        .await
        .map_err(|e: LedgerError| -> (StatusCode, Json<serde_json::Value>) { e.into() })?;

    if created {
        Ok(Json(MessageResponse::ok("Sample data created successfully")))
    } else {
        Ok(Json(MessageResponse {
            message: "At least two wallets are required to create sample data".to_string(),
            success: false,
        }))
    }
}
