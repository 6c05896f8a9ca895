use crate::domains::wallet::models::{CreateWalletRequest, UpdateBalanceRequest, WalletResponse};
use crate::shared::services::AppState;
use crate::shared::errors::WalletError;
use crate::shared::utils::validate_balance;
use axum::{extract::{Path, State}, http::StatusCode, Json};

/// 지갑 생성 핸들러
/// Create wallet handler (키 쌍은 통화별 체인 클라이언트가 생성)
#[utoipa::path(
    post,
    path = "/api/wallets/user/{user_id}",
    params(("user_id" = u64, Path, description = "Owner user ID")),
    request_body = CreateWalletRequest,
    responses(
        (status = 201, description = "Wallet created successfully", body = WalletResponse),
        (status = 400, description = "Unsupported currency"),
        (status = 404, description = "User not found"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Wallets"
)]
pub async fn create_wallet(
    State(app_state): State<AppState>,
    Path(user_id): Path<u64>,
    Json(request): Json<CreateWalletRequest>,
) -> Result<(StatusCode, Json<WalletResponse>), (StatusCode, Json<serde_json::Value>)> {
    let wallet = app_state
        .wallet_state
        .wallet_service
        .create_wallet(user_id, request.currency)
        .await
        .map_err(|e: WalletError| -> (StatusCode, Json<serde_json::Value>) { e.into() })?;

    Ok((StatusCode::CREATED, Json(wallet.into())))
}

/// 사용자의 모든 지갑 조회 핸들러 (최신순)
#[utoipa::path(
    get,
    path = "/api/wallets/user/{user_id}",
    params(("user_id" = u64, Path, description = "Owner user ID")),
    responses(
        (status = 200, description = "Wallets retrieved successfully", body = [WalletResponse]),
        (status = 500, description = "Internal server error")
    ),
    tag = "Wallets"
)]
pub async fn get_user_wallets(
    State(app_state): State<AppState>,
    Path(user_id): Path<u64>,
) -> Result<Json<Vec<WalletResponse>>, (StatusCode, Json<serde_json::Value>)> {
    let wallets = app_state
        .wallet_state
        .wallet_service
        .get_user_wallets(user_id)
        .await
        .map_err(|e: WalletError| -> (StatusCode, Json<serde_json::Value>) { e.into() })?;

    Ok(Json(wallets.iter().map(WalletResponse::from).collect()))
}

/// 지갑 조회 핸들러 (ID로)
/// Get wallet by ID handler
#[utoipa::path(
    get,
    path = "/api/wallets/{wallet_id}",
    params(("wallet_id" = u64, Path, description = "Wallet ID")),
    responses(
        (status = 200, description = "Wallet retrieved successfully", body = WalletResponse),
        (status = 404, description = "Wallet not found"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Wallets"
)]
pub async fn get_wallet(
    State(app_state): State<AppState>,
    Path(wallet_id): Path<u64>,
) -> Result<Json<WalletResponse>, (StatusCode, Json<serde_json::Value>)> {
    let wallet = app_state
        .wallet_state
        .wallet_service
        .get_wallet(wallet_id)
        .await
        .map_err(|e: WalletError| -> (StatusCode, Json<serde_json::Value>) { e.into() })?;

    Ok(Json(wallet.into()))
}

#[utoipa::path(
    get,
    path = "/api/wallets/address/{address}",
    params(("address" = String, Path, description = "Wallet address")),
    responses(
        (status = 200, description = "Wallet retrieved successfully", body = WalletResponse),
        (status = 404, description = "Wallet not found")
    ),
    tag = "Wallets"
)]
pub async fn get_wallet_by_address(
    State(app_state): State<AppState>,
    Path(address): Path<String>,
) -> Result<Json<WalletResponse>, (StatusCode, Json<serde_json::Value>)> {
    let wallet = app_state
        .wallet_state
        .wallet_service
        .get_wallet_by_address(&address)
        .await
        .map_err(|e: WalletError| -> (StatusCode, Json<serde_json::Value>) { e.into() })?;

    Ok(Json(wallet.into()))
}

/// 체인 잔액으로 덮어쓰기 (조정 아님)
#[utoipa::path(
    post,
    path = "/api/wallets/{wallet_id}/refresh-balance",
    params(("wallet_id" = u64, Path, description = "Wallet ID")),
    responses(
        (status = 200, description = "Balance replaced with the chain-reported value", body = WalletResponse),
        (status = 404, description = "Wallet not found"),
        (status = 502, description = "Chain client error")
    ),
    tag = "Wallets"
)]
pub async fn refresh_balance(
    State(app_state): State<AppState>,
    Path(wallet_id): Path<u64>,
) -> Result<Json<WalletResponse>, (StatusCode, Json<serde_json::Value>)> {
    let wallet = app_state
        .wallet_state
        .wallet_service
        .refresh_wallet_balance(wallet_id)
        .await
        .map_err(|e: WalletError| -> (StatusCode, Json<serde_json::Value>) { e.into() })?;

    Ok(Json(wallet.into()))
}

/// 관리자용 잔액 덮어쓰기
#[utoipa::path(
    put,
    path = "/api/wallets/{wallet_id}/balance",
    params(("wallet_id" = u64, Path, description = "Wallet ID")),
    request_body = UpdateBalanceRequest,
    responses(
        (status = 200, description = "Balance overwritten", body = WalletResponse),
        (status = 400, description = "Negative balance, 10^12 or more, or more than 8 decimal places"),
        (status = 404, description = "Wallet not found")
    ),
    tag = "Wallets"
)]
pub async fn update_balance(
    State(app_state): State<AppState>,
    Path(wallet_id): Path<u64>,
    Json(request): Json<UpdateBalanceRequest>,
) -> Result<Json<WalletResponse>, (StatusCode, Json<serde_json::Value>)> {
    validate_balance(request.balance).map_err(WalletError::Validation)?;

    let wallet = app_state
        .wallet_state
        .wallet_service
        .update_wallet_balance(wallet_id, request.balance)
        .await
        .map_err(|e: WalletError| -> (StatusCode, Json<serde_json::Value>) { e.into() })?;

    Ok(Json(wallet.into()))
}

/// 지갑 비활성화 (삭제하지 않음)
#[utoipa::path(
    delete,
    path = "/api/wallets/{wallet_id}",
    params(("wallet_id" = u64, Path, description = "Wallet ID")),
    responses(
        (status = 204, description = "Wallet deactivated"),
        (status = 404, description = "Wallet not found")
    ),
    tag = "Wallets"
)]
pub async fn deactivate_wallet(
    State(app_state): State<AppState>,
    Path(wallet_id): Path<u64>,
) -> Result<StatusCode, (StatusCode, Json<serde_json::Value>)> {
    app_state
        .wallet_state
        .wallet_service
        .deactivate_wallet(wallet_id)
        .await
        .map_err(|e: WalletError| -> (StatusCode, Json<serde_json::Value>) { e.into() })?;

    Ok(StatusCode::NO_CONTENT)
}
