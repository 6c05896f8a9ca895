use crate::domains::ledger::models::{
    IncomingTransactionRequest, IncomingTransactionResponse, SendTransactionRequest,
    TransactionResponse, UpdateTransactionStatusRequest,
};
use crate::shared::services::AppState;
use crate::shared::errors::LedgerError;
use crate::shared::utils::{validate_amount, validate_not_blank};
use axum::{extract::{Path, State}, http::StatusCode, Json};

/// 송금 핸들러
/// Send transaction handler
#[utoipa::path(
    post,
    path = "/api/transactions/send",
    request_body = SendTransactionRequest,
    responses(
        (status = 201, description = "Transaction broadcast and recorded as PENDING", body = TransactionResponse),
        (status = 400, description = "Validation error, insufficient balance or send failure"),
        (status = 404, description = "Wallet not found"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Transactions"
)]
pub async fn send_transaction(
    State(app_state): State<AppState>,
    Json(request): Json<SendTransactionRequest>,
) -> Result<(StatusCode, Json<TransactionResponse>), (StatusCode, Json<serde_json::Value>)> {
    // 1. 요청 검증
    validate_not_blank("toAddress", &request.to_address).map_err(LedgerError::Validation)?;
    validate_amount(request.amount).map_err(LedgerError::Validation)?;

    // 2. Service 호출
    let tx = app_state
        .ledger_state
        .transaction_service
        .send_transaction(request)
        .await
        .map_err(|e: LedgerError| -> (StatusCode, Json<serde_json::Value>) { e.into() })?;

    Ok((StatusCode::CREATED, Json(tx.into())))
}

/// 입금 노티파이어 진입점 (tx_hash 기준 멱등)
#[utoipa::path(
    post,
    path = "/api/transactions/incoming",
    request_body = IncomingTransactionRequest,
    responses(
        (status = 200, description = "RECORDED, DUPLICATE or UNKNOWN_ADDRESS", body = IncomingTransactionResponse),
        (status = 400, description = "Validation error")
    ),
    tag = "Transactions"
)]
pub async fn process_incoming(
    State(app_state): State<AppState>,
    Json(request): Json<IncomingTransactionRequest>,
) -> Result<Json<IncomingTransactionResponse>, (StatusCode, Json<serde_json::Value>)> {
    validate_not_blank("txHash", &request.tx_hash).map_err(LedgerError::Validation)?;
    validate_not_blank("toAddress", &request.to_address).map_err(LedgerError::Validation)?;
    validate_amount(request.amount).map_err(LedgerError::Validation)?;

    let outcome = app_state
        .ledger_state
        .transaction_service
        .process_incoming_transaction(request)
        .await
        .map_err(|e: LedgerError| -> (StatusCode, Json<serde_json::Value>) { e.into() })?;

    Ok(Json(outcome.into()))
}

#[utoipa::path(
    put,
    path = "/api/transactions/hash/{tx_hash}/status",
    params(("tx_hash" = String, Path, description = "Transaction hash")),
    request_body = UpdateTransactionStatusRequest,
    responses(
        (status = 200, description = "Status updated", body = TransactionResponse),
        (status = 404, description = "Transaction not found")
    ),
    tag = "Transactions"
)]
pub async fn update_status(
    State(app_state): State<AppState>,
    Path(tx_hash): Path<String>,
    Json(request): Json<UpdateTransactionStatusRequest>,
) -> Result<Json<TransactionResponse>, (StatusCode, Json<serde_json::Value>)> {
    let tx = app_state
        .ledger_state
        .transaction_service
        .update_transaction_status(&tx_hash, request.status, request.block_number, request.confirmations)
        .await
        .map_err(|e: LedgerError| -> (StatusCode, Json<serde_json::Value>) { e.into() })?;

    Ok(Json(tx.into()))
}

#[utoipa::path(
    get,
    path = "/api/transactions/wallet/{wallet_id}",
    params(("wallet_id" = u64, Path, description = "Wallet ID")),
    responses(
        (status = 200, description = "Wallet transactions, newest first", body = [TransactionResponse])
    ),
    tag = "Transactions"
)]
pub async fn get_wallet_transactions(
    State(app_state): State<AppState>,
    Path(wallet_id): Path<u64>,
) -> Result<Json<Vec<TransactionResponse>>, (StatusCode, Json<serde_json::Value>)> {
    let txs = app_state
        .ledger_state
        .transaction_service
        .get_wallet_transactions(wallet_id)
        .await
        .map_err(|e: LedgerError| -> (StatusCode, Json<serde_json::Value>) { e.into() })?;

    Ok(Json(txs.iter().map(TransactionResponse::from).collect()))
}

#[utoipa::path(
    get,
    path = "/api/transactions/user/{user_id}",
    params(("user_id" = u64, Path, description = "User ID")),
    responses(
        (status = 200, description = "Transactions of all wallets of the user, newest first", body = [TransactionResponse])
    ),
    tag = "Transactions"
)]
pub async fn get_user_transactions(
    State(app_state): State<AppState>,
    Path(user_id): Path<u64>,
) -> Result<Json<Vec<TransactionResponse>>, (StatusCode, Json<serde_json::Value>)> {
    let txs = app_state
        .ledger_state
        .transaction_service
        .get_user_transactions(user_id)
        .await
        .map_err(|e: LedgerError| -> (StatusCode, Json<serde_json::Value>) { e.into() })?;

    Ok(Json(txs.iter().map(TransactionResponse::from).collect()))
}

#[utoipa::path(
    get,
    path = "/api/transactions/hash/{tx_hash}",
    params(("tx_hash" = String, Path, description = "Transaction hash")),
    responses(
        (status = 200, description = "Transaction found", body = TransactionResponse),
        (status = 404, description = "Transaction not found")
    ),
    tag = "Transactions"
)]
pub async fn get_transaction_by_hash(
    State(app_state): State<AppState>,
    Path(tx_hash): Path<String>,
) -> Result<Json<TransactionResponse>, (StatusCode, Json<serde_json::Value>)> {
    let tx = app_state
        .ledger_state
        .transaction_service
        .get_transaction_by_hash(&tx_hash)
        .await
        .map_err(|e: LedgerError| -> (StatusCode, Json<serde_json::Value>) { e.into() })?;

    Ok(Json(tx.into()))
}
