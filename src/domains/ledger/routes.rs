// Ledger domain routes
use axum::{routing::{get, post, put}, Router};
use crate::domains::ledger::handlers::transaction_handler;
use crate::shared::services::AppState;

/// Create transactions router (mounted at /api/transactions)
pub fn create_transaction_router() -> Router<AppState> {
    Router::new()
        .route("/send", post(transaction_handler::send_transaction))
        .route("/incoming", post(transaction_handler::process_incoming))  // 외부 노티파이어
        .route("/hash/:tx_hash", get(transaction_handler::get_transaction_by_hash))
        .route("/hash/:tx_hash/status", put(transaction_handler::update_status))
        .route("/wallet/:wallet_id", get(transaction_handler::get_wallet_transactions))
        .route("/user/:user_id", get(transaction_handler::get_user_transactions))
}
