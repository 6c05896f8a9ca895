// Wallet domain routes
// 지갑 도메인 라우터
use axum::{routing::{get, post, put}, Router};
use crate::domains::wallet::handlers::wallet_handler;
use crate::shared::services::AppState;

/// Create wallet router (mounted at /api/wallets)
/// 지갑 라우터 생성
pub fn create_wallet_router() -> Router<AppState> {
    Router::new()
        .route(
            "/user/:user_id",
            post(wallet_handler::create_wallet).get(wallet_handler::get_user_wallets),
        )
        .route("/address/:address", get(wallet_handler::get_wallet_by_address))
        .route(
            "/:wallet_id",
            get(wallet_handler::get_wallet).delete(wallet_handler::deactivate_wallet),
        )
        .route("/:wallet_id/refresh-balance", post(wallet_handler::refresh_balance))
        .route("/:wallet_id/balance", put(wallet_handler::update_balance))
}
