// Admin dashboard routes
// 대시보드 라우터 (통계 + 사용자 / 지갑 / 트랜잭션 관리)
use axum::{routing::{get, post, put}, Router};
use crate::domains::dashboard::handlers::dashboard_handler;
use crate::shared::services::AppState;

/// Create dashboard router (mounted at /api/admin/dashboard)
pub fn create_dashboard_router() -> Router<AppState> {
    Router::new()
        .route("/stats", get(dashboard_handler::get_stats))
        .route("/users", get(dashboard_handler::list_users))
        .route("/users/search", get(dashboard_handler::search_users))
        .route("/users/:id/toggle-status", put(dashboard_handler::toggle_user_status))
        .route("/wallets", get(dashboard_handler::list_wallets))
        .route("/wallets/search", get(dashboard_handler::search_wallets))
        .route("/wallets/:id/toggle-status", put(dashboard_handler::toggle_wallet_status))
        .route("/wallets/:id/refresh-balance", post(dashboard_handler::refresh_wallet_balance))
        .route("/transactions", get(dashboard_handler::list_transactions))
        .route("/transactions/search", get(dashboard_handler::search_transactions))
        .route("/transactions/pending", get(dashboard_handler::pending_transactions))
        .route("/analytics/users-registered", get(dashboard_handler::users_registered))
        .route("/analytics/transactions", get(dashboard_handler::transactions_in_period))
        .route("/analytics/volume", get(dashboard_handler::volume_in_period))
        .route("/create-sample-data", post(dashboard_handler::create_sample_data))
}
