// Routes module: 라우팅 설정
// 역할: 모든 도메인의 라우터를 조합
// Routes module: combines all domain routers

pub mod openapi;

use axum::{routing::get, Json, Router};
use utoipa::OpenApi;
use crate::shared::services::AppState;

// 각 도메인의 routes import
use crate::domains::auth::routes::create_user_router;
use crate::domains::admin::routes::create_admin_router;
use crate::domains::wallet::routes::create_wallet_router;
use crate::domains::ledger::routes::create_transaction_router;
use crate::domains::dashboard::routes::create_dashboard_router;
use openapi::ApiDoc;

/// Create main router (combines all domain routers)
/// 메인 라우터 생성 (모든 도메인 라우터 조합)
pub fn create_router() -> Router<AppState> {
    Router::new()
        .nest("/api/users", create_user_router())
        .nest("/api/admin/dashboard", create_dashboard_router())
        .nest("/api/admin", create_admin_router())
        .nest("/api/wallets", create_wallet_router())
        .nest("/api/transactions", create_transaction_router())
        .route("/api-docs/openapi.json", get(|| async { Json(ApiDoc::openapi()) }))
}
