// Admin domain routes
// 관리자 라우터 (/api/admin/dashboard는 dashboard 도메인에서 별도로 nest)
use axum::{routing::{get, post, put}, Router};
use crate::domains::admin::handlers::admin_handler;
use crate::shared::services::AppState;

/// Create admin router (mounted at /api/admin)
pub fn create_admin_router() -> Router<AppState> {
    Router::new()
        .route("/", get(admin_handler::list_admins))
        .route("/register", post(admin_handler::register))
        .route("/login", post(admin_handler::login))
        .route("/me", get(admin_handler::get_me))  // 인증 필요
        .route("/search", get(admin_handler::search_admins))
        .route("/username/:username", get(admin_handler::get_admin_by_username))
        .route("/role/:role", get(admin_handler::get_admins_by_role))
        .route("/stats/count", get(admin_handler::active_admin_count))
        .route("/stats/recent", get(admin_handler::recently_active_admin_count))
        .route(
            "/:id",
            get(admin_handler::get_admin)
                .put(admin_handler::update_admin)
                .delete(admin_handler::delete_admin),
        )
        .route("/:id/deactivate", put(admin_handler::deactivate_admin))
        .route("/:id/change-password", post(admin_handler::change_password))
}
