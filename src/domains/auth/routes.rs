// Users (auth) domain routes
// 사용자 계정 라우터
use axum::{routing::{get, post, put}, Router};
use crate::domains::auth::handlers::auth_handler;
use crate::shared::services::AppState;

/// Create users router (mounted at /api/users)
/// 사용자 라우터 생성
pub fn create_user_router() -> Router<AppState> {
    Router::new()
        .route("/", get(auth_handler::get_all_users))
        .route("/register", post(auth_handler::register))
        .route("/login", post(auth_handler::login))
        .route("/me", get(auth_handler::get_me))  // 인증 필요
        .route("/username/:username", get(auth_handler::get_user_by_username))
        .route(
            "/:id",
            get(auth_handler::get_user)
                .put(auth_handler::update_user)
                .delete(auth_handler::delete_user),
        )
        .route("/:id/deactivate", put(auth_handler::deactivate_user))
        .route("/:id/change-password", post(auth_handler::change_password))
}
