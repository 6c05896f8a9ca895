use crate::domains::auth::models::{
    AccountKind, AuthResponse, ChangePasswordRequest, LoginRequest, MessageResponse,
    RegisterUserRequest, UpdateUserRequest, UserResponse,
};
use crate::shared::services::AppState;
use crate::shared::errors::AccountError;
use crate::shared::middleware::auth::AuthenticatedAccount;
use crate::shared::utils::{validate_email, validate_names, validate_password, validate_username};
use axum::{extract::{Path, State}, http::StatusCode, Json};

// 회원가입 핸들러
#[utoipa::path(
    post,
    path = "/api/users/register",
    request_body = RegisterUserRequest,
    responses(
        (status = 201, description = "User registered successfully", body = AuthResponse),
        (status = 400, description = "Validation error or username / email already exists"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Users"
)]
pub async fn register(
    State(app_state): State<AppState>,
    Json(request): Json<RegisterUserRequest>,
) -> Result<(StatusCode, Json<AuthResponse>), (StatusCode, Json<serde_json::Value>)> {
    // 1. 요청 검증
    validate_username(&request.username).map_err(AccountError::Validation)?;
    validate_email(&request.email).map_err(AccountError::Validation)?;
    validate_password(&request.password).map_err(AccountError::Validation)?;
    validate_names(request.first_name.as_deref(), request.last_name.as_deref()).map_err(AccountError::Validation)?;

    // 2. Service 호출
    let user = app_state
        .auth_state
        .user_service
        .register(request)
        .await
        .map_err(|e: AccountError| -> (StatusCode, Json<serde_json::Value>) { e.into() })?;

    Ok((
        StatusCode::CREATED,
        Json(AuthResponse {
            message: "User registered successfully".to_string(),
            success: true,
            user: Some(user.into()),
            access_token: None,
        }),
    ))
}

// 로그인 핸들러
#[utoipa::path(
    post,
    path = "/api/users/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = AuthResponse),
        (status = 401, description = "Invalid username or password"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Users"
)]
pub async fn login(
    State(app_state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<AuthResponse>, (StatusCode, Json<serde_json::Value>)> {
    let user = app_state
        .auth_state
        .user_service
        .authenticate(&request.username, &request.password)
        .await
        .map_err(|e: AccountError| -> (StatusCode, Json<serde_json::Value>) { e.into() })?;

    // Access Token 발급
    let access_token = app_state
        .auth_state
        .jwt_service
        .generate_access_token(user.id, &user.username, AccountKind::User)
        .map_err(|e: AccountError| -> (StatusCode, Json<serde_json::Value>) { e.into() })?;

    tracing::info!(user_id = user.id, "User logged in");

    Ok(Json(AuthResponse {
        message: "Login successful".to_string(),
        success: true,
        user: Some(user.into()),
        access_token: Some(access_token),
    }))
}

/// 현재 사용자 정보 조회 핸들러
/// Get current user handler (bearer token of a user account)
#[utoipa::path(
    get,
    path = "/api/users/me",
    responses(
        (status = 200, description = "User information retrieved successfully", body = UserResponse),
        (status = 401, description = "Unauthorized (missing or invalid token)"),
        (status = 404, description = "User not found")
    ),
    tag = "Users",
    security(("BearerAuth" = []))
)]
pub async fn get_me(
    State(app_state): State<AppState>,
    account: AuthenticatedAccount,
) -> Result<Json<UserResponse>, (StatusCode, Json<serde_json::Value>)> {
    // 관리자 토큰으로는 사용자 프로필을 조회할 수 없음
    if account.kind != AccountKind::User {
        return Err(AccountError::InvalidToken.into());
    }

    let user = app_state
        .auth_state
        .user_service
        .find_by_id(account.account_id)
        .await
        .map_err(|e: AccountError| -> (StatusCode, Json<serde_json::Value>) { e.into() })?;

    Ok(Json(user.into()))
}

#[utoipa::path(
    get,
    path = "/api/users/{id}",
    params(("id" = u64, Path, description = "User ID")),
    responses(
        (status = 200, description = "User found", body = UserResponse),
        (status = 404, description = "User not found")
    ),
    tag = "Users"
)]
pub async fn get_user(
    State(app_state): State<AppState>,
    Path(id): Path<u64>,
) -> Result<Json<UserResponse>, (StatusCode, Json<serde_json::Value>)> {
    let user = app_state
        .auth_state
        .user_service
        .find_by_id(id)
        .await
        .map_err(|e: AccountError| -> (StatusCode, Json<serde_json::Value>) { e.into() })?;

    Ok(Json(user.into()))
}

#[utoipa::path(
    get,
    path = "/api/users/username/{username}",
    params(("username" = String, Path, description = "Username")),
    responses(
        (status = 200, description = "User found", body = UserResponse),
        (status = 404, description = "User not found")
    ),
    tag = "Users"
)]
pub async fn get_user_by_username(
    State(app_state): State<AppState>,
    Path(username): Path<String>,
) -> Result<Json<UserResponse>, (StatusCode, Json<serde_json::Value>)> {
    let user = app_state
        .auth_state
        .user_service
        .find_by_username(&username)
        .await
        .map_err(|e: AccountError| -> (StatusCode, Json<serde_json::Value>) { e.into() })?;

    Ok(Json(user.into()))
}

/// 전체 사용자 (최신순)
#[utoipa::path(
    get,
    path = "/api/users",
    responses(
        (status = 200, description = "All users", body = [UserResponse])
    ),
    tag = "Users"
)]
pub async fn get_all_users(
    State(app_state): State<AppState>,
) -> Result<Json<Vec<UserResponse>>, (StatusCode, Json<serde_json::Value>)> {
    let users = app_state
        .auth_state
        .user_service
        .find_all()
        .await
        .map_err(|e: AccountError| -> (StatusCode, Json<serde_json::Value>) { e.into() })?;

    Ok(Json(users.iter().map(UserResponse::from).collect()))
}

#[utoipa::path(
    put,
    path = "/api/users/{id}",
    params(("id" = u64, Path, description = "User ID")),
    request_body = UpdateUserRequest,
    responses(
        (status = 200, description = "User updated", body = UserResponse),
        (status = 400, description = "Validation error or email already exists"),
        (status = 404, description = "User not found")
    ),
    tag = "Users"
)]
pub async fn update_user(
    State(app_state): State<AppState>,
    Path(id): Path<u64>,
    Json(request): Json<UpdateUserRequest>,
) -> Result<Json<UserResponse>, (StatusCode, Json<serde_json::Value>)> {
    if let Some(email) = &request.email {
        validate_email(email).map_err(AccountError::Validation)?;
    }
    validate_names(request.first_name.as_deref(), request.last_name.as_deref()).map_err(AccountError::Validation)?;

    let user = app_state
        .auth_state
        .user_service
        .update(id, request)
        .await
        .map_err(|e: AccountError| -> (StatusCode, Json<serde_json::Value>) { e.into() })?;

    Ok(Json(user.into()))
}

#[utoipa::path(
    put,
    path = "/api/users/{id}/deactivate",
    params(("id" = u64, Path, description = "User ID")),
    responses(
        (status = 200, description = "User deactivated", body = MessageResponse),
        (status = 404, description = "User not found")
    ),
    tag = "Users"
)]
pub async fn deactivate_user(
    State(app_state): State<AppState>,
    Path(id): Path<u64>,
) -> Result<Json<MessageResponse>, (StatusCode, Json<serde_json::Value>)> {
    app_state
        .auth_state
        .user_service
        .deactivate(id)
        .await
        .map_err(|e: AccountError| -> (StatusCode, Json<serde_json::Value>) { e.into() })?;

    Ok(Json(MessageResponse::ok("User deactivated successfully")))
}

#[utoipa::path(
    post,
    path = "/api/users/{id}/change-password",
    params(("id" = u64, Path, description = "User ID")),
    request_body = ChangePasswordRequest,
    responses(
        (status = 200, description = "Password changed", body = MessageResponse),
        (status = 400, description = "Current password is incorrect or new password invalid"),
        (status = 404, description = "User not found")
    ),
    tag = "Users"
)]
pub async fn change_password(
    State(app_state): State<AppState>,
    Path(id): Path<u64>,
    Json(request): Json<ChangePasswordRequest>,
) -> Result<Json<MessageResponse>, (StatusCode, Json<serde_json::Value>)> {
    validate_password(&request.new_password).map_err(AccountError::Validation)?;

    app_state
        .auth_state
        .user_service
        .change_password(id, &request.current_password, &request.new_password)
        .await
        .map_err(|e: AccountError| -> (StatusCode, Json<serde_json::Value>) { e.into() })?;

    Ok(Json(MessageResponse::ok("Password changed successfully")))
}

#[utoipa::path(
    delete,
    path = "/api/users/{id}",
    params(("id" = u64, Path, description = "User ID")),
    responses(
        (status = 204, description = "User deleted"),
        (status = 404, description = "User not found")
    ),
    tag = "Users"
)]
pub async fn delete_user(
    State(app_state): State<AppState>,
    Path(id): Path<u64>,
) -> Result<StatusCode, (StatusCode, Json<serde_json::Value>)> {
    app_state
        .auth_state
        .user_service
        .delete(id)
        .await
        .map_err(|e: AccountError| -> (StatusCode, Json<serde_json::Value>) { e.into() })?;

    Ok(StatusCode::NO_CONTENT)
}
