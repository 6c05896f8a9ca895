use crate::domains::admin::models::{
    AdminAuthResponse, AdminCountResponse, AdminResponse, AdminRole, RegisterAdminRequest,
    SinceQuery, UpdateAdminRequest,
};
use crate::domains::auth::models::{AccountKind, ChangePasswordRequest, LoginRequest, MessageResponse};
use crate::shared::services::AppState;
use crate::shared::errors::AccountError;
use crate::shared::middleware::auth::AuthenticatedAccount;
use crate::shared::utils::{
    validate_email, validate_names, validate_password, validate_username, AdminPage, Page, PageParams, SearchParams,
    ADMIN_SORT_FIELDS,
};
use axum::{extract::{Path, Query, State}, http::StatusCode, Json};

// 관리자 등록 핸들러
#[utoipa::path(
    post,
    path = "/api/admin/register",
    request_body = RegisterAdminRequest,
    responses(
        (status = 201, description = "Admin registered successfully", body = AdminAuthResponse),
        (status = 400, description = "Validation error or admin username / email already exists")
    ),
    tag = "Admins"
)]
pub async fn register(
    State(app_state): State<AppState>,
    Json(request): Json<RegisterAdminRequest>,
) -> Result<(StatusCode, Json<AdminAuthResponse>), (StatusCode, Json<serde_json::Value>)> {
    validate_username(&request.username).map_err(AccountError::Validation)?;
    validate_email(&request.email).map_err(AccountError::Validation)?;
    validate_password(&request.password).map_err(AccountError::Validation)?;
    validate_names(request.first_name.as_deref(), request.last_name.as_deref()).map_err(AccountError::Validation)?;

    let admin = app_state
        .admin_state
        .admin_service
        .register(request)
        .await
        .map_err(|e: AccountError| -> (StatusCode, Json<serde_json::Value>) { e.into() })?;

    Ok((
        StatusCode::CREATED,
        Json(AdminAuthResponse {
            message: "Admin registered successfully".to_string(),
            success: true,
            admin: Some(admin.into()),
            access_token: None,
        }),
    ))
}

// 관리자 로그인 핸들러 (last_login 갱신)
#[utoipa::path(
    post,
    path = "/api/admin/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = AdminAuthResponse),
        (status = 401, description = "Invalid credentials or inactive account")
    ),
    tag = "Admins"
)]
pub async fn login(
    State(app_state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<AdminAuthResponse>, (StatusCode, Json<serde_json::Value>)> {
    let admin = app_state
        .admin_state
        .admin_service
        .authenticate(&request.username, &request.password)
        .await
        .map_err(|e: AccountError| -> (StatusCode, Json<serde_json::Value>) { e.into() })?;

    let access_token = app_state
        .auth_state
        .jwt_service
        .generate_access_token(admin.id, &admin.username, AccountKind::Admin)
        .map_err(|e: AccountError| -> (StatusCode, Json<serde_json::Value>) { e.into() })?;

    Ok(Json(AdminAuthResponse {
        message: "Login successful".to_string(),
        success: true,
        admin: Some(admin.into()),
        access_token: Some(access_token),
    }))
}

/// 현재 관리자 정보 조회 (관리자 토큰만 허용)
#[utoipa::path(
    get,
    path = "/api/admin/me",
    responses(
        (status = 200, description = "Admin information retrieved successfully", body = AdminResponse),
        (status = 401, description = "Unauthorized (missing, invalid or non-admin token)"),
        (status = 404, description = "Admin not found")
    ),
    tag = "Admins",
    security(("BearerAuth" = []))
)]
pub async fn get_me(
    State(app_state): State<AppState>,
    account: AuthenticatedAccount,
) -> Result<Json<AdminResponse>, (StatusCode, Json<serde_json::Value>)> {
    if account.kind != AccountKind::Admin {
        return Err(AccountError::InvalidToken.into());
    }

    let admin = app_state
        .admin_state
        .admin_service
        .find_by_id(account.account_id)
        .await
        .map_err(|e: AccountError| -> (StatusCode, Json<serde_json::Value>) { e.into() })?;

    Ok(Json(admin.into()))
}

#[utoipa::path(
    get,
    path = "/api/admin/{id}",
    params(("id" = u64, Path, description = "Admin ID")),
    responses(
        (status = 200, description = "Admin found", body = AdminResponse),
        (status = 404, description = "Admin not found")
    ),
    tag = "Admins"
)]
pub async fn get_admin(
    State(app_state): State<AppState>,
    Path(id): Path<u64>,
) -> Result<Json<AdminResponse>, (StatusCode, Json<serde_json::Value>)> {
    let admin = app_state
        .admin_state
        .admin_service
        .find_by_id(id)
        .await
        .map_err(|e: AccountError| -> (StatusCode, Json<serde_json::Value>) { e.into() })?;

    Ok(Json(admin.into()))
}

#[utoipa::path(
    get,
    path = "/api/admin/username/{username}",
    params(("username" = String, Path, description = "Admin username")),
    responses(
        (status = 200, description = "Admin found", body = AdminResponse),
        (status = 404, description = "Admin not found")
    ),
    tag = "Admins"
)]
pub async fn get_admin_by_username(
    State(app_state): State<AppState>,
    Path(username): Path<String>,
) -> Result<Json<AdminResponse>, (StatusCode, Json<serde_json::Value>)> {
    let admin = app_state
        .admin_state
        .admin_service
        .find_by_username(&username)
        .await
        .map_err(|e: AccountError| -> (StatusCode, Json<serde_json::Value>) { e.into() })?;

    Ok(Json(admin.into()))
}

/// 활성 관리자 목록 (페이지)
#[utoipa::path(
    get,
    path = "/api/admin",
    params(PageParams),
    responses(
        (status = 200, description = "Active admins", body = AdminPage),
        (status = 400, description = "Unsupported sort field or direction")
    ),
    tag = "Admins"
)]
pub async fn list_admins(
    State(app_state): State<AppState>,
    Query(params): Query<PageParams>,
) -> Result<Json<Page<AdminResponse>>, (StatusCode, Json<serde_json::Value>)> {
    let page = params.to_request(ADMIN_SORT_FIELDS).map_err(AccountError::Validation)?;

    let admins = app_state
        .admin_state
        .admin_service
        .list_paged(&page)
        .await
        .map_err(|e: AccountError| -> (StatusCode, Json<serde_json::Value>) { e.into() })?;

    Ok(Json(admins.map(AdminResponse::from)))
}

#[utoipa::path(
    get,
    path = "/api/admin/search",
    params(SearchParams, PageParams),
    responses(
        (status = 200, description = "Matching active admins", body = AdminPage)
    ),
    tag = "Admins"
)]
pub async fn search_admins(
    State(app_state): State<AppState>,
    Query(search): Query<SearchParams>,
    Query(params): Query<PageParams>,
) -> Result<Json<Page<AdminResponse>>, (StatusCode, Json<serde_json::Value>)> {
    let page = params.to_request(ADMIN_SORT_FIELDS).map_err(AccountError::Validation)?;

    let admins = app_state
        .admin_state
        .admin_service
        .search(&search.query, &page)
        .await
        .map_err(|e: AccountError| -> (StatusCode, Json<serde_json::Value>) { e.into() })?;

    Ok(Json(admins.map(AdminResponse::from)))
}

#[utoipa::path(
    get,
    path = "/api/admin/role/{role}",
    params(("role" = AdminRole, Path, description = "SUPER_ADMIN | ADMIN | MODERATOR | SUPPORT")),
    responses(
        (status = 200, description = "Admins with the role", body = [AdminResponse])
    ),
    tag = "Admins"
)]
pub async fn get_admins_by_role(
    State(app_state): State<AppState>,
    Path(role): Path<AdminRole>,
) -> Result<Json<Vec<AdminResponse>>, (StatusCode, Json<serde_json::Value>)> {
    let admins = app_state
        .admin_state
        .admin_service
        .find_by_role(role)
        .await
        .map_err(|e: AccountError| -> (StatusCode, Json<serde_json::Value>) { e.into() })?;

    Ok(Json(admins.iter().map(AdminResponse::from).collect()))
}

#[utoipa::path(
    put,
    path = "/api/admin/{id}",
    params(("id" = u64, Path, description = "Admin ID")),
    request_body = UpdateAdminRequest,
    responses(
        (status = 200, description = "Admin updated", body = AdminResponse),
        (status = 400, description = "Validation error or admin email already exists"),
        (status = 404, description = "Admin not found")
    ),
    tag = "Admins"
)]
pub async fn update_admin(
    State(app_state): State<AppState>,
    Path(id): Path<u64>,
    Json(request): Json<UpdateAdminRequest>,
) -> Result<Json<AdminResponse>, (StatusCode, Json<serde_json::Value>)> {
    if let Some(email) = &request.email {
        validate_email(email).map_err(AccountError::Validation)?;
    }
    validate_names(request.first_name.as_deref(), request.last_name.as_deref()).map_err(AccountError::Validation)?;

    let admin = app_state
        .admin_state
        .admin_service
        .update(id, request)
        .await
        .map_err(|e: AccountError| -> (StatusCode, Json<serde_json::Value>) { e.into() })?;

    Ok(Json(admin.into()))
}

#[utoipa::path(
    put,
    path = "/api/admin/{id}/deactivate",
    params(("id" = u64, Path, description = "Admin ID")),
    responses(
        (status = 200, description = "Admin deactivated", body = MessageResponse),
        (status = 404, description = "Admin not found")
    ),
    tag = "Admins"
)]
pub async fn deactivate_admin(
    State(app_state): State<AppState>,
    Path(id): Path<u64>,
) -> Result<Json<MessageResponse>, (StatusCode, Json<serde_json::Value>)> {
    app_state
        .admin_state
        .admin_service
        .deactivate(id)
        .await
        .map_err(|e: AccountError| -> (StatusCode, Json<serde_json::Value>) { e.into() })?;

    Ok(Json(MessageResponse::ok("Admin deactivated successfully")))
}

#[utoipa::path(
    delete,
    path = "/api/admin/{id}",
    params(("id" = u64, Path, description = "Admin ID")),
    responses(
        (status = 204, description = "Admin deleted"),
        (status = 404, description = "Admin not found")
    ),
    tag = "Admins"
)]
pub async fn delete_admin(
    State(app_state): State<AppState>,
    Path(id): Path<u64>,
) -> Result<StatusCode, (StatusCode, Json<serde_json::Value>)> {
    app_state
        .admin_state
        .admin_service
        .delete(id)
        .await
        .map_err(|e: AccountError| -> (StatusCode, Json<serde_json::Value>) { e.into() })?;

    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    post,
    path = "/api/admin/{id}/change-password",
    params(("id" = u64, Path, description = "Admin ID")),
    request_body = ChangePasswordRequest,
    responses(
        (status = 200, description = "Password changed", body = MessageResponse),
        (status = 400, description = "Current password is incorrect or new password invalid"),
        (status = 404, description = "Admin not found")
    ),
    tag = "Admins"
)]
pub async fn change_password(
    State(app_state): State<AppState>,
    Path(id): Path<u64>,
    Json(request): Json<ChangePasswordRequest>,
) -> Result<Json<MessageResponse>, (StatusCode, Json<serde_json::Value>)> {
    validate_password(&request.new_password).map_err(AccountError::Validation)?;

    app_state
        .admin_state
        .admin_service
        .change_password(id, &request.current_password, &request.new_password)
        .await
        .map_err(|e: AccountError| -> (StatusCode, Json<serde_json::Value>) { e.into() })?;

    Ok(Json(MessageResponse::ok("Password changed successfully")))
}

#[utoipa::path(
    get,
    path = "/api/admin/stats/count",
    responses(
        (status = 200, description = "Number of active admins", body = AdminCountResponse)
    ),
    tag = "Admins"
)]
pub async fn active_admin_count(
    State(app_state): State<AppState>,
) -> Result<Json<AdminCountResponse>, (StatusCode, Json<serde_json::Value>)> {
    let count = app_state
        .admin_state
        .admin_service
        .active_admin_count()
        .await
        .map_err(|e: AccountError| -> (StatusCode, Json<serde_json::Value>) { e.into() })?;

    Ok(Json(AdminCountResponse { count }))
}

#[utoipa::path(
    get,
    path = "/api/admin/stats/recent",
    params(SinceQuery),
    responses(
        (status = 200, description = "Admins that logged in since the given instant", body = AdminCountResponse)
    ),
    tag = "Admins"
)]
pub async fn recently_active_admin_count(
    State(app_state): State<AppState>,
    Query(query): Query<SinceQuery>,
) -> Result<Json<AdminCountResponse>, (StatusCode, Json<serde_json::Value>)> {
    let count = app_state
        .admin_state
        .admin_service
        .recently_active_admin_count(query.since)
        .await
        .map_err(|e: AccountError| -> (StatusCode, Json<serde_json::Value>) { e.into() })?;

    Ok(Json(AdminCountResponse { count }))
}
