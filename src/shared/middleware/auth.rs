use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts, StatusCode},
    Json,
};
use crate::shared::services::AppState;
use crate::shared::errors::AccountError;
use crate::domains::auth::models::AccountKind;

/// 인증된 계정 정보 (JWT 토큰에서 추출)
/// Authenticated account information (extracted from a bearer token)
#[derive(Debug, Clone)]
pub struct AuthenticatedAccount {
    pub account_id: u64,
    pub username: String,
    pub kind: AccountKind,
}

/// AuthenticatedAccount를 Axum Extractor로 구현
///
/// 사용법:
/// ```rust,ignore
/// pub async fn me(
///     State(app_state): State<AppState>,
///     account: AuthenticatedAccount,
/// ) -> Result<...> {
///     let id = account.account_id;
///     // ...
/// }
/// ```
#[async_trait]
impl FromRequestParts<AppState> for AuthenticatedAccount {
    type Rejection = (StatusCode, Json<serde_json::Value>);

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        // 1. Authorization 헤더
        let header = parts
            .headers
            .get(AUTHORIZATION)
            .ok_or(AccountError::MissingToken)?
            .to_str()
            .map_err(|_| AccountError::InvalidToken)?;

        // 2. "Bearer <token>"
        let token = header.strip_prefix("Bearer ").ok_or(AccountError::InvalidToken)?;

        // 3. 서명 / 만료 검증
        let claims = state.auth_state.jwt_service.verify_access_token(token)?;

        Ok(AuthenticatedAccount {
            account_id: claims.account_id,
            username: claims.username,
            kind: claims.kind,
        })
    }
}
