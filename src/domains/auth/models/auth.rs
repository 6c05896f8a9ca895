use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use crate::domains::auth::models::user::UserResponse;

// 회원가입 요청 모델
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
#[schema(as = RegisterUserRequest)]
pub struct RegisterUserRequest {
    /// Username (3-50 characters)
    /// 사용자명 (3-50자)
    #[schema(example = "johndoe")]
    pub username: String,

    /// Email address
    /// 이메일 주소
    #[schema(example = "user@example.com")]
    pub email: String,

    /// Password (8-100 characters, will be hashed)
    /// 비밀번호 (해싱됨)
    #[schema(example = "password123")]
    pub password: String,

    #[schema(example = "John")]
    pub first_name: Option<String>,

    #[schema(example = "Doe")]
    pub last_name: Option<String>,
}

// 로그인 요청 모델 (사용자 / 관리자 공용)
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[schema(as = LoginRequest)]
pub struct LoginRequest {
    /// Username
    /// 사용자명
    #[schema(example = "johndoe")]
    pub username: String,

    /// Password
    /// 비밀번호
    #[schema(example = "password123")]
    pub password: String,
}

// 회원가입 / 로그인 응답 모델
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
#[schema(as = AuthResponse)]
pub struct AuthResponse {
    /// Result message
    /// 결과 메시지
    pub message: String,

    pub success: bool,

    /// User information (without password)
    /// 사용자 정보 (비밀번호 제외)
    pub user: Option<UserResponse>,

    /// JWT Access Token (로그인 시에만)
    /// JWT Access Token (login only)
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(example = "eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9...")]
    pub access_token: Option<String>,
}

// 프로필 수정 요청 (None 필드는 유지)
#[derive(Debug, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
#[schema(as = UpdateUserRequest)]
pub struct UpdateUserRequest {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    #[schema(example = "new@example.com")]
    pub email: Option<String>,
    pub active: Option<bool>,
}

// 비밀번호 변경 요청 (사용자 / 관리자 공용)
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
#[schema(as = ChangePasswordRequest)]
pub struct ChangePasswordRequest {
    pub current_password: String,
    /// 8-100 characters
    pub new_password: String,
}

// 단순 메시지 응답
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[schema(as = MessageResponse)]
pub struct MessageResponse {
    pub message: String,
    pub success: bool,
}

impl MessageResponse {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            success: true,
        }
    }
}
