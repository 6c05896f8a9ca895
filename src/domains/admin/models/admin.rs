use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use chrono::{DateTime, Utc};
use std::fmt;
use std::str::FromStr;

/// 관리자 권한 등급
/// Admin role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AdminRole {
    SuperAdmin,
    Admin,
    Moderator,
    Support,
}

impl AdminRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            AdminRole::SuperAdmin => "SUPER_ADMIN",
            AdminRole::Admin => "ADMIN",
            AdminRole::Moderator => "MODERATOR",
            AdminRole::Support => "SUPPORT",
        }
    }
}

impl fmt::Display for AdminRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AdminRole {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "SUPER_ADMIN" => Ok(AdminRole::SuperAdmin),
            "ADMIN" => Ok(AdminRole::Admin),
            "MODERATOR" => Ok(AdminRole::Moderator),
            "SUPPORT" => Ok(AdminRole::Support),
            other => Err(anyhow::anyhow!("Unknown admin role: {}", other)),
        }
    }
}

// 관리자 엔티티 (DB 저장용)
#[derive(Debug, Clone, PartialEq)]
pub struct Admin {
    pub id: u64,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub role: AdminRole,
    pub active: bool,
    /// 마지막 로그인 성공 시각
    pub last_login: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewAdmin {
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub role: AdminRole,
}

/// 관리자 조회 조건
#[derive(Debug, Clone, Default)]
pub struct AdminQuery {
    pub active: Option<bool>,
    pub role: Option<AdminRole>,
    /// username, email, first name, last name (case-insensitive substring)
    pub search: Option<String>,
    /// last_login >= since
    pub last_login_since: Option<DateTime<Utc>>,
}

/// 관리자 응답 DTO (비밀번호 제외)
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
#[schema(as = AdminDto)]
pub struct AdminResponse {
    pub id: u64,
    #[schema(example = "root")]
    pub username: String,
    #[schema(example = "admin@example.com")]
    pub email: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub role: AdminRole,
    pub active: bool,
    pub last_login: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&Admin> for AdminResponse {
    fn from(admin: &Admin) -> Self {
        Self {
            id: admin.id,
            username: admin.username.clone(),
            email: admin.email.clone(),
            first_name: admin.first_name.clone(),
            last_name: admin.last_name.clone(),
            role: admin.role,
            active: admin.active,
            last_login: admin.last_login,
            created_at: admin.created_at,
            updated_at: admin.updated_at,
        }
    }
}

impl From<Admin> for AdminResponse {
    fn from(admin: Admin) -> Self {
        AdminResponse::from(&admin)
    }
}

// 관리자 등록 요청
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
#[schema(as = RegisterAdminRequest)]
pub struct RegisterAdminRequest {
    #[schema(example = "root")]
    pub username: String,
    #[schema(example = "admin@example.com")]
    pub email: String,
    #[schema(example = "password123")]
    pub password: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    /// 생략 시 ADMIN
    pub role: Option<AdminRole>,
}

// 관리자 로그인 응답
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
#[schema(as = AdminAuthResponse)]
pub struct AdminAuthResponse {
    pub message: String,
    pub success: bool,
    pub admin: Option<AdminResponse>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub access_token: Option<String>,
}

// 관리자 수정 요청 (None 필드는 유지)
#[derive(Debug, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
#[schema(as = UpdateAdminRequest)]
pub struct UpdateAdminRequest {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub role: Option<AdminRole>,
    pub active: Option<bool>,
}

/// Admin count response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AdminCountResponse {
    pub count: u64,
}

/// 최근 로그인 기준 시각
#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct SinceQuery {
    /// RFC3339
    pub since: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn projection_keeps_role_and_last_login_without_hash() {
        let now = Utc::now();
        let admin = Admin {
            id: 4,
            username: "root".to_string(),
            email: "root@example.com".to_string(),
            password_hash: "$argon2id$hash".to_string(),
            first_name: None,
            last_name: Some("Ops".to_string()),
            role: AdminRole::SuperAdmin,
            active: true,
            last_login: Some(now),
            created_at: now,
            updated_at: now,
        };

        let dto = AdminResponse::from(&admin);
        assert_eq!(dto.id, admin.id);
        assert_eq!(dto.username, admin.username);
        assert_eq!(dto.email, admin.email);
        assert_eq!(dto.first_name, admin.first_name);
        assert_eq!(dto.last_name, admin.last_name);
        assert_eq!(dto.role, admin.role);
        assert_eq!(dto.active, admin.active);
        assert_eq!(dto.last_login, admin.last_login);
        assert_eq!(dto.created_at, admin.created_at);
        assert_eq!(dto.updated_at, admin.updated_at);

        let json = serde_json::to_value(&dto).unwrap();
        assert_eq!(json["role"], "SUPER_ADMIN");
        assert!(json.get("passwordHash").is_none());
        assert!(!json.to_string().contains("argon2"));
    }

    #[test]
    fn role_parses_wire_names() {
        assert_eq!("MODERATOR".parse::<AdminRole>().unwrap(), AdminRole::Moderator);
        assert_eq!(AdminRole::Support.to_string(), "SUPPORT");
        assert!("OWNER".parse::<AdminRole>().is_err());
    }
}
