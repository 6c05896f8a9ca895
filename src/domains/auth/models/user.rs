use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use chrono::{DateTime, Utc};

// 사용자 엔티티 (DB 저장용)
// User row; password_hash는 응답으로 노출하지 않음
#[derive(Debug, Clone, PartialEq)]
pub struct User {
    pub id: u64,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// 사용자 생성용 데이터 (비밀번호는 이미 해싱됨)
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

/// 사용자 조회 조건
/// User filter shared by listing, searching and counting
#[derive(Debug, Clone, Default)]
pub struct UserQuery {
    pub active: Option<bool>,
    /// username, email, first name, last name (case-insensitive substring)
    pub search: Option<String>,
    /// inclusive
    pub created_from: Option<DateTime<Utc>>,
    /// inclusive
    pub created_to: Option<DateTime<Utc>>,
}

/// 사용자 응답 DTO (비밀번호 제외)
/// User profile DTO (without password)
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
#[schema(as = UserDto)]
pub struct UserResponse {
    pub id: u64,
    #[schema(example = "johndoe")]
    pub username: String,
    #[schema(example = "user@example.com")]
    pub email: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&User> for UserResponse {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
            email: user.email.clone(),
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            active: user.active,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        UserResponse::from(&user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn projection_copies_fields_and_drops_password_hash() {
        let user = User {
            id: 1,
            username: "alice".to_string(),
            email: "alice@example.com".to_string(),
            password_hash: "$argon2id$v=19$secret".to_string(),
            first_name: Some("Alice".to_string()),
            last_name: None,
            active: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        let dto = UserResponse::from(&user);
        assert_eq!(dto.id, user.id);
        assert_eq!(dto.username, user.username);
        assert_eq!(dto.email, user.email);
        assert_eq!(dto.first_name, user.first_name);
        assert_eq!(dto.last_name, user.last_name);
        assert_eq!(dto.active, user.active);
        assert_eq!(dto.created_at, user.created_at);
        assert_eq!(dto.updated_at, user.updated_at);

        let json = serde_json::to_string(&dto).unwrap();
        assert!(!json.contains("argon2"));
        assert!(json.contains("\"firstName\":\"Alice\""));
    }
}
