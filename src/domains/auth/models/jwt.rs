use serde::{Deserialize, Serialize};

/// 계정 종류 (토큰 주체)
/// Kind of account a token was issued for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AccountKind {
    User,
    Admin,
}

/// JWT Claims (토큰에 포함될 데이터)
/// JWT Claims (data to be included in token)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// 계정 ID (users.id 또는 admins.id)
    /// Account ID
    pub account_id: u64,

    /// 사용자명
    /// Username
    pub username: String,

    pub kind: AccountKind,

    /// 만료 시간 (Unix timestamp)
    /// Expiration time (Unix timestamp)
    pub exp: i64,

    /// 발급 시간 (Unix timestamp)
    /// Issued at (Unix timestamp)
    pub iat: i64,
}

impl Claims {
    /// 새 Claims 생성 (만료 시간 자동 계산)
    /// Create new Claims (expiration time automatically calculated)
    pub fn new(account_id: u64, username: String, kind: AccountKind, expiration_hours: i64) -> Self {
        let now = chrono::Utc::now().timestamp();
        let exp = now + (expiration_hours * 3600); // hours to seconds

        Self {
            account_id,
            username,
            kind,
            exp,
            iat: now,
        }
    }
}
