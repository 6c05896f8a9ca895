// src/domains/auth/services/jwt_service.rs
use crate::shared::errors::AccountError;
use crate::domains::auth::models::jwt::{AccountKind, Claims};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};

/// Access Token 수명 (시간)
pub const ACCESS_TOKEN_HOURS: i64 = 1;

/// JWT 서비스
/// JWT Service for token generation and verification (HS256)
#[derive(Clone)]
pub struct JwtService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl JwtService {
    /// JWT Service 생성
    /// Create JWT Service
    pub fn new(secret: &str) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
        }
    }

    /// Access Token 발급 (1시간)
    /// Generate Access Token
    pub fn generate_access_token(
        &self,
        account_id: u64,
        username: &str,
        kind: AccountKind,
    ) -> Result<String, AccountError> {
        let claims = Claims::new(account_id, username.to_string(), kind, ACCESS_TOKEN_HOURS);

        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| AccountError::Internal(format!("Failed to generate access token: {}", e)))
    }

    /// Access Token 검증 (만료 포함)
    /// Verify Access Token
    pub fn verify_access_token(&self, token: &str) -> Result<Claims, AccountError> {
        let token_data = decode::<Claims>(token, &self.decoding_key, &Validation::default())
            .map_err(|_| AccountError::InvalidToken)?;

        Ok(token_data.claims)
    }
}
