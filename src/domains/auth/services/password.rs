use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier};
use argon2::password_hash::{rand_core::OsRng, SaltString};
use crate::shared::errors::AccountError;

/// 비밀번호 해싱 (argon2 PHC 문자열)
pub fn hash_password(password: &str) -> Result<String, AccountError> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    let password_hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| AccountError::PasswordHashingFailed(e.to_string()))?
        .to_string();

    Ok(password_hash)
}

/// 비밀번호 검증 (불일치 → false, 저장된 해시 손상 → 에러)
pub fn verify_password(password: &str, password_hash: &str) -> Result<bool, AccountError> {
    let parsed_hash = PasswordHash::new(password_hash)
        .map_err(|e| AccountError::Internal(format!("Invalid password hash: {}", e)))?;

    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hashes_are_salted_and_verifiable() {
        let first = hash_password("password123").unwrap();
        let second = hash_password("password123").unwrap();

        assert_ne!(first, second);
        assert!(first.starts_with("$argon2"));
        assert!(verify_password("password123", &first).unwrap());
        assert!(!verify_password("wrong-password", &first).unwrap());
        assert!(verify_password("password123", "not-a-phc-string").is_err());
    }
}
