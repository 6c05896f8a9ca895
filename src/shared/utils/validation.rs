use rust_decimal::Decimal;

// 요청 경계 검증 규칙
pub const USERNAME_MIN: usize = 3;
pub const USERNAME_MAX: usize = 50;
pub const PASSWORD_MIN: usize = 8;
pub const PASSWORD_MAX: usize = 100;
/// VARCHAR(255)
pub const EMAIL_MAX: usize = 255;
/// first_name / last_name VARCHAR(100)
pub const NAME_MAX: usize = 100;
/// 소수점 8자리 (NUMERIC(20,8))
pub const AMOUNT_SCALE: u32 = 8;
/// NUMERIC(20,8) 정수부 12자리
pub const AMOUNT_INTEGER_DIGITS: u32 = 12;

/// 10^12 (NUMERIC(20,8)에 들어가지 않는 가장 작은 양수 정수)
pub fn numeric_limit() -> Decimal {
    Decimal::from(10_i64.pow(AMOUNT_INTEGER_DIGITS))
}

/// NUMERIC(20,8)에 손실 없이 저장 가능한지 (|value| < 10^12, 소수점 8자리 이하)
pub fn fits_numeric(value: Decimal) -> bool {
    value.abs() < numeric_limit() && value.normalize().scale() <= AMOUNT_SCALE
}

pub fn validate_username(username: &str) -> Result<(), String> {
    // 최소 길이는 공백 제외, 최대 길이는 저장되는 원본 기준
    let trimmed = username.trim().chars().count();
    let stored = username.chars().count();
    if trimmed < USERNAME_MIN || stored > USERNAME_MAX {
        return Err(format!(
            "Username must be between {} and {} characters",
            USERNAME_MIN, USERNAME_MAX
        ));
    }
    Ok(())
}

pub fn validate_password(password: &str) -> Result<(), String> {
    let len = password.chars().count();
    if !(PASSWORD_MIN..=PASSWORD_MAX).contains(&len) {
        return Err(format!(
            "Password must be between {} and {} characters",
            PASSWORD_MIN, PASSWORD_MAX
        ));
    }
    Ok(())
}

/// local@domain.tld 형태만 확인
pub fn validate_email(email: &str) -> Result<(), String> {
    if email.chars().count() > EMAIL_MAX {
        return Err(format!("Email must be at most {} characters", EMAIL_MAX));
    }
    let invalid = || Err(format!("Invalid email address: {}", email));

    let Some((local, domain)) = email.split_once('@') else {
        return invalid();
    };
    if local.is_empty() || domain.contains('@') || email.chars().any(char::is_whitespace) {
        return invalid();
    }
    match domain.rsplit_once('.') {
        Some((host, tld)) if !host.is_empty() && !tld.is_empty() => Ok(()),
        _ => invalid(),
    }
}

/// 최소 0.00000001, 10^12 미만, 소수점 8자리 이하
pub fn validate_amount(amount: Decimal) -> Result<(), String> {
    if amount < Decimal::new(1, AMOUNT_SCALE) {
        return Err("Amount must be at least 0.00000001".to_string());
    }
    if amount >= numeric_limit() {
        return Err(format!("Amount must be less than {}", numeric_limit()));
    }
    if amount.normalize().scale() > AMOUNT_SCALE {
        return Err("Amount must have at most 8 decimal places".to_string());
    }
    Ok(())
}

/// 관리자 잔액 덮어쓰기: 0 이상, 10^12 미만, 소수점 8자리 이하
pub fn validate_balance(balance: Decimal) -> Result<(), String> {
    if balance < Decimal::ZERO {
        return Err("Balance must not be negative".to_string());
    }
    if balance >= numeric_limit() {
        return Err(format!("Balance must be less than {}", numeric_limit()));
    }
    if balance.normalize().scale() > AMOUNT_SCALE {
        return Err("Balance must have at most 8 decimal places".to_string());
    }
    Ok(())
}

/// 선택 입력 이름 필드 (first_name / last_name)
pub fn validate_names(first_name: Option<&str>, last_name: Option<&str>) -> Result<(), String> {
    for (field, value) in [("firstName", first_name), ("lastName", last_name)] {
        if value.is_some_and(|v| v.chars().count() > NAME_MAX) {
            return Err(format!("{} must be at most {} characters", field, NAME_MAX));
        }
    }
    Ok(())
}

pub fn validate_not_blank(field: &str, value: &str) -> Result<(), String> {
    if value.trim().is_empty() {
        return Err(format!("{} must not be blank", field));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn email_shape() {
        assert!(validate_email("user@example.com").is_ok());
        assert!(validate_email("a.b+c@mail.example.org").is_ok());
        assert!(validate_email("userexample.com").is_err());
        assert!(validate_email("@example.com").is_err());
        assert!(validate_email("user@example").is_err());
        assert!(validate_email("user@.com").is_err());
        assert!(validate_email("us er@example.com").is_err());

        let at_limit = format!("{}@example.com", "e".repeat(EMAIL_MAX - "@example.com".len()));
        assert!(validate_email(&at_limit).is_ok());
        let over_limit = format!("e{}", at_limit);
        assert_eq!(
            validate_email(&over_limit).unwrap_err(),
            "Email must be at most 255 characters"
        );
    }

    #[test]
    fn length_bounds() {
        assert!(validate_username("ab").is_err());
        assert!(validate_username("abc").is_ok());
        assert!(validate_username(&"x".repeat(50)).is_ok());
        assert!(validate_username(&"x".repeat(51)).is_err());
        // 저장되는 값은 공백 포함 원본
        assert!(validate_username(&format!(" {} ", "x".repeat(49))).is_err());
        assert!(validate_username(" ab ").is_err());
        assert!(validate_password("1234567").is_err());
        assert!(validate_password("12345678").is_ok());
        assert!(validate_password(&"p".repeat(101)).is_err());
    }

    #[test]
    fn amount_bounds() {
        assert!(validate_amount(Decimal::from_str("0.00000001").unwrap()).is_ok());
        assert!(validate_amount(Decimal::from_str("0.500000000").unwrap()).is_ok());
        assert!(validate_amount(Decimal::ZERO).is_err());
        assert!(validate_amount(Decimal::from_str("-1").unwrap()).is_err());
        assert!(validate_amount(Decimal::from_str("0.000000011").unwrap()).is_err());

        assert!(validate_amount(Decimal::from_str("999999999999.99999999").unwrap()).is_ok());
        assert_eq!(
            validate_amount(Decimal::from_str("1000000000000").unwrap()).unwrap_err(),
            "Amount must be less than 1000000000000"
        );
        assert!(validate_amount(Decimal::from_str("50000000000000000000000000000").unwrap()).is_err());
    }

    #[test]
    fn balance_bounds() {
        assert!(validate_balance(Decimal::ZERO).is_ok());
        assert!(validate_balance(Decimal::from_str("999999999999.99999999").unwrap()).is_ok());
        assert!(validate_balance(Decimal::from_str("-0.00000001").unwrap()).is_err());
        assert_eq!(
            validate_balance(Decimal::from_str("1000000000000").unwrap()).unwrap_err(),
            "Balance must be less than 1000000000000"
        );
        assert!(validate_balance(Decimal::from_str("1.123456789").unwrap()).is_err());
    }

    #[test]
    fn numeric_range() {
        assert!(fits_numeric(Decimal::from_str("-999999999999.99999999").unwrap()));
        assert!(fits_numeric(Decimal::from_str("1.10000000000").unwrap()));
        assert!(!fits_numeric(Decimal::from_str("-1000000000000").unwrap()));
        assert!(!fits_numeric(Decimal::from_str("0.123456789").unwrap()));
    }

    #[test]
    fn name_lengths() {
        let at_limit = "n".repeat(NAME_MAX);
        let over_limit = "n".repeat(NAME_MAX + 1);
        assert!(validate_names(None, None).is_ok());
        assert!(validate_names(Some(&at_limit), Some(&at_limit)).is_ok());
        assert_eq!(
            validate_names(Some(&over_limit), None).unwrap_err(),
            "firstName must be at most 100 characters"
        );
        assert_eq!(
            validate_names(Some("Kim"), Some(&over_limit)).unwrap_err(),
            "lastName must be at most 100 characters"
        );
    }
}
