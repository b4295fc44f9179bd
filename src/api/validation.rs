use chrono::NaiveDate;
use regex::Regex;
use std::sync::LazyLock;

use super::ApiError;

/// Same phone shape the mobile app enforces: optional +, 9-15 digits.
static PHONE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\+?1?\d{9,15}$").expect("phone regex is valid"));

static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("email regex is valid"));

pub fn validate_email(email: &str) -> Result<&str, ApiError> {
    let trimmed = email.trim();
    if trimmed.is_empty() {
        return Err(ApiError::validation("Email is required"));
    }
    if !EMAIL_RE.is_match(trimmed) {
        return Err(ApiError::validation("Enter a valid email address"));
    }
    Ok(trimmed)
}

pub fn validate_username(username: &str) -> Result<&str, ApiError> {
    let trimmed = username.trim();
    if trimmed.is_empty() {
        return Err(ApiError::validation("Username is required"));
    }
    if trimmed.len() > 150 {
        return Err(ApiError::validation("Username must be 150 characters or less"));
    }
    if !trimmed
        .chars()
        .all(|c| c.is_alphanumeric() || c == '.' || c == '-' || c == '_')
    {
        return Err(ApiError::validation(
            "Username can only contain letters, numbers, dots, hyphens, and underscores",
        ));
    }
    Ok(trimmed)
}

pub fn validate_password(password: &str) -> Result<&str, ApiError> {
    if password.len() < 8 {
        return Err(ApiError::validation(
            "Password must be at least 8 characters",
        ));
    }
    Ok(password)
}

/// Accepts an absent/empty phone; a present one must match the pattern.
pub fn validate_optional_phone(phone: Option<&str>) -> Result<(), ApiError> {
    if let Some(phone) = phone
        && !phone.trim().is_empty()
        && !PHONE_RE.is_match(phone.trim())
    {
        return Err(ApiError::validation("Enter a valid phone number"));
    }
    Ok(())
}

/// Parses an ISO `YYYY-MM-DD` date field.
pub fn validate_optional_date(
    value: Option<&str>,
    field: &str,
) -> Result<Option<NaiveDate>, ApiError> {
    match value {
        None => Ok(None),
        Some(s) if s.trim().is_empty() => Ok(None),
        Some(s) => NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
            .map(Some)
            .map_err(|_| ApiError::validation(format!("{field} must be an ISO date (YYYY-MM-DD)"))),
    }
}

/// A date of birth must parse and lie in the past.
pub fn validate_date_of_birth(value: Option<&str>) -> Result<(), ApiError> {
    if let Some(dob) = validate_optional_date(value, "date_of_birth")?
        && dob >= chrono::Utc::now().date_naive()
    {
        return Err(ApiError::validation("Date of birth must be in the past"));
    }
    Ok(())
}

pub fn validate_document_id(id: i32) -> Result<i32, ApiError> {
    if id <= 0 {
        return Err(ApiError::validation(format!(
            "Invalid document ID: {}. ID must be a positive integer",
            id
        )));
    }
    Ok(id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_email() {
        assert!(validate_email("worker@example.com").is_ok());
        assert!(validate_email("  padded@example.com  ").is_ok());
        assert!(validate_email("").is_err());
        assert!(validate_email("not-an-email").is_err());
        assert!(validate_email("two@at@example.com").is_err());
    }

    #[test]
    fn test_validate_username() {
        assert!(validate_username("worker_1").is_ok());
        assert!(validate_username("jane.doe").is_ok());
        assert!(validate_username("").is_err());
        assert!(validate_username("bad name").is_err());
        assert!(validate_username(&"a".repeat(151)).is_err());
    }

    #[test]
    fn test_validate_password() {
        assert!(validate_password("longenough").is_ok());
        assert!(validate_password("short").is_err());
    }

    #[test]
    fn test_validate_optional_phone() {
        assert!(validate_optional_phone(None).is_ok());
        assert!(validate_optional_phone(Some("")).is_ok());
        assert!(validate_optional_phone(Some("+61412345678")).is_ok());
        assert!(validate_optional_phone(Some("0412345678")).is_ok());
        assert!(validate_optional_phone(Some("not-a-phone")).is_err());
        assert!(validate_optional_phone(Some("12345")).is_err());
    }

    #[test]
    fn test_validate_optional_date() {
        assert_eq!(validate_optional_date(None, "d").unwrap(), None);
        assert_eq!(validate_optional_date(Some(""), "d").unwrap(), None);
        assert!(validate_optional_date(Some("2026-02-30"), "d").is_err());
        assert!(validate_optional_date(Some("06/08/2026"), "d").is_err());
        assert_eq!(
            validate_optional_date(Some("2026-08-06"), "d").unwrap(),
            NaiveDate::parse_from_str("2026-08-06", "%Y-%m-%d").ok()
        );
    }

    #[test]
    fn test_validate_date_of_birth_must_be_past() {
        assert!(validate_date_of_birth(Some("1990-01-01")).is_ok());
        assert!(validate_date_of_birth(Some("2999-01-01")).is_err());
        assert!(validate_date_of_birth(None).is_ok());
    }

    #[test]
    fn test_validate_document_id() {
        assert!(validate_document_id(1).is_ok());
        assert!(validate_document_id(0).is_err());
        assert!(validate_document_id(-5).is_err());
    }
}
