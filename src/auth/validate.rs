use lazy_static::lazy_static;
use regex::Regex;
use thiserror::Error;

/// Why a signup or login payload was rejected before any lookup ran.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Please provide all required fields")]
    MissingField,
    #[error("Invalid email format")]
    InvalidEmailFormat,
    #[error("Mobile number must be 10 digits")]
    InvalidMobileFormat,
}

lazy_static! {
    static ref EMAIL_RE: Regex =
        Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$").unwrap();
    static ref MOBILE_RE: Regex = Regex::new(r"^[0-9]{10}$").unwrap();
}

/// Checks run in a fixed order: presence, then email shape, then mobile shape.
pub fn validate_signup(
    name: &str,
    email: &str,
    mobile_num: &str,
    password: &str,
) -> Result<(), ValidationError> {
    if name.is_empty() || email.is_empty() || mobile_num.is_empty() || password.is_empty() {
        return Err(ValidationError::MissingField);
    }
    if !EMAIL_RE.is_match(email) {
        return Err(ValidationError::InvalidEmailFormat);
    }
    if !MOBILE_RE.is_match(mobile_num) {
        return Err(ValidationError::InvalidMobileFormat);
    }
    Ok(())
}

pub fn validate_login(email: &str, password: &str) -> Result<(), ValidationError> {
    if email.is_empty() || password.is_empty() {
        return Err(ValidationError::MissingField);
    }
    if !EMAIL_RE.is_match(email) {
        return Err(ValidationError::InvalidEmailFormat);
    }
    Ok(())
}
