//! Credential validation rules shared by registration, login, and profile
//! updates. Validation always runs before hashing or persistence so a
//! rejected request has no side effects.

use crate::error::{AppError, Result};

pub const MIN_PASSWORD_LEN: usize = 6;
pub const MAX_PHONE_LEN: usize = 10;

/// Check an address against the registration grammar:
/// `local@domain.tld` where the local part is `[A-Za-z0-9._%+-]+`, the domain
/// is `[A-Za-z0-9.-]+` and the TLD is at least two letters.
pub fn is_valid_email(email: &str) -> bool {
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if local.is_empty()
        || !local
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || "._%+-".contains(c))
    {
        return false;
    }
    let Some((host, tld)) = domain.rsplit_once('.') else {
        return false;
    };
    if host.is_empty()
        || !host
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || ".-".contains(c))
    {
        return false;
    }
    tld.len() >= 2 && tld.chars().all(|c| c.is_ascii_alphabetic())
}

pub fn validate_email(email: &str) -> Result<()> {
    if !is_valid_email(email) {
        return Err(AppError::BadRequest("Invalid email format".into()));
    }
    Ok(())
}

pub fn validate_password(password: &str) -> Result<()> {
    if password.len() < MIN_PASSWORD_LEN {
        return Err(AppError::BadRequest(
            "Password must be at least 6 characters long".into(),
        ));
    }
    Ok(())
}

pub fn validate_phone_number(phone: &str) -> Result<()> {
    if phone.is_empty() || !phone.chars().all(|c| c.is_ascii_digit()) {
        return Err(AppError::BadRequest("Invalid phone number format".into()));
    }
    if phone.len() > MAX_PHONE_LEN {
        return Err(AppError::BadRequest(
            "Phone number must not exceed 10 digits".into(),
        ));
    }
    Ok(())
}

/// A mandatory field must be present and non-blank.
pub fn require_field<'a>(value: Option<&'a str>, field: &str) -> Result<&'a str> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(AppError::BadRequest(format!("{} is required", field))),
    }
}
