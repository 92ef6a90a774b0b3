//! Input validation helpers
//!
//! Centralized text length constants and validation functions.
//! SQLite TEXT has no built-in length enforcement, so limits live here.

use crate::utils::AppError;

// ── Text length limits ──────────────────────────────────────────────

/// Person names: members, operators, emergency contacts
pub const MAX_NAME_LEN: usize = 200;

/// Notes and free-text remarks
pub const MAX_NOTE_LEN: usize = 500;

/// Short identifiers: phone, contact, ID numbers, gender labels
pub const MAX_SHORT_TEXT_LEN: usize = 100;

/// Email addresses (RFC 5321)
pub const MAX_EMAIL_LEN: usize = 254;

/// Passwords (before hashing)
pub const MAX_PASSWORD_LEN: usize = 128;

/// URLs / photo paths
pub const MAX_URL_LEN: usize = 2048;

/// Addresses
pub const MAX_ADDRESS_LEN: usize = 500;

// ── Validation helpers (CRUD handlers) ──────────────────────────────

/// Validate that a required string is non-empty and within the length limit.
pub fn validate_required_text(value: &str, field: &str, max_len: usize) -> Result<(), AppError> {
    if value.trim().is_empty() {
        return Err(AppError::validation(format!("{field} must not be empty")));
    }
    if value.len() > max_len {
        return Err(AppError::validation(format!(
            "{field} is too long ({} chars, max {max_len})",
            value.len()
        )));
    }
    Ok(())
}

/// Validate that an optional string, if present, is within the length limit.
pub fn validate_optional_text(
    value: &Option<String>,
    field: &str,
    max_len: usize,
) -> Result<(), AppError> {
    if let Some(v) = value
        && v.len() > max_len
    {
        return Err(AppError::validation(format!(
            "{field} is too long ({} chars, max {max_len})",
            v.len()
        )));
    }
    Ok(())
}

/// Validate that an optional string, if present, is one of the allowed values.
pub fn validate_optional_one_of(
    value: &Option<String>,
    field: &str,
    allowed: &[&str],
) -> Result<(), AppError> {
    if let Some(v) = value
        && !allowed.contains(&v.as_str())
    {
        return Err(AppError::validation(format!(
            "{field} must be one of {allowed:?}, got {v:?}"
        )));
    }
    Ok(())
}

/// Validate a monetary amount is finite and strictly positive.
pub fn validate_amount(value: f64, field: &str) -> Result<(), AppError> {
    if !value.is_finite() {
        return Err(AppError::validation(format!(
            "{field} must be a finite number"
        )));
    }
    if value <= 0.0 {
        return Err(AppError::validation(format!(
            "{field} must be positive, got {value}"
        )));
    }
    Ok(())
}

/// Validate a configured price is finite and non-negative.
pub fn validate_price(value: f64, field: &str) -> Result<(), AppError> {
    if !value.is_finite() {
        return Err(AppError::validation(format!(
            "{field} must be a finite number"
        )));
    }
    if value < 0.0 {
        return Err(AppError::validation(format!(
            "{field} must be non-negative, got {value}"
        )));
    }
    Ok(())
}
