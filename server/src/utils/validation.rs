//! Input validation helpers
//!
//! Length caps and field checks shared by the API handlers. The document
//! store never enforces text length on its own, so every free-text field
//! gets capped here before it is written.

use crate::utils::AppError;

// ── Length caps ─────────────────────────────────────────────────────

/// Display names, shop names, item names
pub const MAX_NAME_LEN: usize = 200;

/// Notes (customer notes, vendor notes)
pub const MAX_NOTE_LEN: usize = 500;

/// Short identifiers: phone, vehicle type, zip code, payment method
pub const MAX_SHORT_TEXT_LEN: usize = 100;

/// Upper bound from RFC 5321 mailbox limits
pub const MAX_EMAIL_LEN: usize = 254;

/// Plaintext password cap, applied before hashing
pub const MAX_PASSWORD_LEN: usize = 128;

/// Passwords must carry at least this many characters
pub const MIN_PASSWORD_LEN: usize = 6;

/// Image URLs and other link fields
pub const MAX_URL_LEN: usize = 2048;

/// Street, city, state, shop address
pub const MAX_ADDRESS_LEN: usize = 500;

/// Client-generated order identifiers
pub const MAX_ORDER_ID_LEN: usize = 64;

/// Line items per order
pub const MAX_ORDER_ITEMS: usize = 100;

// ── Field checks ────────────────────────────────────────────────────

fn too_long(field: &str, len: usize, max_len: usize) -> AppError {
    AppError::validation(format!("{field} exceeds {max_len} characters (got {len})"))
}

/// Required string: non-empty after trimming, within the cap.
pub fn validate_required_text(value: &str, field: &str, max_len: usize) -> Result<(), AppError> {
    if value.trim().is_empty() {
        return Err(AppError::validation(format!("{field} is required")));
    }
    if value.len() > max_len {
        return Err(too_long(field, value.len(), max_len));
    }
    Ok(())
}

/// Optional string: absent is fine, present must fit the cap.
pub fn validate_optional_text(
    value: &Option<String>,
    field: &str,
    max_len: usize,
) -> Result<(), AppError> {
    match value {
        Some(v) if v.len() > max_len => Err(too_long(field, v.len(), max_len)),
        _ => Ok(()),
    }
}

/// Validate an email address: non-empty, length-capped, shaped like `a@b`.
///
/// Deliberately loose - the mailbox is never verified, this only catches
/// obvious garbage before it becomes an identity key.
pub fn validate_email(email: &str) -> Result<(), AppError> {
    validate_required_text(email, "email", MAX_EMAIL_LEN)?;
    let trimmed = email.trim();
    let mut parts = trimmed.splitn(2, '@');
    let local = parts.next().unwrap_or_default();
    let domain = parts.next().unwrap_or_default();
    if local.is_empty() || domain.is_empty() || !domain.contains('.') {
        return Err(AppError::validation(format!(
            "'{trimmed}' is not a valid email address"
        )));
    }
    Ok(())
}

/// Validate a plaintext password before hashing.
pub fn validate_password(password: &str) -> Result<(), AppError> {
    if password.len() < MIN_PASSWORD_LEN {
        return Err(AppError::validation(format!(
            "password must be at least {MIN_PASSWORD_LEN} characters"
        )));
    }
    if password.len() > MAX_PASSWORD_LEN {
        return Err(too_long("password", password.len(), MAX_PASSWORD_LEN));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn required_text_rejects_empty_and_oversized() {
        assert!(validate_required_text("ok", "name", MAX_NAME_LEN).is_ok());
        assert!(validate_required_text("   ", "name", MAX_NAME_LEN).is_err());
        assert!(validate_required_text(&"x".repeat(MAX_NAME_LEN + 1), "name", MAX_NAME_LEN).is_err());
    }

    #[test]
    fn optional_text_allows_none() {
        assert!(validate_optional_text(&None, "phone", MAX_SHORT_TEXT_LEN).is_ok());
        assert!(validate_optional_text(&Some("123".into()), "phone", MAX_SHORT_TEXT_LEN).is_ok());
        let long = Some("x".repeat(MAX_SHORT_TEXT_LEN + 1));
        assert!(validate_optional_text(&long, "phone", MAX_SHORT_TEXT_LEN).is_err());
    }

    #[test]
    fn email_shape_is_checked() {
        assert!(validate_email("shop@example.com").is_ok());
        assert!(validate_email("shop@x.co").is_ok());
        assert!(validate_email("not-an-email").is_err());
        assert!(validate_email("@example.com").is_err());
        assert!(validate_email("user@").is_err());
        assert!(validate_email("user@nodot").is_err());
    }

    #[test]
    fn password_bounds_are_enforced() {
        assert!(validate_password("secret").is_ok());
        assert!(validate_password("12345").is_err());
        assert!(validate_password(&"x".repeat(MAX_PASSWORD_LEN + 1)).is_err());
    }
}
