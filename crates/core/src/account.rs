//! Account field rules shared by registration, login, profile and the
//! newsletter.

use validator::ValidateEmail;

use crate::error::CoreError;

/// Minimum password length, counted in characters after trimming.
pub const MIN_PASSWORD_LENGTH: usize = 6;

/// Trimmed and lower-cased; the form every email is stored and looked up in.
pub fn normalize_email(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// Normalize `raw` and check it is a syntactically valid address.
pub fn parse_email(raw: &str) -> Result<String, CoreError> {
    let email = normalize_email(raw);
    if email.is_empty() {
        return Err(CoreError::Validation("Email is required".into()));
    }
    if !email.validate_email() {
        return Err(CoreError::Validation("Invalid email".into()));
    }
    Ok(email)
}

/// Passwords are compared and hashed in trimmed form.
pub fn normalize_password(raw: &str) -> &str {
    raw.trim()
}

/// Display names and avatar URLs: trimmed, blank becomes `None`.
pub fn optional_profile_field(raw: Option<&str>) -> Option<String> {
    raw.map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}
