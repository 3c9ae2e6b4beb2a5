//! Input validation helpers

use validator::ValidateEmail;

/// Email shape check applied before account creation.
pub fn email_is_valid(email: &str) -> bool {
    email.validate_email()
}

/// Password complexity rules, checked in order: at least 8 characters
/// with one uppercase, one lowercase, one digit and one special
/// character. Returns the first broken rule as a user-facing message.
pub fn password_issue(password: &str) -> Option<&'static str> {
    if password.len() < 8 {
        return Some("Password must be at least 8 characters long");
    }
    if !password.chars().any(|c| c.is_ascii_uppercase()) {
        return Some("Password must contain at least one uppercase letter");
    }
    if !password.chars().any(|c| c.is_ascii_lowercase()) {
        return Some("Password must contain at least one lowercase letter");
    }
    if !password.chars().any(|c| c.is_ascii_digit()) {
        return Some("Password must contain at least one number");
    }
    if !password.chars().any(|c| !c.is_alphanumeric()) {
        return Some("Password must contain at least one special character");
    }
    None
}

pub fn password_is_strong(password: &str) -> bool {
    password_issue(password).is_none()
}

/// Emails are matched case-insensitively, stored lowercase
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}
