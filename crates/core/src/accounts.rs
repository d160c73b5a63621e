//! Registration input rules shared by the auth handlers.

/// Minimum accepted password length.
pub const PASSWORD_MIN_LENGTH: usize = 8;

/// Normalize a submitted email address: trim surrounding whitespace and
/// lowercase. Applied before every lookup or insert so the unique constraint
/// on `users.email` sees one canonical form.
pub fn normalize_email(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// Validate a sign-up submission.
///
/// Checks, in order: every field present, passwords matching, and the
/// minimum password length. Returns the first failing rule's message.
pub fn validate_registration(
    email: &str,
    password: &str,
    confirm_password: &str,
) -> Result<(), String> {
    if email.is_empty() || password.is_empty() || confirm_password.is_empty() {
        return Err("All fields are required.".to_string());
    }
    if password != confirm_password {
        return Err("Passwords do not match.".to_string());
    }
    if password.len() < PASSWORD_MIN_LENGTH {
        return Err(format!(
            "Password must be at least {PASSWORD_MIN_LENGTH} characters long."
        ));
    }
    Ok(())
}
