use crate::error::{AppError, Result};

/// Validates a new admin password.
pub fn validate_password(password: &str) -> Result<()> {
    if password.len() < 8 {
        return Err(AppError::Validation(
            "Password must be at least 8 characters long".to_string(),
        ));
    }

    if password.len() > 128 {
        return Err(AppError::Validation(
            "Password must be at most 128 characters".to_string(),
        ));
    }

    Ok(())
}

/// Lowercases and trims an email address for lookup and storage.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_ascii_lowercase()
}
