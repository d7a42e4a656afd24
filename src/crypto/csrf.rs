use crate::error::{AppError, Result};
use base64::{Engine as _, engine::general_purpose};
use rand::RngCore;
use rand::rngs::OsRng;
use subtle::ConstantTimeEq;

/// The size of the CSRF token in bytes.
const CSRF_TOKEN_SIZE: usize = 32;

/// The name of the cookie carrying the CSRF token.
pub const CSRF_COOKIE: &str = "csrf_token";

/// The header a client echoes the CSRF token in.
pub const CSRF_HEADER: &str = "x-csrf-token";

/// Generates a new random CSRF token.
///
/// # Returns
///
/// A URL-safe base64-encoded CSRF token.
pub fn generate_csrf_token() -> Result<String> {
    let mut token = [0u8; CSRF_TOKEN_SIZE];
    OsRng
        .try_fill_bytes(&mut token)
        .map_err(|e| AppError::Internal(format!("Failed to generate CSRF token: {}", e)))?;

    Ok(general_purpose::URL_SAFE_NO_PAD.encode(token))
}

/// Compares the cookie and header copies of a token in constant time.
pub fn tokens_match(cookie: &str, header: &str) -> bool {
    !cookie.is_empty() && bool::from(cookie.as_bytes().ct_eq(header.as_bytes()))
}
