use argon2::{
    Algorithm, Argon2, Params, Version,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
};
use rand::RngCore;
use rand::rngs::OsRng;
use zeroize::Zeroizing;

use crate::error::{AppError, Result};

/// Memory cost in KiB (19 MiB).
const MEMORY_KIB: u32 = 19 * 1024;
const ITERATIONS: u32 = 2;
const PARALLELISM: u32 = 1;
const SALT_LEN: usize = 16;

/// A well-formed hash with the current cost parameters that matches no password.
const UNMATCHABLE_HASH: &str =
    "$argon2id$v=19$m=19456,t=2,p=1$c29tZXNhbHRzb21lc2FsdA$AAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAA";

fn hasher() -> Result<Argon2<'static>> {
    let params = Params::new(MEMORY_KIB, ITERATIONS, PARALLELISM, None)
        .map_err(|e| AppError::Internal(format!("Argon2 params: {}", e)))?;
    Ok(Argon2::new(Algorithm::Argon2id, Version::V0x13, params))
}

/// Hashes an admin password with Argon2id into a PHC string.
pub fn hash_password(password: &str) -> Result<String> {
    let password = Zeroizing::new(password.as_bytes().to_vec());

    let mut salt_bytes = [0u8; SALT_LEN];
    OsRng
        .try_fill_bytes(&mut salt_bytes)
        .map_err(|e| AppError::Internal(format!("Failed to generate salt: {}", e)))?;
    let salt = SaltString::encode_b64(&salt_bytes)
        .map_err(|e| AppError::Internal(format!("Salt encoding error: {}", e)))?;

    let hash = hasher()?
        .hash_password(&password, &salt)
        .map_err(|e| AppError::Internal(format!("Argon2 hash error: {}", e)))?;
    Ok(hash.to_string())
}

/// Checks a password against a PHC string.
///
/// Cost parameters come from the hash itself.
pub fn verify_password(password: &str, hash: &str) -> Result<bool> {
    let password = Zeroizing::new(password.as_bytes().to_vec());
    let parsed = PasswordHash::new(hash)
        .map_err(|e| AppError::Internal(format!("Hash parse error: {}", e)))?;
    Ok(Argon2::default().verify_password(&password, &parsed).is_ok())
}

/// Runs one full verification that always fails.
///
/// Used on the unknown-account path so it costs the same as a wrong password.
pub fn verify_unmatchable(password: &str) {
    let _ = verify_password(password, UNMATCHABLE_HASH);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hashes_verify_only_the_original_password() {
        let hash = hash_password("ChangeThisPassword123!").unwrap();
        assert!(hash.starts_with("$argon2id$"));
        assert!(verify_password("ChangeThisPassword123!", &hash).unwrap());
        assert!(!verify_password("changethispassword123!", &hash).unwrap());
    }

    #[test]
    fn unmatchable_hash_costs_the_same_as_a_real_one() {
        let real = hash_password("ChangeThisPassword123!").unwrap();
        let real = PasswordHash::new(&real).unwrap();
        let unmatchable = PasswordHash::new(UNMATCHABLE_HASH).unwrap();

        assert_eq!(unmatchable.algorithm, real.algorithm);
        assert_eq!(unmatchable.version, real.version);
        assert_eq!(unmatchable.params, real.params);
        assert!(!verify_password("ChangeThisPassword123!", UNMATCHABLE_HASH).unwrap());
    }

    #[test]
    fn malformed_hash_is_an_error() {
        assert!(verify_password("x", "not-a-phc-string").is_err());
    }
}
