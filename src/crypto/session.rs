//! Signed, time-limited admin session credentials.
//!
//! A credential carries the admin's identifier, the issue time in epoch
//! milliseconds and a random nonce, all covered by an HMAC-SHA256 tag under
//! the server secret. Nothing is stored server side: a credential is valid
//! while its tag verifies and its age lies within `[0, max_age]`.
//!
//! Wire format:
//!
//! ```text
//! v1.<base64url(subject)>.<issued_at_ms>.<nonce_hex>.<base64url(tag)>
//! ```
//!
//! None of the encoded fields can contain `.`, so subjects with any
//! characters (UUID hyphens included) survive the round trip.

use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD};
use hmac::{Hmac, Mac};
use rand::RngCore;
use rand::rngs::OsRng;
use sha2::Sha256;
use subtle::ConstantTimeEq;
use thiserror::Error;
use zeroize::Zeroizing;

use crate::config::Environment;

type HmacSha256 = Hmac<Sha256>;

/// Credential format version.
const VERSION: &str = "v1";
/// Field separator. Absent from base64url, hex and decimal digits.
const SEPARATOR: char = '.';
/// Random bytes per credential.
const NONCE_LEN: usize = 16;
/// The signing key used outside production when no secret is configured.
const DEVELOPMENT_SECRET: &[u8] = b"medcode-site-development-only-session-secret";

/// The default credential lifetime.
pub const DEFAULT_MAX_AGE: Duration = Duration::from_secs(7 * 24 * 60 * 60);

/// The name of the cookie carrying the credential.
pub const SESSION_COOKIE: &str = "admin_session";

/// Errors raised while minting a credential.
#[derive(Debug, Error)]
pub enum SessionError {
    /// No secret is configured and the process runs in production.
    #[error("session secret is not configured")]
    Configuration,
    /// The operating system RNG failed.
    #[error("failed to generate nonce: {0}")]
    Rng(String),
}

/// A source of the current time.
pub trait Clock: Send + Sync {
    /// Milliseconds since the Unix epoch.
    fn now_millis(&self) -> i64;
}

/// The wall clock.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_millis(&self) -> i64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as i64)
            .unwrap_or(0)
    }
}

/// The parsed fields of a credential, before verification.
struct Parsed<'a> {
    subject: String,
    issued_at: i64,
    nonce: &'a str,
    tag: Vec<u8>,
}

/// Issues and verifies admin session credentials.
pub struct SessionAuthenticator {
    secret: Option<Zeroizing<Vec<u8>>>,
    environment: Environment,
    max_age: Duration,
    clock: Arc<dyn Clock>,
}

impl SessionAuthenticator {
    /// Creates an authenticator over the given secret.
    ///
    /// Outside production a missing secret is replaced by a fixed development
    /// key. In production it makes `issue` fail and `verify` reject everything.
    pub fn new(
        secret: Option<Zeroizing<Vec<u8>>>,
        environment: Environment,
        max_age: Duration,
        clock: Arc<dyn Clock>,
    ) -> Self {
        if secret.is_none() {
            if environment.is_production() {
                tracing::error!(
                    "❌ SESSION_SECRET is not set: admin login is disabled (set APP_ENV=development for local work)"
                );
            } else {
                tracing::warn!("⚠️ SESSION_SECRET is not set: using the development fallback key");
            }
        }

        Self {
            secret,
            environment,
            max_age,
            clock,
        }
    }

    /// The configured credential lifetime.
    pub fn max_age(&self) -> Duration {
        self.max_age
    }

    fn key(&self) -> Option<&[u8]> {
        match &self.secret {
            Some(secret) => Some(secret.as_slice()),
            None if self.environment.is_production() => None,
            None => Some(DEVELOPMENT_SECRET),
        }
    }

    /// Mints a credential for `subject`.
    pub fn issue(&self, subject: &str) -> Result<String, SessionError> {
        let key = self.key().ok_or(SessionError::Configuration)?;

        let mut nonce_bytes = [0u8; NONCE_LEN];
        OsRng
            .try_fill_bytes(&mut nonce_bytes)
            .map_err(|e| SessionError::Rng(e.to_string()))?;
        let nonce = hex::encode(nonce_bytes);

        let issued_at = self.clock.now_millis();
        let tag = sign(key, subject, issued_at, &nonce);

        Ok(format!(
            "{VERSION}{SEPARATOR}{}{SEPARATOR}{issued_at}{SEPARATOR}{nonce}{SEPARATOR}{}",
            URL_SAFE_NO_PAD.encode(subject.as_bytes()),
            URL_SAFE_NO_PAD.encode(tag),
        ))
    }

    /// Verifies a credential and returns its subject.
    ///
    /// Every rejection collapses into `None`.
    pub fn verify(&self, token: &str) -> Option<String> {
        let key = self.key()?;

        let Some(parsed) = parse(token) else {
            tracing::debug!("session rejected: malformed credential");
            return None;
        };

        let expected = sign(key, &parsed.subject, parsed.issued_at, parsed.nonce);
        if !bool::from(expected.as_slice().ct_eq(parsed.tag.as_slice())) {
            tracing::debug!("session rejected: signature mismatch");
            return None;
        }

        let age = self.clock.now_millis().checked_sub(parsed.issued_at)?;
        if age < 0 || age as u128 > self.max_age.as_millis() {
            tracing::debug!(age_ms = age, "session rejected: outside lifetime");
            return None;
        }

        Some(parsed.subject)
    }
}

/// Computes the tag over length-prefixed fields.
fn sign(key: &[u8], subject: &str, issued_at: i64, nonce: &str) -> Vec<u8> {
    let mut mac = HmacSha256::new_from_slice(key).expect("HMAC accepts any key size");
    mac.update(&(subject.len() as u32).to_be_bytes());
    mac.update(subject.as_bytes());
    mac.update(&issued_at.to_be_bytes());
    mac.update(&(nonce.len() as u32).to_be_bytes());
    mac.update(nonce.as_bytes());
    mac.finalize().into_bytes().to_vec()
}

fn parse(token: &str) -> Option<Parsed<'_>> {
    let mut fields = token.split(SEPARATOR);
    let version = fields.next()?;
    let subject = fields.next()?;
    let issued_at = fields.next()?;
    let nonce = fields.next()?;
    let tag = fields.next()?;
    if fields.next().is_some() || version != VERSION {
        return None;
    }

    if issued_at.is_empty() || !issued_at.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    if nonce.len() != NONCE_LEN * 2 || !nonce.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }

    let subject = String::from_utf8(URL_SAFE_NO_PAD.decode(subject).ok()?).ok()?;
    if subject.is_empty() {
        return None;
    }

    Some(Parsed {
        subject,
        issued_at: issued_at.parse().ok()?,
        nonce,
        tag: URL_SAFE_NO_PAD.decode(tag).ok()?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicI64, Ordering};
    use std::time::Instant;

    const DAY_MS: i64 = 24 * 60 * 60 * 1000;

    struct FixedClock(AtomicI64);

    impl FixedClock {
        fn at(millis: i64) -> Arc<Self> {
            Arc::new(Self(AtomicI64::new(millis)))
        }

        fn advance(&self, millis: i64) {
            self.0.fetch_add(millis, Ordering::SeqCst);
        }
    }

    impl Clock for FixedClock {
        fn now_millis(&self) -> i64 {
            self.0.load(Ordering::SeqCst)
        }
    }

    fn secret(value: &[u8]) -> Option<Zeroizing<Vec<u8>>> {
        Some(Zeroizing::new(value.to_vec()))
    }

    fn authenticator(clock: Arc<FixedClock>) -> SessionAuthenticator {
        SessionAuthenticator::new(
            secret(b"0123456789abcdef0123456789abcdef"),
            Environment::Test,
            DEFAULT_MAX_AGE,
            clock,
        )
    }

    #[test]
    fn issued_credentials_verify_to_their_subject() {
        let auth = authenticator(FixedClock::at(1_700_000_000_000));
        for subject in [
            "admin",
            "3f2b8c1e-9a4d-4e7f-b6a1-0c5d2e8f9a7b",
            "name-with.dots-and-dashes",
            "ünïcödé",
        ] {
            let token = auth.issue(subject).expect("issue");
            assert_eq!(auth.verify(&token).as_deref(), Some(subject));
        }
    }

    #[test]
    fn nonces_make_tokens_unique() {
        let auth = authenticator(FixedClock::at(1_700_000_000_000));
        let a = auth.issue("admin").unwrap();
        let b = auth.issue("admin").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn any_signature_mutation_is_rejected() {
        let auth = authenticator(FixedClock::at(1_700_000_000_000));
        let token = auth.issue("admin").unwrap();
        let tag_start = token.rfind(SEPARATOR).unwrap() + 1;

        for i in tag_start..token.len() {
            let mut bytes = token.clone().into_bytes();
            bytes[i] = if bytes[i] == b'A' { b'B' } else { b'A' };
            let forged = String::from_utf8(bytes).unwrap();
            if forged == token {
                continue;
            }
            assert_eq!(auth.verify(&forged), None, "mutation at {} accepted", i);
        }
    }

    #[test]
    fn tampered_subject_is_rejected() {
        let auth = authenticator(FixedClock::at(1_700_000_000_000));
        let token = auth.issue("admin").unwrap();
        let other = URL_SAFE_NO_PAD.encode("root");
        let mut fields: Vec<&str> = token.split(SEPARATOR).collect();
        fields[1] = &other;
        assert_eq!(auth.verify(&fields.join(".")), None);
    }

    #[test]
    fn expiry_is_relative_to_the_clock() {
        let clock = FixedClock::at(1_700_000_000_000);
        let auth = authenticator(clock.clone());
        let token = auth.issue("admin").unwrap();

        clock.advance(7 * DAY_MS);
        assert_eq!(auth.verify(&token).as_deref(), Some("admin"));

        clock.advance(1);
        assert_eq!(auth.verify(&token), None);
    }

    #[test]
    fn future_dated_credentials_are_rejected() {
        let clock = FixedClock::at(1_700_000_000_000);
        let auth = authenticator(clock.clone());
        let token = auth.issue("admin").unwrap();

        clock.advance(-1);
        assert_eq!(auth.verify(&token), None);
    }

    #[test]
    fn rotating_the_secret_invalidates_credentials() {
        let clock = FixedClock::at(1_700_000_000_000);
        let old = authenticator(clock.clone());
        let token = old.issue("admin").unwrap();

        let rotated = SessionAuthenticator::new(
            secret(b"fedcba9876543210fedcba9876543210"),
            Environment::Test,
            DEFAULT_MAX_AGE,
            clock,
        );
        assert_eq!(rotated.verify(&token), None);
    }

    #[test]
    fn malformed_input_never_panics() {
        let auth = authenticator(FixedClock::at(1_700_000_000_000));
        for garbage in [
            "",
            ".",
            "v1....",
            "v1.YWRtaW4.notanumber.00112233445566778899aabbccddeeff.AAAA",
            "v1.YWRtaW4.-5.00112233445566778899aabbccddeeff.AAAA",
            "v1.YWRtaW4.1.short.AAAA",
            "v1.!!!.1.00112233445566778899aabbccddeeff.AAAA",
            "v2.YWRtaW4.1.00112233445566778899aabbccddeeff.AAAA",
            "v1.YWRtaW4.1.00112233445566778899aabbccddeeff.AAAA.extra",
            "admin-1700000000000-abc123",
            "v1.YWRtaW4.99999999999999999999999.00112233445566778899aabbccddeeff.AAAA",
        ] {
            assert_eq!(auth.verify(garbage), None, "accepted {:?}", garbage);
        }
    }

    #[test]
    fn production_without_secret_refuses_to_issue() {
        let auth = SessionAuthenticator::new(
            None,
            Environment::Production,
            DEFAULT_MAX_AGE,
            FixedClock::at(0),
        );
        assert!(matches!(auth.issue("admin"), Err(SessionError::Configuration)));

        let dev = SessionAuthenticator::new(
            None,
            Environment::Development,
            DEFAULT_MAX_AGE,
            FixedClock::at(0),
        );
        let token = dev.issue("admin").unwrap();
        assert_eq!(dev.verify(&token).as_deref(), Some("admin"));
        assert_eq!(auth.verify(&token), None);
    }

    #[test]
    fn unrecognized_environment_gets_no_fallback_key() {
        let clock = FixedClock::at(1_700_000_000_000);
        let dev = SessionAuthenticator::new(
            None,
            Environment::Development,
            DEFAULT_MAX_AGE,
            clock.clone(),
        );
        let forged = dev.issue("3f2b8c1e-9a4d-4e7f-b6a1-0c5d2e8f9a7b").unwrap();

        for app_env in ["", "staging", "prd", "live"] {
            let auth = SessionAuthenticator::new(
                None,
                Environment::parse(app_env),
                DEFAULT_MAX_AGE,
                clock.clone(),
            );
            assert!(
                matches!(auth.issue("admin"), Err(SessionError::Configuration)),
                "APP_ENV={:?} issued without a secret",
                app_env
            );
            assert_eq!(auth.verify(&forged), None, "APP_ENV={:?} accepted the fallback key", app_env);
        }
    }

    /// Coarse timing check: a tag wrong in its first byte and one wrong in its
    /// last byte should take about the same time to reject.
    #[test]
    fn signature_comparison_timing_is_flat() {
        let auth = authenticator(FixedClock::at(1_700_000_000_000));
        let token = auth.issue("admin").unwrap();
        let tag_start = token.rfind(SEPARATOR).unwrap() + 1;

        let flip = |index: usize| {
            let mut bytes = token.clone().into_bytes();
            bytes[index] = if bytes[index] == b'A' { b'B' } else { b'A' };
            String::from_utf8(bytes).unwrap()
        };
        let first = flip(tag_start);
        let last = flip(token.len() - 2);

        let measure = |candidate: &str| {
            let start = Instant::now();
            for _ in 0..2_000 {
                assert!(auth.verify(candidate).is_none());
            }
            start.elapsed().as_nanos() as f64
        };

        let _ = measure(&first);
        let a = measure(&first);
        let b = measure(&last);
        let ratio = a.max(b) / a.min(b).max(1.0);
        assert!(ratio < 3.0, "timing ratio {ratio}");
    }
}
