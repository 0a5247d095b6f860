//! Password hashing, session tokens and the session cookie.
//!
//! Stateless helpers; the sign-up/login flows live in
//! [`services::auth`](crate::services::auth).

use argon2::{
    password_hash::{
        rand_core::{OsRng, RngCore},
        SaltString,
    },
    Argon2, PasswordHash, PasswordHasher, PasswordVerifier,
};
use chrono::{DateTime, Utc};
use std::fmt::Write;

use crate::error::ApiError;

/// Cookie carrying the session token.
pub const SESSION_COOKIE: &str = "session";

/// Bytes of randomness in a session token (256 bits).
const TOKEN_BYTES: usize = 32;

/// Hashes a password into an Argon2id PHC string with a fresh salt.
pub fn hash_password(password: &str) -> Result<String, ApiError> {
    let salt = SaltString::generate(&mut OsRng);

    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| {
            tracing::error!("Failed to hash password: {}", e);
            ApiError::internal("Failed to hash password")
        })?;

    Ok(hash.to_string())
}

/// Checks `password` against a stored PHC string. A malformed hash never verifies.
pub fn verify_password(password: &str, hash: &str) -> bool {
    let parsed_hash = match PasswordHash::new(hash) {
        Ok(h) => h,
        Err(_) => return false,
    };

    Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok()
}

/// 64 lowercase hex characters from the OS RNG.
pub fn generate_session_token() -> String {
    let mut bytes = [0u8; TOKEN_BYTES];
    OsRng.fill_bytes(&mut bytes);

    bytes
        .iter()
        .fold(String::with_capacity(TOKEN_BYTES * 2), |mut out, b| {
            let _ = write!(out, "{:02x}", b);
            out
        })
}

/// `Set-Cookie` value for a fresh session.
pub fn session_cookie(token: &str, expires_at: i64, secure: bool) -> String {
    build_cookie(token, expires_at, secure)
}

/// `Set-Cookie` value that makes the browser drop the session.
pub fn clear_session_cookie(secure: bool) -> String {
    build_cookie("", 0, secure)
}

fn build_cookie(value: &str, expires_at: i64, secure: bool) -> String {
    let expires = DateTime::<Utc>::from_timestamp(expires_at, 0).unwrap_or_default();
    let mut cookie = format!(
        "{}={}; Path=/; HttpOnly; SameSite=Strict; Expires={}",
        SESSION_COOKIE,
        value,
        expires.format("%a, %d %b %Y %H:%M:%S GMT")
    );
    if secure {
        cookie.push_str("; Secure");
    }
    cookie
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify() {
        let hash = hash_password("hunter22").unwrap();
        assert!(hash.starts_with("$argon2id$"));
        assert!(verify_password("hunter22", &hash));
        assert!(!verify_password("hunter23", &hash));
        assert!(!verify_password("hunter22", "not-a-phc-string"));
    }

    #[test]
    fn test_same_password_different_salt() {
        let a = hash_password("secret1").unwrap();
        let b = hash_password("secret1").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_token_shape() {
        let token = generate_session_token();
        assert_eq!(token.len(), 64);
        assert!(token.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
        assert_ne!(token, generate_session_token());
    }

    #[test]
    fn test_session_cookie() {
        // 2024-01-08 00:00:00 UTC
        let cookie = session_cookie("abc", 1_704_672_000, false);
        assert_eq!(
            cookie,
            "session=abc; Path=/; HttpOnly; SameSite=Strict; Expires=Mon, 08 Jan 2024 00:00:00 GMT"
        );
        assert!(session_cookie("abc", 1_704_672_000, true).ends_with("; Secure"));
    }

    #[test]
    fn test_clear_cookie_is_expired() {
        assert_eq!(
            clear_session_cookie(false),
            "session=; Path=/; HttpOnly; SameSite=Strict; Expires=Thu, 01 Jan 1970 00:00:00 GMT"
        );
    }
}
