//! # Auth Service
//!
//! Email + password in, opaque session token out.
//!
//! ## Flows
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  signup(email, password, confirmPassword, name)                        │
//! │    validate ──► hash ──► insert user (role: user) ──► session          │
//! │    (a taken email fails on the unique index)                           │
//! │                                                                         │
//! │  login(email, password)                                                │
//! │    find user ──► verify hash ──► session                               │
//! │    (unknown email and bad password look the same to the caller)        │
//! │                                                                         │
//! │  current_user(token)                                                   │
//! │    session? ──► expired? ──► delete, None                              │
//! │                    └── no ──► Some(user)                               │
//! │                                                                         │
//! │  logout(token) ──► delete session ──► expired cookie                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use shopfront_core::validation::{required, validate_email, validate_password};
use shopfront_core::{CoreError, Role, User};
use shopfront_db::Database;

use crate::auth::{
    clear_session_cookie, generate_session_token, hash_password, session_cookie, verify_password,
};
use crate::config::AppConfig;
use crate::error::ApiError;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignupForm {
    pub email: Option<String>,
    pub password: Option<String>,
    pub confirm_password: Option<String>,
    pub name: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginForm {
    pub email: Option<String>,
    pub password: Option<String>,
}

/// A freshly issued session.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionGrant {
    pub user: User,
    pub token: String,
    pub expires_at: i64,
    /// `Set-Cookie` value carrying the token.
    pub cookie: String,
}

struct Signup {
    email: String,
    password: String,
    name: String,
}

impl SignupForm {
    fn validate(&self) -> Result<Signup, ApiError> {
        let all_required = || ApiError::validation("All fields are required");
        let email = required("email", self.email.as_deref()).map_err(|_| all_required())?;
        let name = required("name", self.name.as_deref()).map_err(|_| all_required())?;
        let password = non_empty(&self.password).ok_or_else(all_required)?;
        let confirm = non_empty(&self.confirm_password).ok_or_else(all_required)?;

        validate_email(&email).map_err(|_| ApiError::validation("Invalid email format"))?;
        validate_password(password)
            .map_err(|_| ApiError::validation("Password must be at least 6 characters"))?;
        if password != confirm {
            return Err(ApiError::validation("Passwords do not match"));
        }

        Ok(Signup {
            email,
            password: password.to_string(),
            name,
        })
    }
}

/// Passwords are taken as typed, surrounding spaces included.
fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

#[derive(Debug, Clone)]
pub struct AuthService {
    db: Database,
    config: AppConfig,
}

impl AuthService {
    pub fn new(db: Database, config: AppConfig) -> Self {
        AuthService { db, config }
    }

    /// Creates a `user` account and signs it in. A taken email reads
    /// "Email already registered".
    pub async fn signup(&self, form: &SignupForm) -> Result<SessionGrant, ApiError> {
        let signup = form.validate()?;
        let user = self
            .create_user(&signup.email, &signup.password, &signup.name, Role::User)
            .await?;
        self.issue_session(user).await
    }

    pub async fn login(&self, form: &LoginForm) -> Result<SessionGrant, ApiError> {
        let email = required("email", form.email.as_deref());
        let password = non_empty(&form.password);
        let (Ok(email), Some(password)) = (email, password) else {
            return Err(ApiError::validation("Email and password are required"));
        };

        let user = match self.db.users().find_by_email(&email).await? {
            Some(user) if verify_password(password, &user.password_hash) => user,
            _ => {
                warn!("Rejected login attempt");
                return Err(CoreError::InvalidCredentials.into());
            }
        };

        self.issue_session(user).await
    }

    /// Resolves a session token. Expired sessions are deleted on sight.
    pub async fn current_user(&self, token: &str) -> Result<Option<User>, ApiError> {
        let users = self.db.users();
        let Some(session) = users.find_session(token).await? else {
            return Ok(None);
        };

        if session.is_expired(Utc::now().timestamp()) {
            users.delete_session(token).await?;
            return Ok(None);
        }

        Ok(users.get(session.user_id).await?)
    }

    /// Ends the session and returns the cookie that clears it.
    pub async fn logout(&self, token: &str) -> Result<String, ApiError> {
        self.db.users().delete_session(token).await?;
        Ok(clear_session_cookie(self.config.secure_cookies))
    }

    /// Creates an account with any role. Used by sign-up and the admin binary.
    pub async fn create_user(
        &self,
        email: &str,
        password: &str,
        name: &str,
        role: Role,
    ) -> Result<User, ApiError> {
        let hash = hash_password(password)?;
        let user = self.db.users().create(email, &hash, name, role).await?;
        info!(user_id = user.id, "Account created");
        Ok(user)
    }

    /// Manual sweep of expired sessions; returns how many were removed.
    pub async fn purge_expired_sessions(&self) -> Result<u64, ApiError> {
        Ok(self
            .db
            .users()
            .delete_expired_sessions(Utc::now().timestamp())
            .await?)
    }

    async fn issue_session(&self, user: User) -> Result<SessionGrant, ApiError> {
        let token = generate_session_token();
        let expires_at = Utc::now().timestamp() + self.config.session_ttl_secs();

        self.db
            .users()
            .create_session(&token, user.id, expires_at)
            .await?;

        info!(user_id = user.id, "Session issued");
        Ok(SessionGrant {
            cookie: session_cookie(&token, expires_at, self.config.secure_cookies),
            user,
            token,
            expires_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn signup(email: &str, password: &str, confirm: &str) -> SignupForm {
        SignupForm {
            email: Some(email.into()),
            password: Some(password.into()),
            confirm_password: Some(confirm.into()),
            name: Some("Nyasha".into()),
        }
    }

    fn message(form: SignupForm) -> String {
        form.validate().err().map(|e| e.message).unwrap_or_default()
    }

    #[test]
    fn test_signup_messages() {
        assert_eq!(message(signup("", "secret1", "secret1")), "All fields are required");
        assert_eq!(message(signup("a@b.co", "secret1", "")), "All fields are required");
        assert_eq!(message(signup("nope", "secret1", "secret1")), "Invalid email format");
        assert_eq!(
            message(signup("a@b.co", "abc", "abc")),
            "Password must be at least 6 characters"
        );
        assert_eq!(message(signup("a@b.co", "secret1", "secret2")), "Passwords do not match");
        assert!(signup("a@b.co", "secret1", "secret1").validate().is_ok());
    }
}
