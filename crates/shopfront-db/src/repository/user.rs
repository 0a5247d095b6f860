//! # User Repository
//!
//! Accounts and login sessions. Hashing happens in the backoffice auth
//! module; this layer only stores the PHC string.
//!
//! ## Session Lifecycle
//! ```text
//! login ──► create_session(token, expires_at)
//!              │
//!              ▼
//!   request ──► find_session(token) ──► expired? ──► delete_session
//!              │
//!   logout ────┴──► delete_session(token)
//!
//!   admin  ──► delete_expired_sessions(now)   (manual sweep)
//! ```

use sqlx::SqlitePool;
use tracing::{debug, info};

use super::unix_now;
use crate::error::{DbError, DbResult};
use shopfront_core::{Role, Session, User};

const USER_COLUMNS: &str = "id, email, password_hash, name, role, created_at";
const SESSION_COLUMNS: &str = "id, user_id, expires_at, created_at";

#[derive(Debug, Clone)]
pub struct UserRepository {
    pool: SqlitePool,
}

impl UserRepository {
    pub fn new(pool: SqlitePool) -> Self {
        UserRepository { pool }
    }

    // =========================================================================
    // Users
    // =========================================================================

    /// Inserts a user. A taken email fails with `UniqueViolation { field: "email" }`.
    pub async fn create(
        &self,
        email: &str,
        password_hash: &str,
        name: &str,
        role: Role,
    ) -> DbResult<User> {
        let user = sqlx::query_as::<_, User>(&format!(
            "INSERT INTO users (email, password_hash, name, role, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5)
             RETURNING {USER_COLUMNS}"
        ))
        .bind(email)
        .bind(password_hash)
        .bind(name)
        .bind(role)
        .bind(unix_now())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match DbError::from(e) {
            err if err.is_unique_violation_on("users.email") => DbError::duplicate("email", email),
            other => other,
        })?;

        info!(user_id = user.id, role = ?user.role, "User created");
        Ok(user)
    }

    pub async fn find_by_email(&self, email: &str) -> DbResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE email = ?1"
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    pub async fn get(&self, id: i64) -> DbResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = ?1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    // =========================================================================
    // Sessions
    // =========================================================================

    pub async fn create_session(
        &self,
        token: &str,
        user_id: i64,
        expires_at: i64,
    ) -> DbResult<Session> {
        let session = sqlx::query_as::<_, Session>(&format!(
            "INSERT INTO sessions (id, user_id, expires_at, created_at)
             VALUES (?1, ?2, ?3, ?4)
             RETURNING {SESSION_COLUMNS}"
        ))
        .bind(token)
        .bind(user_id)
        .bind(expires_at)
        .bind(unix_now())
        .fetch_one(&self.pool)
        .await?;

        debug!(user_id, expires_at, "Session created");
        Ok(session)
    }

    /// Looks a session up by token without checking expiry.
    pub async fn find_session(&self, token: &str) -> DbResult<Option<Session>> {
        let session = sqlx::query_as::<_, Session>(&format!(
            "SELECT {SESSION_COLUMNS} FROM sessions WHERE id = ?1"
        ))
        .bind(token)
        .fetch_optional(&self.pool)
        .await?;

        Ok(session)
    }

    /// Returns whether a row was removed.
    pub async fn delete_session(&self, token: &str) -> DbResult<bool> {
        let result = sqlx::query("DELETE FROM sessions WHERE id = ?1")
            .bind(token)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Removes every session whose expiry is at or before `now`.
    pub async fn delete_expired_sessions(&self, now: i64) -> DbResult<u64> {
        let result = sqlx::query("DELETE FROM sessions WHERE expires_at <= ?1")
            .bind(now)
            .execute(&self.pool)
            .await?;

        info!(removed = result.rows_affected(), "Expired sessions purged");
        Ok(result.rows_affected())
    }
}
