//! # Service Errors
//!
//! Every service returns `Result<T, ApiError>`; the form layer sees an
//! `ActionResult` (success flag plus the message the page displays).
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  from form to flash message                                            │
//! │                                                                         │
//! │  form submit                                                           │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌──────────────────────────────────────────────────────────────────┐  │
//! │  │  Service method → Result<T, ApiError>                            │  │
//! │  │         │                                                        │  │
//! │  │         ▼                                                        │  │
//! │  │  Validation? ─── ValidationError ────────────┐                   │  │
//! │  │         │                                    │                   │  │
//! │  │         ▼                                    ▼                   │  │
//! │  │  Database? ───── DbError::UniqueViolation ── ApiError ──► 409   │  │
//! │  │         │        DbError::Rejected(core) ───┘                    │  │
//! │  │         ▼                                                        │  │
//! │  │  Success ──────────────────────────────────────────────────────►│  │
//! │  └──────────────────────────────────────────────────────────────────┘  │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ActionResult { success: false, message: "SKU already exists" }        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Unexpected database failures are logged in full and surfaced with a
//! generic message.

use serde::Serialize;
use shopfront_core::{CoreError, ValidationError};
use shopfront_db::DbError;

/// Error returned from every service operation.
///
/// ```json
/// {
///   "code": "CONFLICT",
///   "message": "SKU already exists"
/// }
/// ```
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiError {
    pub code: ErrorCode,
    /// Shown to the user as-is.
    pub message: String,
}

/// What went wrong, coarse enough to pick a status from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Form rejected (400)
    ValidationError,

    /// Bad credentials or no session (401)
    Unauthorized,

    /// Unknown id (404)
    NotFound,

    /// Duplicate SKU or email (409)
    Conflict,

    /// Stock removal beyond what is on hand (422)
    InsufficientStock,

    /// Storage failure; details only in the log (500)
    DatabaseError,

    /// Anything else unexpected, e.g. a hashing failure (500)
    Internal,
}

impl ErrorCode {
    /// HTTP-style status for the code.
    pub fn status(&self) -> u16 {
        match self {
            ErrorCode::ValidationError => 400,
            ErrorCode::Unauthorized => 401,
            ErrorCode::NotFound => 404,
            ErrorCode::Conflict => 409,
            ErrorCode::InsufficientStock => 422,
            ErrorCode::DatabaseError | ErrorCode::Internal => 500,
        }
    }
}

impl ApiError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        ApiError {
            code,
            message: message.into(),
        }
    }

    pub fn not_found(resource: &str, id: impl std::fmt::Display) -> Self {
        ApiError::new(ErrorCode::NotFound, format!("{} not found: {}", resource, id))
    }

    /// 400 with a form-facing message.
    pub fn validation(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::ValidationError, message)
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::Unauthorized, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::Internal, message)
    }

    pub fn status(&self) -> u16 {
        self.code.status()
    }
}

/// Constraint failures get the wording the shop pages use; infrastructure
/// failures are logged and reduced to a generic message.
impl From<DbError> for ApiError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound { entity, id } => ApiError::not_found(&entity, id),
            DbError::UniqueViolation { field, value } => {
                let message = match field.as_str() {
                    "SKU" => "SKU already exists".to_string(),
                    "email" => "Email already registered".to_string(),
                    _ => format!("{} '{}' already exists", field, value),
                };
                ApiError::new(ErrorCode::Conflict, message)
            }
            DbError::ForeignKeyViolation { message } => {
                tracing::warn!(%message, "Dangling reference");
                ApiError::validation("Invalid reference")
            }
            DbError::Rejected(core) => ApiError::from(core),
            DbError::ConnectionFailed(e) => {
                tracing::error!(error = %e, "Could not reach the database");
                ApiError::new(ErrorCode::DatabaseError, "Database connection failed")
            }
            DbError::MigrationFailed(e) => {
                tracing::error!(error = %e, "Migration failed");
                ApiError::new(ErrorCode::DatabaseError, "Database migration failed")
            }
            DbError::QueryFailed(e) => {
                tracing::error!(error = %e, "Statement failed");
                ApiError::new(ErrorCode::DatabaseError, "Database operation failed")
            }
            DbError::PoolExhausted => {
                ApiError::new(ErrorCode::DatabaseError, "Database pool exhausted")
            }
            DbError::Internal(e) => {
                tracing::error!(error = %e, "Unexpected storage error");
                ApiError::new(ErrorCode::DatabaseError, "Database operation failed")
            }
        }
    }
}

impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::InsufficientStock { .. } => ApiError::new(
                ErrorCode::InsufficientStock,
                "Cannot remove more stock than available",
            ),
            CoreError::InvalidCredentials => {
                ApiError::unauthorized(CoreError::InvalidCredentials.to_string())
            }
            CoreError::Validation(e) => ApiError::from(e),
        }
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        ApiError::validation(err.to_string())
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{:?}] {}", self.code, self.message)
    }
}

impl std::error::Error for ApiError {}

// =============================================================================
// Action Result
// =============================================================================

/// Outcome of a form submission, as rendered back to the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActionResult {
    pub success: bool,
    pub message: String,
}

impl ActionResult {
    pub fn ok(message: impl Into<String>) -> Self {
        ActionResult {
            success: true,
            message: message.into(),
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        ActionResult {
            success: false,
            message: message.into(),
        }
    }

    /// Folds a service result into an `ActionResult`, describing success with `describe`.
    pub fn from_result<T>(result: Result<T, ApiError>, describe: impl FnOnce(&T) -> String) -> Self {
        match result {
            Ok(value) => ActionResult::ok(describe(&value)),
            Err(err) => ActionResult::from(err),
        }
    }
}

impl From<ApiError> for ActionResult {
    fn from(err: ApiError) -> Self {
        ActionResult::failed(err.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duplicate_messages() {
        let sku: ApiError = DbError::duplicate("SKU", "WID-1").into();
        assert_eq!(sku.code, ErrorCode::Conflict);
        assert_eq!(sku.message, "SKU already exists");
        assert_eq!(sku.status(), 409);

        let email: ApiError = DbError::duplicate("email", "a@b.co").into();
        assert_eq!(email.message, "Email already registered");
    }

    #[test]
    fn test_rejected_stock_removal() {
        let err: ApiError = DbError::Rejected(CoreError::InsufficientStock {
            inventory_id: 1,
            available: 2,
            requested: 5,
        })
        .into();
        assert_eq!(err.code, ErrorCode::InsufficientStock);
        assert_eq!(err.message, "Cannot remove more stock than available");
        assert_eq!(err.status(), 422);
    }

    #[test]
    fn test_internal_failures_are_genericized() {
        let err: ApiError = DbError::QueryFailed("no such table: sales".into()).into();
        assert_eq!(err.message, "Database operation failed");
        assert_eq!(err.status(), 500);
    }

    #[test]
    fn test_credentials_and_serialization() {
        let err: ApiError = CoreError::InvalidCredentials.into();
        assert_eq!(err.status(), 401);

        let json = serde_json::to_value(&err).unwrap();
        assert_eq!(json["code"], "UNAUTHORIZED");
        assert_eq!(json["message"], "Invalid email or password");
    }

    #[test]
    fn test_action_result_from_result() {
        let ok = ActionResult::from_result(Ok::<_, ApiError>(7), |n| format!("got {n}"));
        assert_eq!(ok, ActionResult::ok("got 7"));

        let failed =
            ActionResult::from_result(Err::<i32, _>(ApiError::validation("bad")), |_| String::new());
        assert!(!failed.success);
        assert_eq!(failed.message, "bad");
    }
}
