//! Errors raised by the domain rules.
//!
//! Two layers live here. [`ValidationError`] rejects a form before anything
//! is written; [`CoreError`] is a business rule refusing an operation (a
//! stock removal that would go negative, a bad login). The storage crate
//! carries a `CoreError` raised mid-transaction as `DbError::Rejected`, and
//! the back office turns all of them into a status code and message.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    /// Explicit removal of more units than a row holds. Sales never raise
    /// this; they are allowed to oversell.
    #[error("Insufficient stock in record {inventory_id}: available {available}, requested {requested}")]
    InsufficientStock {
        inventory_id: i64,
        available: i64,
        requested: i64,
    },

    /// Unknown email and wrong password are deliberately indistinguishable.
    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

/// A single rejected form field. `field` uses the form's own spelling
/// (`clientName`, `minThreshold`, ...).
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("{field} is required")]
    Required { field: String },

    #[error("{field} must be at least {min} characters")]
    TooShort { field: String, min: usize },

    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    #[error("{field} must be positive")]
    MustBePositive { field: String },

    #[error("{field} cannot be negative")]
    MustNotBeNegative { field: String },

    /// Unparseable number, malformed email, fractional cents and the like.
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    #[error("{field} must be one of: {allowed:?}")]
    NotAllowed { field: String, allowed: Vec<String> },

    /// A sum or product that no longer fits in 64 bits of cents or units.
    #[error("{field} is too large")]
    TooLarge { field: String },

    /// A batch (payroll lines) with nothing in it.
    #[error("{field} cannot be empty")]
    Empty { field: String },
}

impl ValidationError {
    pub fn not_allowed(field: &str, allowed: &[&str]) -> Self {
        ValidationError::NotAllowed {
            field: field.to_string(),
            allowed: allowed.iter().map(|s| s.to_string()).collect(),
        }
    }
}

pub type CoreResult<T> = Result<T, CoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stock_and_login_messages() {
        let over_removal = CoreError::InsufficientStock {
            inventory_id: 7,
            available: 4,
            requested: 10,
        };
        assert_eq!(
            over_removal.to_string(),
            "Insufficient stock in record 7: available 4, requested 10"
        );
        assert_eq!(
            CoreError::InvalidCredentials.to_string(),
            "Invalid email or password"
        );
    }

    #[test]
    fn field_messages_use_form_names() {
        let missing = ValidationError::Required {
            field: "clientName".to_string(),
        };
        assert_eq!(missing.to_string(), "clientName is required");

        let kind = ValidationError::not_allowed("type", &["debit", "payment"]);
        assert_eq!(kind.to_string(), "type must be one of: [\"debit\", \"payment\"]");
    }

    #[test]
    fn field_errors_lift_into_rule_errors() {
        let lifted: CoreError = ValidationError::Empty {
            field: "employeeData".to_string(),
        }
        .into();
        assert!(matches!(lifted, CoreError::Validation(ValidationError::Empty { .. })));
    }

    #[test]
    fn overflow_reads_as_too_large() {
        let err = ValidationError::TooLarge {
            field: "amount".to_string(),
        };
        assert_eq!(err.to_string(), "amount is too large");
    }
}
