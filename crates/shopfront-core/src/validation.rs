//! # Form Field Checks
//!
//! Forms hand over every field as `Option<String>`. Services run these
//! helpers before touching storage; the schema backs them up.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  where a bad value gets stopped                                        │
//! │                                                                         │
//! │  Layer 1: Form submission                                              │
//! │  └── Every field arrives as Option<String>                             │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: Service (backoffice)                                         │
//! │  ├── required / parse_* helpers (THIS MODULE)                          │
//! │  └── Business rule validation, before any write                        │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Database (SQLite)                                            │
//! │  ├── NOT NULL / CHECK constraints                                      │
//! │  ├── UNIQUE (products.sku, users.email)                                │
//! │  └── Foreign key constraints                                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use shopfront_core::validation::{parse_positive_money, required};
//!
//! let name = required("clientName", Some("  Acme Garage ")).unwrap();
//! assert_eq!(name, "Acme Garage");
//!
//! let amount = parse_positive_money("amount", "40").unwrap();
//! assert_eq!(amount.cents(), 4000);
//! ```

use chrono::NaiveDate;

use crate::error::ValidationError;
use crate::money::Money;
use crate::{MAX_BASE_SALARY, MAX_QUANTITY, MIN_BASE_SALARY, MIN_PASSWORD_LEN};

pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// Presence
// =============================================================================

/// Returns the trimmed value, or `Required` if it is absent or blank.
pub fn required(field: &str, value: Option<&str>) -> ValidationResult<String> {
    match value.map(str::trim) {
        Some(v) if !v.is_empty() => Ok(v.to_string()),
        _ => Err(ValidationError::Required {
            field: field.to_string(),
        }),
    }
}

/// Trims an optional field; blank becomes `None`.
pub fn optional(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

// =============================================================================
// Text Fields
// =============================================================================

/// A stock code: up to 50 letters, digits, `-` or `_`.
///
/// ```rust
/// use shopfront_core::validation::validate_sku;
///
/// assert!(validate_sku("WID-001").is_ok());
/// assert!(validate_sku("has space").is_err());
/// ```
pub fn validate_sku(sku: &str) -> ValidationResult<()> {
    let sku = sku.trim();

    if sku.is_empty() {
        return Err(ValidationError::Required {
            field: "sku".to_string(),
        });
    }

    if sku.len() > 50 {
        return Err(ValidationError::TooLong {
            field: "sku".to_string(),
            max: 50,
        });
    }

    if !sku
        .chars()
        .all(|c| c.is_alphanumeric() || c == '-' || c == '_')
    {
        return Err(ValidationError::InvalidFormat {
            field: "sku".to_string(),
            reason: "must contain only letters, numbers, hyphens, and underscores".to_string(),
        });
    }

    Ok(())
}

/// Validates a product name: non-empty, at most 200 characters.
pub fn validate_product_name(name: &str) -> ValidationResult<()> {
    let name = name.trim();

    if name.is_empty() {
        return Err(ValidationError::Required {
            field: "name".to_string(),
        });
    }

    if name.len() > 200 {
        return Err(ValidationError::TooLong {
            field: "name".to_string(),
            max: 200,
        });
    }

    Ok(())
}

/// Validates an email address of the shape `local@domain.tld`.
///
/// ```rust
/// use shopfront_core::validation::validate_email;
///
/// assert!(validate_email("owner@shop.co").is_ok());
/// assert!(validate_email("owner@localhost").is_err());
/// ```
pub fn validate_email(email: &str) -> ValidationResult<()> {
    let invalid = || ValidationError::InvalidFormat {
        field: "email".to_string(),
        reason: "must look like name@example.com".to_string(),
    };

    if email.chars().any(char::is_whitespace) {
        return Err(invalid());
    }

    let (local, domain) = email.split_once('@').ok_or_else(invalid)?;
    if local.is_empty() || domain.contains('@') {
        return Err(invalid());
    }

    // a dot with at least one character on each side
    let last = domain.len().saturating_sub(1);
    let has_inner_dot = domain
        .char_indices()
        .any(|(i, c)| c == '.' && i > 0 && i < last);
    if !has_inner_dot {
        return Err(invalid());
    }

    Ok(())
}

/// Validates a new password's length.
pub fn validate_password(password: &str) -> ValidationResult<()> {
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(ValidationError::TooShort {
            field: "password".to_string(),
            min: MIN_PASSWORD_LEN,
        });
    }
    Ok(())
}

// =============================================================================
// Numbers and Dates
// =============================================================================

/// Parses a whole number from a form field.
pub fn parse_int(field: &str, raw: &str) -> ValidationResult<i64> {
    raw.trim()
        .parse::<i64>()
        .map_err(|_| ValidationError::InvalidFormat {
            field: field.to_string(),
            reason: "must be a whole number".to_string(),
        })
}

/// Parses a decimal amount from a form field into Money.
pub fn parse_money(field: &str, raw: &str) -> ValidationResult<Money> {
    raw.parse::<Money>()
        .map_err(|e| ValidationError::InvalidFormat {
            field: field.to_string(),
            reason: e.to_string(),
        })
}

/// Parses a decimal amount that must be strictly positive.
pub fn parse_positive_money(field: &str, raw: &str) -> ValidationResult<Money> {
    let amount = parse_money(field, raw)?;
    if !amount.is_positive() {
        return Err(ValidationError::MustBePositive {
            field: field.to_string(),
        });
    }
    Ok(amount)
}

/// Parses a `YYYY-MM-DD` date.
pub fn parse_date(field: &str, raw: &str) -> ValidationResult<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").map_err(|_| ValidationError::InvalidFormat {
        field: field.to_string(),
        reason: "must be a date like 2024-01-31".to_string(),
    })
}

/// Units sold, added or removed: at least one, at most [`MAX_QUANTITY`].
pub fn validate_quantity(qty: i64) -> ValidationResult<()> {
    if qty <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }
    if qty > MAX_QUANTITY {
        return Err(ValidationError::OutOfRange {
            field: "quantity".to_string(),
            min: 1,
            max: MAX_QUANTITY,
        });
    }
    Ok(())
}

/// Rejects negative values (direct stock overwrite, thresholds).
pub fn validate_non_negative(field: &str, value: i64) -> ValidationResult<()> {
    if value < 0 {
        return Err(ValidationError::MustNotBeNegative {
            field: field.to_string(),
        });
    }
    Ok(())
}

/// Full-time monthly salary must sit within the whole-unit bounds, inclusive.
pub fn validate_base_salary(salary: Money) -> ValidationResult<()> {
    let min = Money::from_major(MIN_BASE_SALARY);
    let max = Money::from_major(MAX_BASE_SALARY);
    if salary < min || salary > max {
        return Err(ValidationError::OutOfRange {
            field: "Base salary (USD)".to_string(),
            min: MIN_BASE_SALARY,
            max: MAX_BASE_SALARY,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_required_trims() {
        assert_eq!(required("name", Some(" Widget ")).unwrap(), "Widget");
        assert!(required("name", Some("   ")).is_err());
        assert!(required("name", None).is_err());
        assert_eq!(optional(Some("  ")), None);
        assert_eq!(optional(Some(" note ")), Some("note".to_string()));
    }

    #[test]
    fn test_validate_sku() {
        assert!(validate_sku("WID-001").is_ok());
        assert!(validate_sku("brake_pad_2").is_ok());
        assert!(validate_sku("").is_err());
        assert!(validate_sku("has space").is_err());
        assert!(validate_sku(&"A".repeat(100)).is_err());
    }

    #[test]
    fn test_validate_product_name() {
        assert!(validate_product_name("Widget").is_ok());
        assert!(validate_product_name("").is_err());
        assert!(validate_product_name(&"A".repeat(300)).is_err());
    }

    #[test]
    fn test_validate_email() {
        assert!(validate_email("a@b.co").is_ok());
        assert!(validate_email("first.last@mail.shop.test").is_ok());
        assert!(validate_email("no-at-sign.com").is_err());
        assert!(validate_email("@shop.test").is_err());
        assert!(validate_email("a@b@c.com").is_err());
        assert!(validate_email("a@.com").is_err());
        assert!(validate_email("a@com.").is_err());
        assert!(validate_email("a b@shop.test").is_err());
    }

    #[test]
    fn test_validate_password_length() {
        assert!(validate_password("secret").is_ok());
        assert!(validate_password("short").is_err());
    }

    #[test]
    fn test_parse_amounts() {
        assert_eq!(parse_positive_money("unitPrice", "8.5").unwrap().cents(), 850);
        assert!(parse_positive_money("unitPrice", "0").is_err());
        assert!(parse_positive_money("unitPrice", "-1").is_err());
        assert!(matches!(
            parse_money("amount", "ten"),
            Err(ValidationError::InvalidFormat { .. })
        ));
    }

    #[test]
    fn test_parse_int_and_quantity() {
        assert_eq!(parse_int("quantity", " 3 ").unwrap(), 3);
        assert!(parse_int("quantity", "2.5").is_err());
        assert!(validate_quantity(1).is_ok());
        assert!(validate_quantity(0).is_err());
        assert!(validate_quantity(MAX_QUANTITY).is_ok());
        assert!(matches!(
            validate_quantity(MAX_QUANTITY + 1),
            Err(ValidationError::OutOfRange { .. })
        ));
        assert!(validate_quantity(i64::MAX).is_err());
        assert!(validate_non_negative("minThreshold", 0).is_ok());
        assert!(validate_non_negative("minThreshold", -1).is_err());
    }

    #[test]
    fn test_parse_date() {
        let d = parse_date("dueDate", "2024-03-31").unwrap();
        assert_eq!(d.to_string(), "2024-03-31");
        assert!(parse_date("dueDate", "31/03/2024").is_err());
    }

    #[test]
    fn test_base_salary_bounds_inclusive() {
        assert!(validate_base_salary(Money::from_major(200)).is_ok());
        assert!(validate_base_salary(Money::from_major(900)).is_ok());
        assert!(validate_base_salary(Money::from_cents(19_999)).is_err());
        assert!(validate_base_salary(Money::from_cents(90_001)).is_err());
        assert_eq!(
            validate_base_salary(Money::from_major(1000)).unwrap_err().to_string(),
            "Base salary (USD) must be between 200 and 900"
        );
    }
}
