//! # Stock Rules
//!
//! Pure stock arithmetic and classification. The database layer reads a row,
//! calls into here, and writes the result back inside one transaction.
//!
//! ```text
//!   quantity == 0                 ──► OutOfStock
//!   quantity < min_threshold      ──► Low   (oversold rows included)
//!   otherwise                     ──► Ok
//! ```

use crate::error::{CoreError, CoreResult, ValidationError};
use crate::types::{AdjustmentDirection, StockStatus};

/// Classifies a stock level against its reorder threshold.
///
/// The comparison is strict: a quantity equal to the threshold is `Ok`.
/// Only an exact zero is out of stock; a negative quantity left behind by an
/// oversold sale is below any non-negative threshold and reads as `Low`.
///
/// ```rust
/// use shopfront_core::inventory::classify;
/// use shopfront_core::StockStatus;
///
/// assert_eq!(classify(0, 5), StockStatus::OutOfStock);
/// assert_eq!(classify(1, 5), StockStatus::Low);
/// assert_eq!(classify(5, 5), StockStatus::Ok);
/// ```
pub fn classify(quantity: i64, min_threshold: i64) -> StockStatus {
    if quantity == 0 {
        StockStatus::OutOfStock
    } else if quantity < min_threshold {
        StockStatus::Low
    } else {
        StockStatus::Ok
    }
}

/// Computes the quantity after a manual adjustment.
///
/// Removal never goes below zero: asking for more than is on hand fails and
/// the caller must leave the stored quantity untouched. An addition that
/// would overflow is refused the same way.
pub fn apply_adjustment(
    inventory_id: i64,
    current: i64,
    direction: AdjustmentDirection,
    quantity: i64,
) -> CoreResult<i64> {
    match direction {
        AdjustmentDirection::Add => current.checked_add(quantity).ok_or_else(|| {
            ValidationError::TooLarge {
                field: "quantity".to_string(),
            }
            .into()
        }),
        AdjustmentDirection::Remove => match current.checked_sub(quantity) {
            Some(next) if next >= 0 => Ok(next),
            _ => Err(CoreError::InsufficientStock {
                inventory_id,
                available: current,
                requested: quantity,
            }),
        },
    }
}
