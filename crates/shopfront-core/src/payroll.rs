//! Pay run entries.
//!
//! The breakdown (base, allowances, deduction, total) is computed by whoever
//! submits the batch; it is stored as given. The one rule enforced here is
//! that daily runs carry no uniform deduction.

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::money::Money;
use crate::types::PayPeriod;
use crate::validation::ValidationResult;

/// One employee's line in a pay run, before it is persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayrollEntry {
    pub employee_id: i64,
    pub base_pay: Money,
    pub transport_allowance: Money,
    pub meal_allowance: Money,
    pub uniform_deduction: Money,
    pub total_pay: Money,
}

impl PayrollEntry {
    /// Applies the per-period rules to a submitted line.
    pub fn for_period(mut self, period: PayPeriod) -> Self {
        if period == PayPeriod::Daily {
            self.uniform_deduction = Money::zero();
        }
        self
    }
}

/// Rejects an empty batch and normalizes every line for `period`.
pub fn prepare_batch(
    field: &str,
    period: PayPeriod,
    entries: Vec<PayrollEntry>,
) -> ValidationResult<Vec<PayrollEntry>> {
    if entries.is_empty() {
        return Err(ValidationError::Empty {
            field: field.to_string(),
        });
    }
    Ok(entries.into_iter().map(|e| e.for_period(period)).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(deduction: i64) -> PayrollEntry {
        PayrollEntry {
            employee_id: 3,
            base_pay: Money::from_cents(2500),
            transport_allowance: Money::from_cents(300),
            meal_allowance: Money::from_cents(200),
            uniform_deduction: Money::from_cents(deduction),
            total_pay: Money::from_cents(3000),
        }
    }

    #[test]
    fn test_daily_run_drops_uniform_deduction() {
        let batch = prepare_batch("runnerData", PayPeriod::Daily, vec![line(500)]).unwrap();
        assert_eq!(batch[0].uniform_deduction, Money::zero());
        // total is stored as submitted
        assert_eq!(batch[0].total_pay.cents(), 3000);
    }

    #[test]
    fn test_monthly_run_keeps_deduction() {
        let batch = prepare_batch("employeeData", PayPeriod::Monthly, vec![line(500)]).unwrap();
        assert_eq!(batch[0].uniform_deduction.cents(), 500);
    }

    #[test]
    fn test_empty_batch_rejected() {
        let err = prepare_batch("employeeData", PayPeriod::Monthly, vec![]).unwrap_err();
        assert_eq!(err.to_string(), "employeeData cannot be empty");
    }
}
