//! # Payroll Service
//!
//! Pay runs arrive as a JSON array in one form field, computed client-side:
//!
//! ```json
//! [{ "id": 3, "baseSalary": 450, "transportAllowance": 30,
//!    "mealAllowance": 20, "uniformDeduction": 10, "totalPay": 490 }]
//! ```
//!
//! Monthly runs post `employeeData`, daily runs post `runnerData` (which
//! uses `basePay` and has no deduction). Amounts are JSON numbers and are
//! rounded to cents; the arithmetic is stored as submitted.

use serde::Deserialize;
use tracing::debug;

use shopfront_core::payroll::prepare_batch;
use shopfront_core::{Money, PayPeriod, PayrollEntry, PayrollRecord, ValidationError};
use shopfront_db::Database;

use crate::error::{ActionResult, ApiError};

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PayrollForm {
    /// Monthly run lines
    pub employee_data: Option<String>,
    /// Daily run lines
    pub runner_data: Option<String>,
}

/// One line of the submitted JSON array.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PayrollLine {
    #[serde(alias = "id")]
    pub employee_id: i64,
    #[serde(default, alias = "baseSalary")]
    pub base_pay: f64,
    #[serde(default)]
    pub transport_allowance: f64,
    #[serde(default)]
    pub meal_allowance: f64,
    #[serde(default)]
    pub uniform_deduction: f64,
    #[serde(default)]
    pub total_pay: f64,
}

impl PayrollLine {
    fn into_entry(self) -> Result<PayrollEntry, ValidationError> {
        Ok(PayrollEntry {
            employee_id: self.employee_id,
            base_pay: cents("basePay", self.base_pay)?,
            transport_allowance: cents("transportAllowance", self.transport_allowance)?,
            meal_allowance: cents("mealAllowance", self.meal_allowance)?,
            uniform_deduction: cents("uniformDeduction", self.uniform_deduction)?,
            total_pay: cents("totalPay", self.total_pay)?,
        })
    }
}

fn cents(field: &str, value: f64) -> Result<Money, ValidationError> {
    Money::from_decimal(value).ok_or_else(|| ValidationError::InvalidFormat {
        field: field.to_string(),
        reason: "must be a finite number".to_string(),
    })
}

/// Parses the JSON array in `field`. Missing, blank and `[]` all come back empty.
fn parse_lines(field: &str, raw: Option<&str>) -> Result<Vec<PayrollEntry>, ValidationError> {
    let raw = match raw.map(str::trim) {
        Some(r) if !r.is_empty() => r,
        _ => return Ok(Vec::new()),
    };

    let lines: Vec<PayrollLine> =
        serde_json::from_str(raw).map_err(|e| ValidationError::InvalidFormat {
            field: field.to_string(),
            reason: e.to_string(),
        })?;

    lines.into_iter().map(PayrollLine::into_entry).collect()
}

#[derive(Debug, Clone)]
pub struct PayrollService {
    db: Database,
}

impl PayrollService {
    pub fn new(db: Database) -> Self {
        PayrollService { db }
    }

    /// Stores a pay run. Unknown employee ids fail the whole batch.
    pub async fn record_payroll(
        &self,
        period: PayPeriod,
        entries: Vec<PayrollEntry>,
    ) -> Result<Vec<PayrollRecord>, ApiError> {
        let field = field_for(period);
        let batch = prepare_batch(field, period, entries).map_err(|e| {
            debug!(reason = %e, "Empty pay run");
            ApiError::validation(empty_message(period))
        })?;

        Ok(self.db.payroll().record_batch(period, &batch).await?)
    }

    /// Monthly run from the `employeeData` field.
    pub async fn record_monthly(&self, form: &PayrollForm) -> Result<Vec<PayrollRecord>, ApiError> {
        let entries = parse_lines("employeeData", form.employee_data.as_deref())?;
        self.record_payroll(PayPeriod::Monthly, entries).await
    }

    /// Daily run from the `runnerData` field.
    pub async fn record_daily(&self, form: &PayrollForm) -> Result<Vec<PayrollRecord>, ApiError> {
        let entries = parse_lines("runnerData", form.runner_data.as_deref())?;
        self.record_payroll(PayPeriod::Daily, entries).await
    }

    pub async fn submit_monthly(&self, form: &PayrollForm) -> ActionResult {
        ActionResult::from_result(self.record_monthly(form).await, |_| {
            "Monthly payroll calculated and saved!".to_string()
        })
    }

    pub async fn submit_daily(&self, form: &PayrollForm) -> ActionResult {
        ActionResult::from_result(self.record_daily(form).await, |_| {
            "Daily payroll calculated and saved!".to_string()
        })
    }

    pub async fn history(&self, employee_id: i64) -> Result<Vec<PayrollRecord>, ApiError> {
        Ok(self.db.payroll().list_for_employee(employee_id).await?)
    }
}

fn field_for(period: PayPeriod) -> &'static str {
    match period {
        PayPeriod::Monthly => "employeeData",
        PayPeriod::Daily => "runnerData",
    }
}

fn empty_message(period: PayPeriod) -> &'static str {
    match period {
        PayPeriod::Monthly => "No employees selected",
        PayPeriod::Daily => "No runners with days worked",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_monthly_json() {
        let raw = r#"[{"id":3,"baseSalary":450,"transportAllowance":30.5,
                      "mealAllowance":20,"uniformDeduction":10,"totalPay":490.5}]"#;
        let entries = parse_lines("employeeData", Some(raw)).unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].employee_id, 3);
        assert_eq!(entries[0].base_pay.cents(), 45_000);
        assert_eq!(entries[0].transport_allowance.cents(), 3_050);
        assert_eq!(entries[0].total_pay.cents(), 49_050);
    }

    #[test]
    fn test_daily_json_defaults_deduction() {
        let raw = r#"[{"employeeId":7,"basePay":36,"transportAllowance":4,"mealAllowance":3,"totalPay":43}]"#;
        let entries = parse_lines("runnerData", Some(raw)).unwrap();
        assert_eq!(entries[0].employee_id, 7);
        assert_eq!(entries[0].uniform_deduction, Money::zero());
    }

    #[test]
    fn test_amounts_round_to_cents() {
        let raw = r#"[{"id":1,"basePay":10.005,"totalPay":0.1}]"#;
        let entries = parse_lines("runnerData", Some(raw)).unwrap();
        assert_eq!(entries[0].total_pay.cents(), 10);
    }

    #[test]
    fn test_blank_and_malformed() {
        assert!(parse_lines("employeeData", None).unwrap().is_empty());
        assert!(parse_lines("employeeData", Some("  ")).unwrap().is_empty());
        assert!(parse_lines("employeeData", Some("[]")).unwrap().is_empty());

        let err = parse_lines("employeeData", Some("{not json")).unwrap_err();
        assert!(matches!(err, ValidationError::InvalidFormat { ref field, .. } if field == "employeeData"));
    }
}
