//! # Payroll Repository
//!
//! Persists a pay run as one batch: every line commits or none do. An
//! unknown employee id trips the foreign key and rolls the whole run back.

use sqlx::SqlitePool;
use tracing::info;

use super::unix_now;
use crate::error::DbResult;
use shopfront_core::{Money, PayPeriod, PayrollEntry, PayrollRecord};

const PAYROLL_COLUMNS: &str = "id, employee_id, pay_period, base_pay, transport_allowance,
    meal_allowance, uniform_deduction, total_pay, pay_date, is_paid";

#[derive(Debug, Clone)]
pub struct PayrollRepository {
    pool: SqlitePool,
}

impl PayrollRepository {
    pub fn new(pool: SqlitePool) -> Self {
        PayrollRepository { pool }
    }

    /// Stores the entries as unpaid records dated now.
    pub async fn record_batch(
        &self,
        period: PayPeriod,
        entries: &[PayrollEntry],
    ) -> DbResult<Vec<PayrollRecord>> {
        let now = unix_now();
        let mut tx = self.pool.begin().await?;
        let mut records = Vec::with_capacity(entries.len());

        for entry in entries {
            let record = sqlx::query_as::<_, PayrollRecord>(&format!(
                "INSERT INTO payroll
                    (employee_id, pay_period, base_pay, transport_allowance, meal_allowance,
                     uniform_deduction, total_pay, pay_date, is_paid)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, 0)
                 RETURNING {PAYROLL_COLUMNS}"
            ))
            .bind(entry.employee_id)
            .bind(period)
            .bind(entry.base_pay)
            .bind(entry.transport_allowance)
            .bind(entry.meal_allowance)
            .bind(entry.uniform_deduction)
            .bind(entry.total_pay)
            .bind(now)
            .fetch_one(&mut *tx)
            .await?;
            records.push(record);
        }

        tx.commit().await?;

        let total: Money = records.iter().map(|r| r.total_pay).sum();
        info!(
            period = ?period,
            lines = records.len(),
            total = %total,
            "Payroll batch recorded"
        );
        Ok(records)
    }

    pub async fn list_for_employee(&self, employee_id: i64) -> DbResult<Vec<PayrollRecord>> {
        let records = sqlx::query_as::<_, PayrollRecord>(&format!(
            "SELECT {PAYROLL_COLUMNS} FROM payroll WHERE employee_id = ?1
             ORDER BY pay_date DESC, id DESC"
        ))
        .bind(employee_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(records)
    }

    /// Sum of `total_pay` over records not yet paid.
    pub async fn unpaid_total(&self) -> DbResult<Money> {
        let cents: i64 =
            sqlx::query_scalar("SELECT COALESCE(SUM(total_pay), 0) FROM payroll WHERE is_paid = 0")
                .fetch_one(&self.pool)
                .await?;

        Ok(Money::from_cents(cents))
    }
}
