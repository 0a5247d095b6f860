//! Aggregates for the back office landing page.

use serde::Serialize;
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::DbResult;
use shopfront_core::Money;

/// Key indicators shown after login.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    pub todays_sales: Money,
    /// Sum of every client's `total_owed`.
    pub outstanding_credit: Money,
    /// Sum of unpaid payroll `total_pay`.
    pub payroll_due: Money,
    /// Inventory rows with `quantity < min_threshold`.
    pub low_stock_items: i64,
}

#[derive(Debug, Clone)]
pub struct DashboardRepository {
    pool: SqlitePool,
}

impl DashboardRepository {
    pub fn new(pool: SqlitePool) -> Self {
        DashboardRepository { pool }
    }

    /// `day_start` is the epoch second the current business day began.
    pub async fn summary(&self, day_start: i64) -> DbResult<DashboardSummary> {
        let (sales, credit, payroll, low_stock): (i64, i64, i64, i64) = sqlx::query_as(
            "SELECT
                (SELECT COALESCE(SUM(total), 0) FROM sales WHERE sale_date >= ?1),
                (SELECT COALESCE(SUM(total_owed), 0) FROM credits),
                (SELECT COALESCE(SUM(total_pay), 0) FROM payroll WHERE is_paid = 0),
                (SELECT COUNT(*) FROM inventory WHERE quantity < min_threshold)",
        )
        .bind(day_start)
        .fetch_one(&self.pool)
        .await?;

        debug!(sales, credit, payroll, low_stock, "Dashboard summary computed");
        Ok(DashboardSummary {
            todays_sales: Money::from_cents(sales),
            outstanding_credit: Money::from_cents(credit),
            payroll_due: Money::from_cents(payroll),
            low_stock_items: low_stock,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::credit::NewCreditTransaction;
    use crate::repository::product::NewProduct;
    use crate::repository::sale::NewSale;
    use crate::repository::test_support::memory_db;
    use shopfront_core::{AdjustmentDirection, CreditTransactionKind, ProductCategory, Shop};

    #[tokio::test]
    async fn test_empty_database() {
        let db = memory_db().await;
        let summary = db.dashboard().summary(0).await.unwrap();
        assert_eq!(
            summary,
            DashboardSummary {
                todays_sales: Money::zero(),
                outstanding_credit: Money::zero(),
                payroll_due: Money::zero(),
                low_stock_items: 0,
            }
        );
    }

    #[tokio::test]
    async fn test_summary_reflects_activity() {
        let db = memory_db().await;
        let (product, rows) = db
            .products()
            .create_with_inventory(&NewProduct {
                name: "Brake pads".to_string(),
                sku: None,
                category: ProductCategory::SpareParts,
                unit_price: Money::from_cents(2000),
                min_threshold: 5,
            })
            .await
            .unwrap();
        db.inventory()
            .adjust(rows[1].id, AdjustmentDirection::Add, 10)
            .await
            .unwrap();
        db.sales()
            .record(&NewSale {
                shop: Shop::Hardware,
                product_id: product.id,
                quantity: 2,
                notes: None,
            })
            .await
            .unwrap();
        db.credits()
            .record_transaction(&NewCreditTransaction {
                client_name: "Acme Garage".to_string(),
                kind: CreditTransactionKind::Debit,
                amount: Money::from_cents(7500),
                description: None,
                due_date: None,
            })
            .await
            .unwrap();

        let summary = db.dashboard().summary(0).await.unwrap();
        assert_eq!(summary.todays_sales.cents(), 4000);
        assert_eq!(summary.outstanding_credit.cents(), 7500);
        assert_eq!(summary.payroll_due, Money::zero());
        // grocery row still at 0/5, hardware at 8/5
        assert_eq!(summary.low_stock_items, 1);
    }
}
