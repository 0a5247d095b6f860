//! # Sale Repository
//!
//! ## Recording a Sale
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  record(grocery, product 12, qty 3)                                    │
//! │                                                                         │
//! │  BEGIN                                                                 │
//! │   1. SELECT product            ── missing? ──► NotFound, rollback      │
//! │   2. unit_price = product.unit_price   (snapshot, later price          │
//! │      total      = 3 × unit_price        changes don't touch it)        │
//! │      total beyond i64 cents? ──► Rejected(quantity too large)         │
//! │   3. INSERT sale                                                       │
//! │   4. UPDATE inventory (product 12, grocery) quantity -= 3              │
//! │      no floor here: a sale may oversell and leave the row negative     │
//! │      no row for that shop? the sale still stands                       │
//! │  COMMIT                                                                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::Serialize;
use sqlx::SqlitePool;
use tracing::{debug, info, warn};

use super::unix_now;
use crate::error::{DbError, DbResult};
use shopfront_core::{CoreError, Money, Product, Sale, SaleLine, Shop, ValidationError};

const SALE_COLUMNS: &str =
    "id, shop, product_id, quantity, unit_price, total, sale_date, notes";

/// Input for [`SaleRepository::record`]. Quantity is validated by the caller.
#[derive(Debug, Clone)]
pub struct NewSale {
    pub shop: Shop,
    pub product_id: i64,
    pub quantity: i64,
    pub notes: Option<String>,
}

/// Outcome of a recorded sale.
#[derive(Debug, Clone, Serialize)]
pub struct RecordedSale {
    pub sale: Sale,
    /// Stock left in the decremented row, `None` if the shop had no row.
    pub remaining_stock: Option<i64>,
}

/// Repository for sale database operations.
#[derive(Debug, Clone)]
pub struct SaleRepository {
    pool: SqlitePool,
}

impl SaleRepository {
    /// Creates a new SaleRepository.
    pub fn new(pool: SqlitePool) -> Self {
        SaleRepository { pool }
    }

    pub async fn get_by_id(&self, id: i64) -> DbResult<Option<Sale>> {
        let sale = sqlx::query_as::<_, Sale>(&format!(
            "SELECT {SALE_COLUMNS} FROM sales WHERE id = ?1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(sale)
    }

    /// Records a sale and decrements the shop's stock in one transaction.
    pub async fn record(&self, new: &NewSale) -> DbResult<RecordedSale> {
        let mut tx = self.pool.begin().await?;

        let product = sqlx::query_as::<_, Product>(
            "SELECT id, name, sku, category, unit_price, created_at FROM products WHERE id = ?1",
        )
        .bind(new.product_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| DbError::not_found("Product", new.product_id))?;

        let unit_price = product.unit_price;
        let total: Money = unit_price.multiply_quantity(new.quantity).ok_or_else(|| {
            CoreError::from(ValidationError::TooLarge {
                field: "quantity".to_string(),
            })
        })?;
        let now = unix_now();

        let sale = sqlx::query_as::<_, Sale>(&format!(
            "INSERT INTO sales (shop, product_id, quantity, unit_price, total, sale_date, notes)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
             RETURNING {SALE_COLUMNS}"
        ))
        .bind(new.shop)
        .bind(product.id)
        .bind(new.quantity)
        .bind(unit_price)
        .bind(total)
        .bind(now)
        .bind(&new.notes)
        .fetch_one(&mut *tx)
        .await?;

        let remaining_stock: Option<i64> = sqlx::query_scalar(
            "UPDATE inventory SET quantity = quantity - ?1, last_updated = ?2
             WHERE id = (
                 SELECT id FROM inventory WHERE product_id = ?3 AND shop = ?4
                 ORDER BY id LIMIT 1
             )
             RETURNING quantity",
        )
        .bind(new.quantity)
        .bind(now)
        .bind(product.id)
        .bind(new.shop)
        .fetch_optional(&mut *tx)
        .await?;

        tx.commit().await?;

        match remaining_stock {
            Some(left) if left < 0 => warn!(
                sale_id = sale.id,
                product_id = product.id,
                shop = new.shop.as_str(),
                remaining = left,
                "Sale oversold available stock"
            ),
            Some(_) => {}
            None => debug!(
                product_id = product.id,
                shop = new.shop.as_str(),
                "No inventory row for sale, stock untouched"
            ),
        }

        info!(
            sale_id = sale.id,
            product = %product.name,
            quantity = sale.quantity,
            total = %sale.total,
            "Sale recorded"
        );
        Ok(RecordedSale {
            sale,
            remaining_stock,
        })
    }

    /// Sales at or after `since`, with product names, newest first.
    pub async fn list_since(&self, since: i64) -> DbResult<Vec<SaleLine>> {
        let lines = sqlx::query_as::<_, SaleLine>(
            "SELECT s.id, s.shop, s.product_id, p.name AS product_name, s.quantity,
                    s.unit_price, s.total, s.sale_date, s.notes
             FROM sales s
             INNER JOIN products p ON p.id = s.product_id
             WHERE s.sale_date >= ?1
             ORDER BY s.sale_date DESC, s.id DESC",
        )
        .bind(since)
        .fetch_all(&self.pool)
        .await?;

        Ok(lines)
    }

    /// Sum of sale totals at or after `since`.
    pub async fn total_since(&self, since: i64) -> DbResult<Money> {
        let cents: i64 =
            sqlx::query_scalar("SELECT COALESCE(SUM(total), 0) FROM sales WHERE sale_date >= ?1")
                .bind(since)
                .fetch_one(&self.pool)
                .await?;

        Ok(Money::from_cents(cents))
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::product::NewProduct;
    use crate::repository::test_support::memory_db;
    use crate::Database;
    use shopfront_core::{AdjustmentDirection, InventoryRecord, ProductCategory};

    async fn rice(db: &Database, stock: i64) -> (i64, Vec<InventoryRecord>) {
        let new = NewProduct {
            name: "Rice 1kg".to_string(),
            sku: Some("RICE-1".to_string()),
            category: ProductCategory::Grocery,
            unit_price: Money::from_cents(850),
            min_threshold: 5,
        };
        let (product, rows) = db.products().create_with_inventory(&new).await.unwrap();
        if stock > 0 {
            db.inventory()
                .adjust(rows[0].id, AdjustmentDirection::Add, stock)
                .await
                .unwrap();
        }
        (product.id, rows)
    }

    fn sale(product_id: i64, shop: Shop, quantity: i64) -> NewSale {
        NewSale {
            shop,
            product_id,
            quantity,
            notes: None,
        }
    }

    #[tokio::test]
    async fn test_sale_snapshots_price_and_decrements_shop() {
        let db = memory_db().await;
        let (product_id, rows) = rice(&db, 20).await;

        let recorded = db.sales().record(&sale(product_id, Shop::Grocery, 3)).await.unwrap();
        assert_eq!(recorded.sale.unit_price.cents(), 850);
        assert_eq!(recorded.sale.total.cents(), 2550);
        assert_eq!(recorded.remaining_stock, Some(17));

        // the other shop is untouched
        let hardware = db.inventory().get(rows[1].id).await.unwrap().unwrap();
        assert_eq!(hardware.quantity, 0);
    }

    #[tokio::test]
    async fn test_price_change_does_not_rewrite_history() {
        let db = memory_db().await;
        let (product_id, _) = rice(&db, 10).await;

        let first = db.sales().record(&sale(product_id, Shop::Grocery, 1)).await.unwrap();
        sqlx::query("UPDATE products SET unit_price = 999 WHERE id = ?1")
            .bind(product_id)
            .execute(db.pool())
            .await
            .unwrap();
        let second = db.sales().record(&sale(product_id, Shop::Grocery, 1)).await.unwrap();

        let stored = db.sales().get_by_id(first.sale.id).await.unwrap().unwrap();
        assert_eq!(stored.unit_price.cents(), 850);
        assert_eq!(second.sale.unit_price.cents(), 999);
    }

    #[tokio::test]
    async fn test_sale_may_oversell() {
        let db = memory_db().await;
        let (product_id, rows) = rice(&db, 2).await;

        let recorded = db.sales().record(&sale(product_id, Shop::Grocery, 5)).await.unwrap();
        assert_eq!(recorded.remaining_stock, Some(-3));

        let row = db.inventory().get(rows[0].id).await.unwrap().unwrap();
        assert_eq!(row.quantity, -3);
    }

    #[tokio::test]
    async fn test_sale_without_inventory_row_still_recorded() {
        let db = memory_db().await;
        let (product_id, rows) = rice(&db, 0).await;
        db.inventory().delete(rows[1].id).await.unwrap();

        let recorded = db.sales().record(&sale(product_id, Shop::Hardware, 1)).await.unwrap();
        assert_eq!(recorded.remaining_stock, None);
        assert!(db.sales().get_by_id(recorded.sale.id).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_unknown_product_writes_nothing() {
        let db = memory_db().await;
        let err = db.sales().record(&sale(404, Shop::Grocery, 1)).await.unwrap_err();
        assert!(matches!(err, DbError::NotFound { ref entity, .. } if entity == "Product"));
        assert!(db.sales().list_since(0).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_total_overflow_writes_nothing() {
        let db = memory_db().await;
        let (product_id, rows) = rice(&db, 5).await;

        let err = db
            .sales()
            .record(&sale(product_id, Shop::Grocery, i64::MAX))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            DbError::Rejected(CoreError::Validation(ValidationError::TooLarge { .. }))
        ));

        assert!(db.sales().list_since(0).await.unwrap().is_empty());
        let row = db.inventory().get(rows[0].id).await.unwrap().unwrap();
        assert_eq!(row.quantity, 5);
    }

    #[tokio::test]
    async fn test_list_and_total_since() {
        let db = memory_db().await;
        let (product_id, _) = rice(&db, 10).await;
        db.sales().record(&sale(product_id, Shop::Grocery, 1)).await.unwrap();
        db.sales().record(&sale(product_id, Shop::Grocery, 2)).await.unwrap();

        let lines = db.sales().list_since(0).await.unwrap();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].product_name, "Rice 1kg");
        // newest first
        assert!(lines[0].id > lines[1].id);

        assert_eq!(db.sales().total_since(0).await.unwrap().cents(), 2550);
        assert_eq!(db.sales().total_since(i64::MAX).await.unwrap(), Money::zero());
    }
}
