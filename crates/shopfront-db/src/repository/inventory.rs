//! # Inventory Repository
//!
//! Per-shop stock rows: manual adjustments, direct overwrites, deletion and
//! the joined overview used by the stock page.
//!
//! ## Adjustment
//! ```text
//! BEGIN
//!   SELECT row            ── missing? ──► NotFound
//!   apply_adjustment()    ── remove > on hand? ──► Rejected(InsufficientStock)
//!   UPDATE quantity, last_updated
//! COMMIT
//! ```
//! The read and the write share one transaction, so a concurrent adjustment
//! cannot slip in between them.

use sqlx::SqlitePool;
use tracing::{debug, info};

use super::unix_now;
use crate::error::{DbError, DbResult};
use shopfront_core::inventory::apply_adjustment;
use shopfront_core::{AdjustmentDirection, InventoryItem, InventoryRecord};

const RECORD_COLUMNS: &str = "id, product_id, shop, quantity, min_threshold, last_updated";

const ITEM_SELECT: &str = "SELECT i.id, i.product_id, p.name AS product_name, p.sku, i.shop,
        i.quantity, i.min_threshold, i.last_updated
     FROM inventory i
     INNER JOIN products p ON p.id = i.product_id";

/// Repository for inventory rows.
#[derive(Debug, Clone)]
pub struct InventoryRepository {
    pool: SqlitePool,
}

impl InventoryRepository {
    pub fn new(pool: SqlitePool) -> Self {
        InventoryRepository { pool }
    }

    pub async fn get(&self, id: i64) -> DbResult<Option<InventoryRecord>> {
        let record = sqlx::query_as::<_, InventoryRecord>(&format!(
            "SELECT {RECORD_COLUMNS} FROM inventory WHERE id = ?1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(record)
    }

    /// Every inventory row with its product, sorted by product then shop.
    pub async fn overview(&self) -> DbResult<Vec<InventoryItem>> {
        let items = sqlx::query_as::<_, InventoryItem>(&format!(
            "{ITEM_SELECT} ORDER BY p.name, i.shop, i.id"
        ))
        .fetch_all(&self.pool)
        .await?;

        debug!(count = items.len(), "Loaded inventory overview");
        Ok(items)
    }

    /// Rows strictly below their threshold, emptiest first.
    pub async fn low_stock(&self) -> DbResult<Vec<InventoryItem>> {
        let items = sqlx::query_as::<_, InventoryItem>(&format!(
            "{ITEM_SELECT} WHERE i.quantity < i.min_threshold ORDER BY i.quantity, p.name"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(items)
    }

    /// Adds or removes stock. Removal past zero is rejected and nothing changes.
    ///
    /// ## Returns
    /// The row as stored after the update.
    pub async fn adjust(
        &self,
        id: i64,
        direction: AdjustmentDirection,
        quantity: i64,
    ) -> DbResult<InventoryRecord> {
        let mut tx = self.pool.begin().await?;

        let current = sqlx::query_as::<_, InventoryRecord>(&format!(
            "SELECT {RECORD_COLUMNS} FROM inventory WHERE id = ?1"
        ))
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| DbError::not_found("Inventory record", id))?;

        let next = apply_adjustment(id, current.quantity, direction, quantity)?;

        let updated = sqlx::query_as::<_, InventoryRecord>(&format!(
            "UPDATE inventory SET quantity = ?1, last_updated = ?2 WHERE id = ?3
             RETURNING {RECORD_COLUMNS}"
        ))
        .bind(next)
        .bind(unix_now())
        .bind(id)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        debug!(
            inventory_id = id,
            from = current.quantity,
            to = updated.quantity,
            "Stock adjusted"
        );
        Ok(updated)
    }

    /// Overwrites quantity and threshold. Callers validate both are >= 0.
    pub async fn set_levels(&self, id: i64, quantity: i64, min_threshold: i64) -> DbResult<()> {
        let result = sqlx::query(
            "UPDATE inventory SET quantity = ?1, min_threshold = ?2, last_updated = ?3
             WHERE id = ?4",
        )
        .bind(quantity)
        .bind(min_threshold)
        .bind(unix_now())
        .bind(id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Inventory record", id));
        }

        info!(inventory_id = id, quantity, min_threshold, "Inventory levels overwritten");
        Ok(())
    }

    /// Deletes one inventory row. The product itself stays in the catalog.
    pub async fn delete(&self, id: i64) -> DbResult<()> {
        let result = sqlx::query("DELETE FROM inventory WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Inventory record", id));
        }

        info!(inventory_id = id, "Inventory record deleted");
        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
