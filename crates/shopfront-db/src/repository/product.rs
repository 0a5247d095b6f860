//! # Product Repository
//!
//! Catalog reads and product creation.
//!
//! ## Creating a Product
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  create_with_inventory("Widget", spare-parts, 10.00)                   │
//! │       │                                                                 │
//! │       ▼  BEGIN                                                          │
//! │  INSERT products            ── duplicate SKU? ──► rollback, "exists"   │
//! │       │                                                                 │
//! │       ├── INSERT inventory (grocery,  qty 0, min 5)                    │
//! │       └── INSERT inventory (hardware, qty 0, min 5)                    │
//! │       │                                                                 │
//! │       ▼  COMMIT                                                         │
//! │  Both shops get a row regardless of category.                          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use sqlx::SqlitePool;
use tracing::{debug, info};

use super::unix_now;
use crate::error::{DbError, DbResult};
use shopfront_core::{InventoryRecord, Money, Product, ProductCategory, Shop};

const PRODUCT_COLUMNS: &str = "id, name, sku, category, unit_price, created_at";

/// Input for [`ProductRepository::create_with_inventory`].
#[derive(Debug, Clone)]
pub struct NewProduct {
    pub name: String,
    /// Stored as NULL when absent.
    pub sku: Option<String>,
    pub category: ProductCategory,
    pub unit_price: Money,
    /// Applied to both shop rows.
    pub min_threshold: i64,
}

/// Repository for product database operations.
#[derive(Debug, Clone)]
pub struct ProductRepository {
    pool: SqlitePool,
}

impl ProductRepository {
    /// Creates a new ProductRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ProductRepository { pool }
    }

    /// Lists the whole catalog sorted by name (sale form product picker).
    pub async fn list(&self) -> DbResult<Vec<Product>> {
        let products = sqlx::query_as::<_, Product>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products ORDER BY name, id"
        ))
        .fetch_all(&self.pool)
        .await?;

        debug!(count = products.len(), "Listed products");
        Ok(products)
    }

    /// Gets a product by its ID.
    ///
    /// ## Returns
    /// * `Ok(Some(Product))` - Product found
    /// * `Ok(None)` - Product not found
    pub async fn get_by_id(&self, id: i64) -> DbResult<Option<Product>> {
        let product = sqlx::query_as::<_, Product>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products WHERE id = ?1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(product)
    }

    /// Creates a product plus one zero-quantity inventory row per shop.
    ///
    /// All three inserts commit together. A SKU that already exists fails
    /// with `UniqueViolation { field: "SKU", .. }` and nothing is written.
    pub async fn create_with_inventory(
        &self,
        new: &NewProduct,
    ) -> DbResult<(Product, Vec<InventoryRecord>)> {
        let now = unix_now();
        let mut tx = self.pool.begin().await?;

        let product = sqlx::query_as::<_, Product>(&format!(
            "INSERT INTO products (name, sku, category, unit_price, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5)
             RETURNING {PRODUCT_COLUMNS}"
        ))
        .bind(&new.name)
        .bind(&new.sku)
        .bind(new.category)
        .bind(new.unit_price)
        .bind(now)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| match DbError::from(e) {
            err if err.is_unique_violation_on("products.sku") => {
                DbError::duplicate("SKU", new.sku.clone().unwrap_or_default())
            }
            other => other,
        })?;

        let mut records = Vec::with_capacity(Shop::ALL.len());
        for shop in Shop::ALL {
            let record = sqlx::query_as::<_, InventoryRecord>(
                "INSERT INTO inventory (product_id, shop, quantity, min_threshold, last_updated)
                 VALUES (?1, ?2, 0, ?3, ?4)
                 RETURNING id, product_id, shop, quantity, min_threshold, last_updated",
            )
            .bind(product.id)
            .bind(shop)
            .bind(new.min_threshold)
            .bind(now)
            .fetch_one(&mut *tx)
            .await?;
            records.push(record);
        }

        tx.commit().await?;

        info!(
            product_id = product.id,
            name = %product.name,
            category = product.category.as_str(),
            "Product created with inventory rows"
        );
        Ok((product, records))
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::test_support::memory_db;

    fn widget(sku: Option<&str>) -> NewProduct {
        NewProduct {
            name: "Widget".to_string(),
            sku: sku.map(str::to_string),
            category: ProductCategory::SpareParts,
            unit_price: Money::from_cents(1000),
            min_threshold: 5,
        }
    }

    #[tokio::test]
    async fn test_create_makes_two_zero_rows() {
        let db = memory_db().await;

        let (product, rows) = db.products().create_with_inventory(&widget(None)).await.unwrap();

        assert_eq!(product.sku, None);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].shop, Shop::Grocery);
        assert_eq!(rows[1].shop, Shop::Hardware);
        assert!(rows.iter().all(|r| r.quantity == 0 && r.min_threshold == 5));
        assert!(rows.iter().all(|r| r.product_id == product.id));

        let stored = db.inventory().overview().await.unwrap();
        assert_eq!(stored.iter().filter(|i| i.product_id == product.id).count(), 2);
    }

    #[tokio::test]
    async fn test_duplicate_sku_writes_nothing() {
        let db = memory_db().await;
        db.products()
            .create_with_inventory(&widget(Some("WID-1")))
            .await
            .unwrap();

        let err = db
            .products()
            .create_with_inventory(&widget(Some("WID-1")))
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::UniqueViolation { ref field, .. } if field == "SKU"));

        assert_eq!(db.products().list().await.unwrap().len(), 1);
        assert_eq!(db.inventory().overview().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_products_without_sku_do_not_collide() {
        let db = memory_db().await;
        db.products().create_with_inventory(&widget(None)).await.unwrap();
        db.products().create_with_inventory(&widget(None)).await.unwrap();

        assert_eq!(db.products().list().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_get_by_id_missing() {
        let db = memory_db().await;
        assert!(db.products().get_by_id(42).await.unwrap().is_none());
    }
}
