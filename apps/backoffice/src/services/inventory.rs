//! # Inventory Service
//!
//! Catalog additions and per-shop stock maintenance.
//!
//! ## Operations
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  add_product     name, sku?, category, unitPrice, minThreshold (5)     │
//! │                  └── product + grocery row + hardware row, all at 0    │
//! │                                                                         │
//! │  adjust_stock    add    → quantity + n                                 │
//! │                  remove → quantity - n, refused below zero             │
//! │                                                                         │
//! │  direct_update   overwrite quantity and threshold (both >= 0)          │
//! │                                                                         │
//! │  delete          drop one shop's row, product stays                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::{Deserialize, Serialize};
use tracing::info;

use shopfront_core::validation::{
    optional, parse_int, parse_positive_money, required, validate_non_negative,
    validate_product_name, validate_quantity, validate_sku, ValidationResult,
};
use shopfront_core::{
    AdjustmentDirection, InventoryItem, InventoryRecord, Product, ProductCategory,
    DEFAULT_MIN_THRESHOLD,
};
use shopfront_db::{Database, DbError, NewProduct};

use super::rejected;
use crate::error::{ActionResult, ApiError, ErrorCode};

// =============================================================================
// Forms
// =============================================================================

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductForm {
    pub name: Option<String>,
    pub sku: Option<String>,
    pub category: Option<String>,
    pub unit_price: Option<String>,
    pub min_threshold: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StockAdjustmentForm {
    pub inventory_id: Option<String>,
    /// `add` or `remove`
    pub adjustment_type: Option<String>,
    pub quantity: Option<String>,
    pub reason: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DirectUpdateForm {
    pub inventory_id: Option<String>,
    pub quantity: Option<String>,
    pub min_threshold: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteInventoryForm {
    pub inventory_id: Option<String>,
}

struct Adjustment {
    inventory_id: i64,
    direction: AdjustmentDirection,
    quantity: i64,
    reason: Option<String>,
}

impl ProductForm {
    fn validate(&self) -> ValidationResult<NewProduct> {
        let name = required("name", self.name.as_deref())?;
        validate_product_name(&name)?;
        let unit_price =
            parse_positive_money("unitPrice", &required("unitPrice", self.unit_price.as_deref())?)?;
        Ok(NewProduct {
            name,
            sku: None,
            category: ProductCategory::Grocery,
            unit_price,
            min_threshold: DEFAULT_MIN_THRESHOLD,
        })
    }

    /// Fields checked after name and price: SKU, category, threshold.
    fn validate_details(&self, mut product: NewProduct) -> ValidationResult<NewProduct> {
        product.sku = optional(self.sku.as_deref());
        if let Some(sku) = &product.sku {
            validate_sku(sku)?;
        }
        product.category = required("category", self.category.as_deref())?.parse()?;
        if let Some(raw) = optional(self.min_threshold.as_deref()) {
            let threshold = parse_int("minThreshold", &raw)?;
            validate_non_negative("minThreshold", threshold)?;
            product.min_threshold = threshold;
        }
        Ok(product)
    }
}

impl StockAdjustmentForm {
    fn validate(&self) -> ValidationResult<Adjustment> {
        let inventory_id = parse_int("inventoryId", &required("inventoryId", self.inventory_id.as_deref())?)?;
        let direction = required("adjustmentType", self.adjustment_type.as_deref())?.parse()?;
        let quantity = parse_int("quantity", &required("quantity", self.quantity.as_deref())?)?;
        validate_quantity(quantity)?;
        Ok(Adjustment {
            inventory_id,
            direction,
            quantity,
            reason: optional(self.reason.as_deref()),
        })
    }
}

impl DirectUpdateForm {
    fn validate(&self) -> ValidationResult<(i64, i64, i64)> {
        let id = parse_int("inventoryId", &required("inventoryId", self.inventory_id.as_deref())?)?;
        let quantity = parse_int("quantity", &required("quantity", self.quantity.as_deref())?)?;
        let min_threshold =
            parse_int("minThreshold", &required("minThreshold", self.min_threshold.as_deref())?)?;
        validate_non_negative("quantity", quantity)?;
        validate_non_negative("minThreshold", min_threshold)?;
        Ok((id, quantity, min_threshold))
    }
}

// =============================================================================
// Service
// =============================================================================

/// Every inventory row with its status, and the rows needing a restock.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryOverview {
    pub inventory: Vec<InventoryItem>,
    pub low_stock_items: Vec<InventoryItem>,
}

#[derive(Debug, Clone)]
pub struct InventoryService {
    db: Database,
}

impl InventoryService {
    pub fn new(db: Database) -> Self {
        InventoryService { db }
    }

    pub async fn overview(&self) -> Result<InventoryOverview, ApiError> {
        let inventory = self.db.inventory().overview().await?;
        let low_stock_items = self.db.inventory().low_stock().await?;
        Ok(InventoryOverview {
            inventory,
            low_stock_items,
        })
    }

    /// Adds a catalog entry stocked at zero in both shops.
    pub async fn add_product(
        &self,
        form: &ProductForm,
    ) -> Result<(Product, Vec<InventoryRecord>), ApiError> {
        let product = form
            .validate()
            .map_err(rejected("Invalid input: name and valid unit price required"))?;
        let product = form.validate_details(product)?;

        Ok(self.db.products().create_with_inventory(&product).await?)
    }

    pub async fn submit_product(&self, form: &ProductForm) -> ActionResult {
        ActionResult::from_result(self.add_product(form).await, |_| {
            "Product added successfully!".to_string()
        })
    }

    /// Applies a stock movement and returns the updated row.
    pub async fn adjust_stock(
        &self,
        form: &StockAdjustmentForm,
    ) -> Result<InventoryRecord, ApiError> {
        let adjustment = form.validate().map_err(rejected("Invalid input data"))?;

        let record = self
            .db
            .inventory()
            .adjust(adjustment.inventory_id, adjustment.direction, adjustment.quantity)
            .await
            .map_err(record_not_found)?;

        info!(
            inventory_id = record.id,
            direction = ?adjustment.direction,
            quantity = adjustment.quantity,
            reason = adjustment.reason.as_deref().unwrap_or("-"),
            new_quantity = record.quantity,
            "Stock adjusted"
        );
        Ok(record)
    }

    pub async fn submit_adjustment(&self, form: &StockAdjustmentForm) -> ActionResult {
        let direction = form
            .adjustment_type
            .as_deref()
            .and_then(|raw| raw.parse::<AdjustmentDirection>().ok());
        ActionResult::from_result(self.adjust_stock(form).await, |record| {
            let action = match direction {
                Some(AdjustmentDirection::Remove) => "removed from",
                _ => "added to",
            };
            format!("Successfully {} stock! New quantity: {}", action, record.quantity)
        })
    }

    /// Overwrites a row's quantity and threshold.
    pub async fn direct_update(&self, form: &DirectUpdateForm) -> Result<(), ApiError> {
        let (id, quantity, min_threshold) = form.validate().map_err(rejected("Invalid input data"))?;
        self.db
            .inventory()
            .set_levels(id, quantity, min_threshold)
            .await
            .map_err(record_not_found)
    }

    pub async fn submit_direct_update(&self, form: &DirectUpdateForm) -> ActionResult {
        ActionResult::from_result(self.direct_update(form).await, |_| {
            "Inventory updated successfully!".to_string()
        })
    }

    pub async fn delete(&self, form: &DeleteInventoryForm) -> Result<(), ApiError> {
        let id = required("inventoryId", form.inventory_id.as_deref())
            .and_then(|raw| parse_int("inventoryId", &raw))
            .map_err(rejected("Invalid inventory ID"))?;

        self.db.inventory().delete(id).await.map_err(record_not_found)
    }

    pub async fn submit_delete(&self, form: &DeleteInventoryForm) -> ActionResult {
        ActionResult::from_result(self.delete(form).await, |_| {
            "Inventory item deleted successfully!".to_string()
        })
    }
}

fn record_not_found(err: DbError) -> ApiError {
    match err {
        DbError::NotFound { .. } => ApiError::new(ErrorCode::NotFound, "Inventory record not found"),
        other => other.into(),
    }
}
