//! Sales page: record a sale, list today's sales.

use serde::{Deserialize, Serialize};

use shopfront_core::validation::{optional, parse_int, required, validate_quantity, ValidationResult};
use shopfront_core::{Money, Product, SaleLine};
use shopfront_db::{Database, DbError, NewSale, RecordedSale};

use super::rejected;
use crate::error::{ActionResult, ApiError, ErrorCode};

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaleForm {
    pub shop: Option<String>,
    pub product_id: Option<String>,
    pub quantity: Option<String>,
    pub notes: Option<String>,
}

impl SaleForm {
    fn validate(&self) -> ValidationResult<NewSale> {
        let shop = required("shop", self.shop.as_deref())?.parse()?;
        let product_id = parse_int("productId", &required("productId", self.product_id.as_deref())?)?;
        let quantity = parse_int("quantity", &required("quantity", self.quantity.as_deref())?)?;
        validate_quantity(quantity)?;

        Ok(NewSale {
            shop,
            product_id,
            quantity,
            notes: optional(self.notes.as_deref()),
        })
    }
}

/// Products for the sale form and sales since local midnight.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SalesPage {
    pub products: Vec<Product>,
    pub todays_sales: Vec<SaleLine>,
    pub todays_total: Money,
}

#[derive(Debug, Clone)]
pub struct SalesService {
    db: Database,
}

impl SalesService {
    pub fn new(db: Database) -> Self {
        SalesService { db }
    }

    /// Records the sale at the product's current price and takes the
    /// quantity out of that shop's stock.
    pub async fn record_sale(&self, form: &SaleForm) -> Result<RecordedSale, ApiError> {
        let new = form.validate().map_err(rejected("Invalid input data"))?;

        self.db.sales().record(&new).await.map_err(|e| match e {
            DbError::NotFound { .. } => ApiError::new(ErrorCode::NotFound, "Product not found"),
            other => other.into(),
        })
    }

    pub async fn submit_sale(&self, form: &SaleForm) -> ActionResult {
        ActionResult::from_result(self.record_sale(form).await, |_| {
            "Sale recorded successfully!".to_string()
        })
    }

    /// Newest first. `day_start` is the epoch second of local midnight.
    pub async fn todays_sales(&self, day_start: i64) -> Result<Vec<SaleLine>, ApiError> {
        Ok(self.db.sales().list_since(day_start).await?)
    }

    pub async fn page(&self, day_start: i64) -> Result<SalesPage, ApiError> {
        let todays_sales = self.todays_sales(day_start).await?;
        let todays_total = todays_sales.iter().map(|s| s.total).sum();
        Ok(SalesPage {
            products: self.db.products().list().await?,
            todays_sales,
            todays_total,
        })
    }
}
