//! # Domain Types
//!
//! Core domain types used throughout Shopfront.
//!
//! ## Type Map
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Product      │──►│ InventoryRecord │   │      Sale       │       │
//! │  │  ─────────────  │1:2│  ─────────────  │   │  ─────────────  │       │
//! │  │  sku (unique)   │   │  shop           │   │  shop           │       │
//! │  │  category       │   │  quantity       │   │  unit_price     │       │
//! │  │  unit_price     │   │  min_threshold  │   │  (snapshot)     │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │  CreditClient   │◄──│CreditTransaction│   │    Employee     │       │
//! │  │  ─────────────  │1:n│  ─────────────  │   │  ─────────────  │       │
//! │  │  total_owed     │   │  debit/payment  │   │  full-time or   │       │
//! │  │  (derived)      │   │  amount         │   │  runner         │       │
//! │  └─────────────────┘   └─────────────────┘   └────────┬────────┘       │
//! │                                                       │ 1:n             │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌────────▼────────┐       │
//! │  │      User       │◄──│    Session      │   │  PayrollRecord  │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Identity
//! Rows use SQLite integer ids. Sessions are the exception: their id is the
//! opaque token handed to the browser.
//!
//! ## Enum Spelling
//! Every enum is stored and submitted in kebab-case (`spare-parts`,
//! `full-time`, `out-of-stock`). `FromStr` accepts exactly those spellings.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::ValidationError;
use crate::inventory;
use crate::money::Money;

// =============================================================================
// Shops
// =============================================================================

/// A physical shop that holds stock and records sales.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "kebab-case"))]
#[serde(rename_all = "kebab-case")]
pub enum Shop {
    Grocery,
    Hardware,
}

impl Shop {
    /// Every shop, in the order inventory rows are created.
    pub const ALL: [Shop; 2] = [Shop::Grocery, Shop::Hardware];

    pub fn as_str(&self) -> &'static str {
        match self {
            Shop::Grocery => "grocery",
            Shop::Hardware => "hardware",
        }
    }
}

impl FromStr for Shop {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "grocery" => Ok(Shop::Grocery),
            "hardware" => Ok(Shop::Hardware),
            _ => Err(ValidationError::not_allowed("shop", &["grocery", "hardware"])),
        }
    }
}

/// Where an employee works. Unlike [`Shop`], staff may cover both.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "kebab-case"))]
#[serde(rename_all = "kebab-case")]
pub enum EmployeeShop {
    Grocery,
    Hardware,
    Both,
}

impl FromStr for EmployeeShop {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "grocery" => Ok(EmployeeShop::Grocery),
            "hardware" => Ok(EmployeeShop::Hardware),
            "both" => Ok(EmployeeShop::Both),
            _ => Err(ValidationError::not_allowed(
                "shop",
                &["grocery", "hardware", "both"],
            )),
        }
    }
}

// =============================================================================
// Product
// =============================================================================

/// Catalog grouping. Independent of which shops stock the product.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "kebab-case"))]
#[serde(rename_all = "kebab-case")]
pub enum ProductCategory {
    Grocery,
    SpareParts,
}

impl ProductCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProductCategory::Grocery => "grocery",
            ProductCategory::SpareParts => "spare-parts",
        }
    }
}

impl FromStr for ProductCategory {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "grocery" => Ok(ProductCategory::Grocery),
            "spare-parts" => Ok(ProductCategory::SpareParts),
            _ => Err(ValidationError::not_allowed(
                "category",
                &["grocery", "spare-parts"],
            )),
        }
    }
}

/// A catalog entry.
///
/// Price history is not kept: changing `unit_price` only affects future
/// sales, past sales carry their own snapshot.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Product {
    pub id: i64,
    pub name: String,
    /// Optional, unique when present.
    pub sku: Option<String>,
    pub category: ProductCategory,
    pub unit_price: Money,
    /// Epoch seconds.
    pub created_at: i64,
}

// =============================================================================
// Inventory
// =============================================================================

/// Stock health of one inventory record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StockStatus {
    OutOfStock,
    Low,
    Ok,
}

impl StockStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            StockStatus::OutOfStock => "out-of-stock",
            StockStatus::Low => "low",
            StockStatus::Ok => "ok",
        }
    }
}

/// Direction of a manual stock adjustment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AdjustmentDirection {
    Add,
    Remove,
}

impl FromStr for AdjustmentDirection {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "add" => Ok(AdjustmentDirection::Add),
            "remove" => Ok(AdjustmentDirection::Remove),
            _ => Err(ValidationError::not_allowed(
                "adjustmentType",
                &["add", "remove"],
            )),
        }
    }
}

/// Stock of one product in one shop.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct InventoryRecord {
    pub id: i64,
    pub product_id: i64,
    pub shop: Shop,
    /// Never negative after an explicit adjustment. Sales may push it below zero.
    pub quantity: i64,
    pub min_threshold: i64,
    pub last_updated: i64,
}

impl InventoryRecord {
    #[inline]
    pub fn status(&self) -> StockStatus {
        inventory::classify(self.quantity, self.min_threshold)
    }
}

/// Inventory row joined with its product, for the stock overview page.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct InventoryItem {
    pub id: i64,
    pub product_id: i64,
    pub product_name: String,
    pub sku: Option<String>,
    pub shop: Shop,
    pub quantity: i64,
    pub min_threshold: i64,
    pub last_updated: i64,
}

impl InventoryItem {
    #[inline]
    pub fn status(&self) -> StockStatus {
        inventory::classify(self.quantity, self.min_threshold)
    }
}

// =============================================================================
// Sales
// =============================================================================

/// A recorded sale. Append-only.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Sale {
    pub id: i64,
    pub shop: Shop,
    pub product_id: i64,
    pub quantity: i64,
    /// Product price at the moment of sale.
    pub unit_price: Money,
    /// `quantity × unit_price`.
    pub total: Money,
    pub sale_date: i64,
    pub notes: Option<String>,
}

/// Sale joined with the product name, for the day's sales list.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct SaleLine {
    pub id: i64,
    pub shop: Shop,
    pub product_id: i64,
    pub product_name: String,
    pub quantity: i64,
    pub unit_price: Money,
    pub total: Money,
    pub sale_date: i64,
    pub notes: Option<String>,
}

// =============================================================================
// Employees & Payroll
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "kebab-case"))]
#[serde(rename_all = "kebab-case")]
pub enum EmployeeType {
    /// Monthly base salary.
    FullTime,
    /// Paid per day worked.
    Runner,
}

impl FromStr for EmployeeType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "full-time" => Ok(EmployeeType::FullTime),
            "runner" => Ok(EmployeeType::Runner),
            _ => Err(ValidationError::not_allowed(
                "employeeType",
                &["full-time", "runner"],
            )),
        }
    }
}

/// A staff member.
///
/// Full-time staff carry `base_salary`, runners carry `daily_rate`; the other
/// field is `None`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Employee {
    pub id: i64,
    pub name: String,
    pub employee_type: EmployeeType,
    pub shop: EmployeeShop,
    pub base_salary: Option<Money>,
    pub daily_rate: Option<Money>,
    pub qualifications: Option<String>,
    pub start_date: i64,
    pub is_active: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "kebab-case"))]
#[serde(rename_all = "kebab-case")]
pub enum PayPeriod {
    Daily,
    Monthly,
}

/// A persisted pay run line. Append-only; `is_paid` starts false.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct PayrollRecord {
    pub id: i64,
    pub employee_id: i64,
    pub pay_period: PayPeriod,
    pub base_pay: Money,
    pub transport_allowance: Money,
    pub meal_allowance: Money,
    pub uniform_deduction: Money,
    pub total_pay: Money,
    pub pay_date: i64,
    pub is_paid: bool,
}

// =============================================================================
// Credit Ledger
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "kebab-case"))]
#[serde(rename_all = "kebab-case")]
pub enum ClientType {
    Garage,
    Other,
}

/// A business customer buying on credit.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct CreditClient {
    pub id: i64,
    /// Looked up by exact match.
    pub client_name: String,
    pub client_type: ClientType,
    /// Cached ledger balance, floored at zero. Recomputed after every entry.
    pub total_owed: Money,
    pub created_at: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "kebab-case"))]
#[serde(rename_all = "kebab-case")]
pub enum CreditTransactionKind {
    /// Goods taken on credit; increases what is owed.
    Debit,
    /// Money received; decreases what is owed.
    Payment,
}

impl FromStr for CreditTransactionKind {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "debit" => Ok(CreditTransactionKind::Debit),
            "payment" => Ok(CreditTransactionKind::Payment),
            _ => Err(ValidationError::not_allowed("type", &["debit", "payment"])),
        }
    }
}

/// One ledger entry. The ledger is append-only and is the source of truth
/// for [`CreditClient::total_owed`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct CreditTransaction {
    pub id: i64,
    pub credit_id: i64,
    pub transaction_type: CreditTransactionKind,
    pub amount: Money,
    pub description: Option<String>,
    /// Only ever set on debits.
    pub due_date: Option<NaiveDate>,
    pub transaction_date: i64,
}

// =============================================================================
// Users & Sessions
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "kebab-case"))]
#[serde(rename_all = "kebab-case")]
pub enum Role {
    Admin,
    User,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct User {
    pub id: i64,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub name: String,
    pub role: Role,
    pub created_at: i64,
}

/// A login session. `id` is the opaque token stored in the cookie.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Session {
    pub id: String,
    pub user_id: i64,
    pub expires_at: i64,
    pub created_at: i64,
}

impl Session {
    /// Expired at or after `expires_at`.
    #[inline]
    pub fn is_expired(&self, now: i64) -> bool {
        now >= self.expires_at
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_enum_spellings() {
        assert_eq!("spare-parts".parse::<ProductCategory>().unwrap(), ProductCategory::SpareParts);
        assert_eq!("full-time".parse::<EmployeeType>().unwrap(), EmployeeType::FullTime);
        assert_eq!(" both ".parse::<EmployeeShop>().unwrap(), EmployeeShop::Both);
        assert!("Grocery".parse::<Shop>().is_err());
        assert!("spare_parts".parse::<ProductCategory>().is_err());
        assert!("refund".parse::<CreditTransactionKind>().is_err());
    }

    #[test]
    fn test_serde_uses_kebab_case() {
        let json = serde_json::to_string(&StockStatus::OutOfStock).unwrap();
        assert_eq!(json, "\"out-of-stock\"");

        let parsed: EmployeeType = serde_json::from_str("\"runner\"").unwrap();
        assert_eq!(parsed, EmployeeType::Runner);
    }

    #[test]
    fn test_user_hash_not_serialized() {
        let user = User {
            id: 1,
            email: "owner@shop.test".to_string(),
            password_hash: "$argon2id$secret".to_string(),
            name: "Owner".to_string(),
            role: Role::Admin,
            created_at: 0,
        };
        let json = serde_json::to_string(&user).unwrap();
        assert!(!json.contains("argon2"));
        assert!(json.contains("\"role\":\"admin\""));
    }

    #[test]
    fn test_session_expiry_boundary() {
        let session = Session {
            id: "tok".to_string(),
            user_id: 1,
            expires_at: 1_000,
            created_at: 0,
        };
        assert!(!session.is_expired(999));
        assert!(session.is_expired(1_000));
    }
}
