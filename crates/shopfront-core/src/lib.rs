//! # shopfront-core: Pure Business Logic for Shopfront
//!
//! Business rules as pure functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Shopfront Architecture                           │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                 Form layer (external)                           │   │
//! │  │   sale form, stock form, credit form, payroll form, login       │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                 backoffice services                             │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │             ★ shopfront-core (THIS CRATE) ★                     │   │
//! │  │                                                                 │   │
//! │  │   ┌─────────┐ ┌─────────┐ ┌──────────┐ ┌─────────┐ ┌────────┐  │   │
//! │  │   │  types  │ │  money  │ │  ledger  │ │inventory│ │payroll │  │   │
//! │  │   └─────────┘ └─────────┘ └──────────┘ └─────────┘ └────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               shopfront-db (Database Layer)                     │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Product, InventoryRecord, CreditClient, ...)
//! - [`money`] - Money type with integer arithmetic and form parsing
//! - [`ledger`] - Outstanding balance fold over credit transactions
//! - [`inventory`] - Stock adjustment and low-stock classification
//! - [`payroll`] - Pay run entries and per-period rules
//! - [`error`] - Domain error types
//! - [`validation`] - Form field validation
//!
//! ## Example Usage
//!
//! ```rust
//! use shopfront_core::inventory::classify;
//! use shopfront_core::{Money, StockStatus};
//!
//! let price: Money = "8.5".parse().unwrap();
//! assert_eq!(price.multiply_quantity(3).unwrap().cents(), 2550);
//!
//! assert_eq!(classify(1, 5), StockStatus::Low);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod inventory;
pub mod ledger;
pub mod money;
pub mod payroll;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::{CoreError, CoreResult, ValidationError};
pub use money::Money;
pub use payroll::PayrollEntry;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Reorder threshold used when a product form leaves it blank.
pub const DEFAULT_MIN_THRESHOLD: i64 = 5;

/// Lowest full-time monthly base salary, in whole currency units.
pub const MIN_BASE_SALARY: i64 = 200;

/// Highest full-time monthly base salary, in whole currency units.
pub const MAX_BASE_SALARY: i64 = 900;

/// Shortest password sign-up accepts, in characters.
pub const MIN_PASSWORD_LEN: usize = 6;

/// Most units a single sale or stock adjustment may move.
pub const MAX_QUANTITY: i64 = 1_000_000;

/// Session lifetime when configuration does not override it.
pub const DEFAULT_SESSION_TTL_DAYS: i64 = 7;
