//! # Repository Module
//!
//! Database repository implementations for Shopfront.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Repository Pattern                                   │
//! │                                                                         │
//! │  Service (backoffice)                                                  │
//! │       │                                                                 │
//! │       │  db.sales().record(&new_sale)                                  │
//! │       ▼                                                                 │
//! │  SaleRepository                                                        │
//! │  ├── BEGIN                                                             │
//! │  ├── read product price          (snapshot)                            │
//! │  ├── INSERT sale                                                       │
//! │  ├── UPDATE inventory quantity   (same shop)                           │
//! │  └── COMMIT  (or ROLLBACK when any step fails)                         │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  SQLite Database                                                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Multi-write operations own their transaction. Pure rules (ledger fold,
//! stock arithmetic) come from `shopfront_core` and run between the read and
//! the write inside that transaction.
//!
//! ## Available Repositories
//!
//! - [`ProductRepository`](product::ProductRepository) - Catalog + per-shop stock rows
//! - [`InventoryRepository`](inventory::InventoryRepository) - Adjustments, overview
//! - [`SaleRepository`](sale::SaleRepository) - Sale recording
//! - [`EmployeeRepository`](employee::EmployeeRepository) - Staff
//! - [`PayrollRepository`](payroll::PayrollRepository) - Pay runs
//! - [`CreditRepository`](credit::CreditRepository) - B2B credit ledger
//! - [`UserRepository`](user::UserRepository) - Accounts and sessions
//! - [`DashboardRepository`](dashboard::DashboardRepository) - Aggregates

pub mod credit;
pub mod dashboard;
pub mod employee;
pub mod inventory;
pub mod payroll;
pub mod product;
pub mod sale;
pub mod user;

/// Current time as epoch seconds, the unit of every timestamp column.
pub(crate) fn unix_now() -> i64 {
    chrono::Utc::now().timestamp()
}

#[cfg(test)]
pub(crate) mod test_support {
    use crate::pool::{Database, DbConfig};

    pub async fn memory_db() -> Database {
        Database::new(DbConfig::in_memory())
            .await
            .expect("in-memory database")
    }
}
