//! # Backoffice Services
//!
//! One service per back office page. Each takes the raw form DTO (every
//! field an `Option<String>`, named as submitted), validates it before any
//! write, and calls into `shopfront-db`.
//!
//! ```text
//! form DTO ──► service.validate ──► repository (one transaction) ──► Result<T, ApiError>
//!                                                                      │
//!                                          submit_* wrappers ◄─────────┘
//!                                          ActionResult { success, message }
//! ```

pub mod auth;
pub mod dashboard;
pub mod employees;
pub mod inventory;
pub mod ledger;
pub mod payroll;
pub mod sales;

pub use auth::{AuthService, LoginForm, SessionGrant, SignupForm};
pub use dashboard::DashboardService;
pub use employees::{EmployeeForm, EmployeeService, Roster};
pub use inventory::{
    DeleteInventoryForm, DirectUpdateForm, InventoryOverview, InventoryService, ProductForm,
    StockAdjustmentForm,
};
pub use ledger::{CreditTransactionForm, LedgerPage, LedgerService};
pub use payroll::{PayrollForm, PayrollLine, PayrollService};
pub use sales::{SaleForm, SalesPage, SalesService};

use shopfront_core::ValidationError;
use tracing::debug;

use crate::error::ApiError;

/// Replaces a validation failure with a fixed user-facing message, keeping
/// the detail in the debug log.
pub(crate) fn rejected(message: &'static str) -> impl FnOnce(ValidationError) -> ApiError {
    move |err| {
        debug!(reason = %err, "Form rejected");
        ApiError::validation(message)
    }
}
