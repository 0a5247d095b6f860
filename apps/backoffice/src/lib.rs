//! # Shopfront Backoffice
//!
//! Services behind the back office of a two-shop retail business: catalog
//! and per-shop stock, sales, staff and payroll, a B2B credit ledger, and
//! session login.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                          Backoffice                                     │
//! │                                                                         │
//! │   AppConfig::from_env()      Database::new(config.db_config())          │
//! │            │                           │                                │
//! │            └────────────┬──────────────┘                                │
//! │                         ▼                                               │
//! │                    Backoffice { db, config }                            │
//! │                         │                                               │
//! │    ┌──────────┬─────────┼──────────┬───────────┬───────────┐           │
//! │    ▼          ▼         ▼          ▼           ▼           ▼           │
//! │  auth()    ledger()  inventory()  sales()  employees()  payroll()      │
//! │                                                      dashboard()        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! There is no global state: every service gets a clone of the pool handle.
//!
//! ## Configuration
//! Environment variables:
//! - `SHOPFRONT_DB_PATH` - SQLite file (default: platform data dir)
//! - `SHOPFRONT_DB_MAX_CONNECTIONS` - pool size (default: 5)
//! - `SHOPFRONT_SESSION_TTL_DAYS` - session lifetime (default: 7)
//! - `SHOPFRONT_SECURE_COOKIES` - mark cookies `Secure` (default: false)
//! - `RUST_LOG` - log filter (default: `info,shopfront=debug,sqlx=warn`)

pub mod auth;
pub mod config;
pub mod error;
pub mod services;

use chrono::{Local, NaiveTime};
use tracing_subscriber::EnvFilter;

pub use config::{AppConfig, ConfigError};
pub use error::{ActionResult, ApiError, ErrorCode};

use services::{
    AuthService, DashboardService, EmployeeService, InventoryService, LedgerService,
    PayrollService, SalesService,
};
use shopfront_db::{Database, DbResult};

/// The back office: one database handle, one configuration.
#[derive(Debug, Clone)]
pub struct Backoffice {
    db: Database,
    config: AppConfig,
}

impl Backoffice {
    /// Connects (and migrates) the configured database.
    pub async fn connect(config: AppConfig) -> DbResult<Self> {
        let db = Database::new(config.db_config()).await?;
        Ok(Backoffice { db, config })
    }

    pub fn new(db: Database, config: AppConfig) -> Self {
        Backoffice { db, config }
    }

    pub fn db(&self) -> &Database {
        &self.db
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn auth(&self) -> AuthService {
        AuthService::new(self.db.clone(), self.config.clone())
    }

    pub fn ledger(&self) -> LedgerService {
        LedgerService::new(self.db.clone())
    }

    pub fn inventory(&self) -> InventoryService {
        InventoryService::new(self.db.clone())
    }

    pub fn sales(&self) -> SalesService {
        SalesService::new(self.db.clone())
    }

    pub fn employees(&self) -> EmployeeService {
        EmployeeService::new(self.db.clone())
    }

    pub fn payroll(&self) -> PayrollService {
        PayrollService::new(self.db.clone())
    }

    pub fn dashboard(&self) -> DashboardService {
        DashboardService::new(self.db.clone())
    }
}

/// Epoch second of the most recent local midnight.
pub fn start_of_today() -> i64 {
    let midnight = Local::now().date_naive().and_time(NaiveTime::MIN);
    midnight
        .and_local_timezone(Local)
        .earliest()
        .map(|t| t.timestamp())
        // no local midnight on a DST-gap day
        .unwrap_or_else(|| midnight.and_utc().timestamp())
}

/// Initializes the tracing subscriber for structured logging.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages
/// - `RUST_LOG=shopfront=trace` - Show trace for shopfront crates only
/// - Default: `info,shopfront=debug,sqlx=warn`
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,shopfront=debug,sqlx=warn"));

    tracing_subscriber::fmt().with_env_filter(filter).init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_start_of_today_is_in_the_past_day() {
        let now = chrono::Utc::now().timestamp();
        let start = start_of_today();
        assert!(start <= now);
        // DST days run up to 25 hours
        assert!(now - start <= 25 * 3600);
    }
}
