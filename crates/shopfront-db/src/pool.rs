//! # Pool and Repository Handle
//!
//! Opens the shop database, applies pending migrations and hands out
//! repositories that share one SQLite pool.
//!
//! ```text
//!   DbConfig::new("shopfront.db")       DbConfig::in_memory()
//!              │                                 │
//!              └───────────────┬─────────────────┘
//!                              ▼
//!                 Database::new(config).await
//!                  open (WAL, FKs on) ──► migrate
//!                              │
//!     products()  inventory()  sales()  employees()  payroll()
//!     credits()   users()      dashboard()
//! ```
//!
//! A repository call borrows a pooled connection for a single statement;
//! multi-write operations (a sale, a stock adjustment, a payroll batch)
//! pin one connection for their transaction.

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use sqlx::SqlitePool;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;
use tracing::{debug, info};

use crate::error::{DbError, DbResult};
use crate::migrations;
use crate::repository::credit::CreditRepository;
use crate::repository::dashboard::DashboardRepository;
use crate::repository::employee::EmployeeRepository;
use crate::repository::inventory::InventoryRepository;
use crate::repository::payroll::PayrollRepository;
use crate::repository::product::ProductRepository;
use crate::repository::sale::SaleRepository;
use crate::repository::user::UserRepository;

const MEMORY_PATH: &str = ":memory:";

/// Where the shop database lives and how many connections to keep to it.
///
/// ```rust,ignore
/// let config = DbConfig::new("/var/lib/shopfront/shop.db").max_connections(8);
/// ```
#[derive(Debug, Clone)]
pub struct DbConfig {
    /// SQLite file, created on first open. `:memory:` for a scratch database.
    pub database_path: PathBuf,
    /// Pool ceiling (5 unless set).
    pub max_connections: u32,
    /// Connections opened eagerly and kept warm.
    pub min_connections: u32,
    /// How long a caller waits for a free connection before failing.
    pub connect_timeout: Duration,
    /// Unused connections above the floor are dropped after this long.
    pub idle_timeout: Duration,
    /// Apply pending migrations inside `Database::new`.
    pub run_migrations: bool,
}

impl DbConfig {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        DbConfig {
            database_path: path.into(),
            max_connections: 5,
            min_connections: 1,
            connect_timeout: Duration::from_secs(30),
            idle_timeout: Duration::from_secs(10 * 60),
            run_migrations: true,
        }
    }

    /// Scratch database for tests and one-off tools.
    ///
    /// Pinned to one connection: each new `:memory:` connection would open a
    /// separate, empty database.
    pub fn in_memory() -> Self {
        DbConfig {
            max_connections: 1,
            connect_timeout: Duration::from_secs(5),
            ..DbConfig::new(MEMORY_PATH)
        }
    }

    pub fn max_connections(mut self, max: u32) -> Self {
        self.max_connections = max;
        self
    }

    pub fn min_connections(mut self, min: u32) -> Self {
        self.min_connections = min;
        self
    }

    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Skip migrations, e.g. when an operator wants to inspect a file first.
    pub fn run_migrations(mut self, run: bool) -> Self {
        self.run_migrations = run;
        self
    }

    pub fn is_in_memory(&self) -> bool {
        self.database_path.as_os_str() == MEMORY_PATH
    }
}

/// Handle to the shop database.
///
/// Cloning shares the pool. Services receive their own clone when they are
/// built, so nothing in the back office reaches for a global connection.
///
/// ```rust,ignore
/// let db = Database::new(DbConfig::new("./shopfront.db")).await?;
/// let balance = db.credits().record_transaction(&entry).await?;
/// ```
#[derive(Debug, Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Opens (creating if needed) the database file and migrates it.
    ///
    /// Every connection runs in WAL mode with `synchronous = NORMAL` and
    /// foreign keys enforced.
    pub async fn new(config: DbConfig) -> DbResult<Self> {
        info!(
            path = %config.database_path.display(),
            in_memory = config.is_in_memory(),
            "Opening shop database"
        );

        let url = format!("sqlite://{}?mode=rwc", config.database_path.display());
        let options = SqliteConnectOptions::from_str(&url)
            .map_err(|e| DbError::ConnectionFailed(e.to_string()))?
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal)
            .foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .acquire_timeout(config.connect_timeout)
            .idle_timeout(Some(config.idle_timeout))
            .connect_with(options)
            .await
            .map_err(|e| DbError::ConnectionFailed(e.to_string()))?;

        debug!(max_connections = config.max_connections, "Pool ready");

        let db = Database { pool };
        if config.run_migrations {
            db.run_migrations().await?;
        }

        Ok(db)
    }

    pub async fn run_migrations(&self) -> DbResult<()> {
        migrations::run_migrations(&self.pool).await
    }

    /// `(total, applied)` migration counts.
    pub async fn migration_status(&self) -> DbResult<(usize, usize)> {
        migrations::migration_status(&self.pool).await
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    pub fn products(&self) -> ProductRepository {
        ProductRepository::new(self.pool.clone())
    }

    pub fn inventory(&self) -> InventoryRepository {
        InventoryRepository::new(self.pool.clone())
    }

    pub fn sales(&self) -> SaleRepository {
        SaleRepository::new(self.pool.clone())
    }

    pub fn employees(&self) -> EmployeeRepository {
        EmployeeRepository::new(self.pool.clone())
    }

    pub fn payroll(&self) -> PayrollRepository {
        PayrollRepository::new(self.pool.clone())
    }

    pub fn credits(&self) -> CreditRepository {
        CreditRepository::new(self.pool.clone())
    }

    pub fn users(&self) -> UserRepository {
        UserRepository::new(self.pool.clone())
    }

    pub fn dashboard(&self) -> DashboardRepository {
        DashboardRepository::new(self.pool.clone())
    }

    /// Drains the pool. Repository calls made afterwards fail.
    pub async fn close(&self) {
        info!("Closing shop database");
        self.pool.close().await;
    }

    /// `true` while the pool can still run a trivial query.
    pub async fn health_check(&self) -> bool {
        sqlx::query("SELECT 1").execute(&self.pool).await.is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn scratch_database_is_fully_migrated() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();

        assert!(db.health_check().await);
        let (total, applied) = db.migration_status().await.unwrap();
        assert!(total >= 1);
        assert_eq!(total, applied);
    }

    #[test]
    fn file_config_defaults_and_overrides() {
        let config = DbConfig::new("/tmp/shop.db");
        assert_eq!(config.max_connections, 5);
        assert!(config.run_migrations);
        assert!(!config.is_in_memory());

        let config = config.max_connections(8).min_connections(2).run_migrations(false);
        assert_eq!((config.max_connections, config.min_connections), (8, 2));
        assert!(!config.run_migrations);
    }

    #[test]
    fn scratch_config_uses_a_single_connection() {
        let config = DbConfig::in_memory();
        assert!(config.is_in_memory());
        assert_eq!(config.max_connections, 1);
    }

    #[tokio::test]
    async fn closed_database_fails_health_check() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        db.close().await;
        assert!(!db.health_check().await);
    }
}
