//! Landing page figures.

use shopfront_db::{Database, DashboardSummary};

use crate::error::ApiError;

#[derive(Debug, Clone)]
pub struct DashboardService {
    db: Database,
}

impl DashboardService {
    pub fn new(db: Database) -> Self {
        DashboardService { db }
    }

    /// Today's takings, money owed to us, wages owed, rows to restock.
    pub async fn summary(&self, day_start: i64) -> Result<DashboardSummary, ApiError> {
        Ok(self.db.dashboard().summary(day_start).await?)
    }
}
