//! # Credit Repository
//!
//! The B2B credit ledger.
//!
//! ## Recording a Transaction
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  record_transaction("Acme Garage", payment, 40.00)                     │
//! │                                                                         │
//! │  BEGIN                                                                 │
//! │   1. SELECT client by exact name                                       │
//! │      └── none? INSERT client (garage, total_owed 0)                    │
//! │   2. INSERT credit_transactions row                                    │
//! │      (due_date kept for debits, dropped for payments)                  │
//! │   3. SELECT every transaction of the client                            │
//! │   4. total_owed = ledger::outstanding_balance(history)                 │
//! │      └── beyond i64 cents? Rejected(amount too large), rolled back     │
//! │   5. UPDATE client SET total_owed                                      │
//! │  COMMIT                                                                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! `total_owed` is recomputed from the whole history on every write, never
//! patched by the latest amount.

use chrono::NaiveDate;
use serde::Serialize;
use sqlx::SqlitePool;
use tracing::{debug, info};

use super::unix_now;
use crate::error::DbResult;
use shopfront_core::ledger::outstanding_balance;
use shopfront_core::{
    ClientType, CoreError, CreditClient, CreditTransaction, CreditTransactionKind, Money,
    ValidationError,
};

const CLIENT_COLUMNS: &str = "id, client_name, client_type, total_owed, created_at";
const TRANSACTION_COLUMNS: &str =
    "id, credit_id, transaction_type, amount, description, due_date, transaction_date";

/// Input for [`CreditRepository::record_transaction`].
#[derive(Debug, Clone)]
pub struct NewCreditTransaction {
    pub client_name: String,
    pub kind: CreditTransactionKind,
    /// Strictly positive; the kind carries the sign.
    pub amount: Money,
    pub description: Option<String>,
    pub due_date: Option<NaiveDate>,
}

/// A client's ledger page.
#[derive(Debug, Clone, Serialize)]
pub struct ClientStatement {
    pub client: CreditClient,
    pub transactions: Vec<CreditTransaction>,
}

#[derive(Debug, Clone)]
pub struct CreditRepository {
    pool: SqlitePool,
}

impl CreditRepository {
    pub fn new(pool: SqlitePool) -> Self {
        CreditRepository { pool }
    }

    /// Appends a ledger entry and returns the client with its new balance.
    ///
    /// Unknown client names are provisioned on the fly; this never fails with
    /// "client not found".
    pub async fn record_transaction(&self, new: &NewCreditTransaction) -> DbResult<CreditClient> {
        let now = unix_now();
        let mut tx = self.pool.begin().await?;

        let existing = sqlx::query_as::<_, CreditClient>(&format!(
            "SELECT {CLIENT_COLUMNS} FROM credits WHERE client_name = ?1 ORDER BY id LIMIT 1"
        ))
        .bind(&new.client_name)
        .fetch_optional(&mut *tx)
        .await?;

        let client = match existing {
            Some(client) => client,
            None => {
                let created = sqlx::query_as::<_, CreditClient>(&format!(
                    "INSERT INTO credits (client_name, client_type, total_owed, created_at)
                     VALUES (?1, ?2, 0, ?3)
                     RETURNING {CLIENT_COLUMNS}"
                ))
                .bind(&new.client_name)
                .bind(ClientType::Garage)
                .bind(now)
                .fetch_one(&mut *tx)
                .await?;
                debug!(client_id = created.id, name = %created.client_name, "Credit client provisioned");
                created
            }
        };

        let due_date = match new.kind {
            CreditTransactionKind::Debit => new.due_date,
            CreditTransactionKind::Payment => None,
        };

        sqlx::query(
            "INSERT INTO credit_transactions
                (credit_id, transaction_type, amount, description, due_date, transaction_date)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        )
        .bind(client.id)
        .bind(new.kind)
        .bind(new.amount)
        .bind(&new.description)
        .bind(due_date)
        .bind(now)
        .execute(&mut *tx)
        .await?;

        let history = sqlx::query_as::<_, CreditTransaction>(&format!(
            "SELECT {TRANSACTION_COLUMNS} FROM credit_transactions WHERE credit_id = ?1"
        ))
        .bind(client.id)
        .fetch_all(&mut *tx)
        .await?;

        let total_owed = outstanding_balance(&history).ok_or_else(|| {
            CoreError::from(ValidationError::TooLarge {
                field: "amount".to_string(),
            })
        })?;

        sqlx::query("UPDATE credits SET total_owed = ?1 WHERE id = ?2")
            .bind(total_owed)
            .bind(client.id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        info!(
            client_id = client.id,
            kind = ?new.kind,
            amount = %new.amount,
            total_owed = %total_owed,
            "Credit transaction recorded"
        );
        Ok(CreditClient {
            total_owed,
            ..client
        })
    }

    /// All clients, alphabetically.
    pub async fn list_clients(&self) -> DbResult<Vec<CreditClient>> {
        let clients = sqlx::query_as::<_, CreditClient>(&format!(
            "SELECT {CLIENT_COLUMNS} FROM credits ORDER BY client_name, id"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(clients)
    }

    /// Every ledger entry across clients, newest first.
    pub async fn list_transactions(&self) -> DbResult<Vec<CreditTransaction>> {
        let transactions = sqlx::query_as::<_, CreditTransaction>(&format!(
            "SELECT {TRANSACTION_COLUMNS} FROM credit_transactions
             ORDER BY transaction_date DESC, id DESC"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(transactions)
    }

    /// The client and its entries in the order they were recorded.
    pub async fn statement(&self, client_id: i64) -> DbResult<Option<ClientStatement>> {
        let client = sqlx::query_as::<_, CreditClient>(&format!(
            "SELECT {CLIENT_COLUMNS} FROM credits WHERE id = ?1"
        ))
        .bind(client_id)
        .fetch_optional(&self.pool)
        .await?;

        let Some(client) = client else {
            return Ok(None);
        };

        let transactions = sqlx::query_as::<_, CreditTransaction>(&format!(
            "SELECT {TRANSACTION_COLUMNS} FROM credit_transactions
             WHERE credit_id = ?1 ORDER BY transaction_date, id"
        ))
        .bind(client_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(Some(ClientStatement {
            client,
            transactions,
        }))
    }

    /// Sum of every client's cached `total_owed`.
    pub async fn outstanding_total(&self) -> DbResult<Money> {
        let cents: i64 = sqlx::query_scalar("SELECT COALESCE(SUM(total_owed), 0) FROM credits")
            .fetch_one(&self.pool)
            .await?;

        Ok(Money::from_cents(cents))
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DbError;
    use crate::repository::test_support::memory_db;
    use shopfront_core::ledger::net_balance;

    fn entry(name: &str, kind: CreditTransactionKind, cents: i64) -> NewCreditTransaction {
        NewCreditTransaction {
            client_name: name.to_string(),
            kind,
            amount: Money::from_cents(cents),
            description: None,
            due_date: None,
        }
    }

    #[tokio::test]
    async fn test_acme_garage_balance() {
        use CreditTransactionKind::*;
        let db = memory_db().await;
        let credits = db.credits();

        let c = credits.record_transaction(&entry("Acme Garage", Debit, 10000)).await.unwrap();
        assert_eq!(c.total_owed.cents(), 10000);
        assert_eq!(c.client_type, ClientType::Garage);

        let c = credits.record_transaction(&entry("Acme Garage", Payment, 4000)).await.unwrap();
        assert_eq!(c.total_owed.cents(), 6000);

        let c = credits.record_transaction(&entry("Acme Garage", Payment, 10000)).await.unwrap();
        assert_eq!(c.total_owed, Money::zero());

        // one client, three entries
        assert_eq!(credits.list_clients().await.unwrap().len(), 1);
        let statement = credits.statement(c.id).await.unwrap().unwrap();
        assert_eq!(statement.transactions.len(), 3);
        assert_eq!(statement.client.total_owed, Money::zero());
        assert_eq!(net_balance(&statement.transactions).unwrap().cents(), -4000);
    }

    #[tokio::test]
    async fn test_cached_balance_matches_fold_after_every_write() {
        use CreditTransactionKind::*;
        let db = memory_db().await;
        let credits = db.credits();

        let script = [
            ("Acme Garage", Debit, 2500),
            ("Bolt Motors", Payment, 700),
            ("Acme Garage", Payment, 3000),
            ("Bolt Motors", Debit, 1200),
            ("Acme Garage", Debit, 1000),
            ("Bolt Motors", Debit, 50),
        ];

        for (name, kind, cents) in script {
            let client = credits.record_transaction(&entry(name, kind, cents)).await.unwrap();
            let statement = credits.statement(client.id).await.unwrap().unwrap();
            let expected = outstanding_balance(&statement.transactions).unwrap();
            assert_eq!(client.total_owed, expected);
            assert_eq!(statement.client.total_owed, expected);
        }

        let clients = credits.list_clients().await.unwrap();
        let owed: Vec<(&str, i64)> = clients
            .iter()
            .map(|c| (c.client_name.as_str(), c.total_owed.cents()))
            .collect();
        assert_eq!(owed, vec![("Acme Garage", 500), ("Bolt Motors", 550)]);
        assert_eq!(credits.outstanding_total().await.unwrap().cents(), 1050);
    }

    #[tokio::test]
    async fn test_due_date_only_kept_on_debits() {
        use CreditTransactionKind::*;
        let db = memory_db().await;
        let due = NaiveDate::from_ymd_opt(2024, 3, 31);

        let mut debit = entry("Acme Garage", Debit, 1000);
        debit.due_date = due;
        let mut payment = entry("Acme Garage", Payment, 500);
        payment.due_date = due;

        let c = db.credits().record_transaction(&debit).await.unwrap();
        db.credits().record_transaction(&payment).await.unwrap();

        let statement = db.credits().statement(c.id).await.unwrap().unwrap();
        assert_eq!(statement.transactions[0].due_date, due);
        assert_eq!(statement.transactions[1].due_date, None);
        assert_eq!(db.credits().list_transactions().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_balance_overflow_rolls_back_the_entry() {
        use CreditTransactionKind::*;
        let db = memory_db().await;
        let credits = db.credits();

        let c = credits
            .record_transaction(&entry("Acme", Debit, i64::MAX))
            .await
            .unwrap();

        let err = credits
            .record_transaction(&entry("Acme", Debit, 1))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            DbError::Rejected(CoreError::Validation(ValidationError::TooLarge { .. }))
        ));

        let statement = credits.statement(c.id).await.unwrap().unwrap();
        assert_eq!(statement.transactions.len(), 1);
        assert_eq!(statement.client.total_owed.cents(), i64::MAX);

        // a payment still brings it back into range
        let c = credits.record_transaction(&entry("Acme", Payment, 100)).await.unwrap();
        assert_eq!(c.total_owed.cents(), i64::MAX - 100);
    }

    #[tokio::test]
    async fn test_names_match_exactly() {
        use CreditTransactionKind::*;
        let db = memory_db().await;

        db.credits().record_transaction(&entry("Acme Garage", Debit, 100)).await.unwrap();
        db.credits().record_transaction(&entry("acme garage", Debit, 100)).await.unwrap();

        assert_eq!(db.credits().list_clients().await.unwrap().len(), 2);
        assert!(db.credits().statement(999).await.unwrap().is_none());
    }
}
