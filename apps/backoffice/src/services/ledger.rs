//! Credit ledger page: record debits and payments, list balances.

use serde::{Deserialize, Serialize};
use tracing::info;

use shopfront_core::validation::{optional, parse_date, parse_positive_money, required, ValidationResult};
use shopfront_core::{CreditClient, CreditTransaction, CreditTransactionKind};
use shopfront_db::{ClientStatement, Database, NewCreditTransaction};

use super::rejected;
use crate::error::{ActionResult, ApiError};

/// Credit transaction form as submitted.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreditTransactionForm {
    pub client_name: Option<String>,
    /// `debit` or `payment`
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub amount: Option<String>,
    pub description: Option<String>,
    /// `YYYY-MM-DD`, debits only
    pub due_date: Option<String>,
}

impl CreditTransactionForm {
    fn validate(&self) -> ValidationResult<NewCreditTransaction> {
        let client_name = required("clientName", self.client_name.as_deref())?;
        let kind: CreditTransactionKind = required("type", self.kind.as_deref())?.parse()?;
        let amount = parse_positive_money("amount", &required("amount", self.amount.as_deref())?)?;
        let due_date = match kind {
            CreditTransactionKind::Debit => optional(self.due_date.as_deref())
                .map(|raw| parse_date("dueDate", &raw))
                .transpose()?,
            CreditTransactionKind::Payment => None,
        };

        Ok(NewCreditTransaction {
            client_name,
            kind,
            amount,
            description: optional(self.description.as_deref()),
            due_date,
        })
    }
}

/// Everything the ledger page shows.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LedgerPage {
    pub clients: Vec<CreditClient>,
    /// Newest first, across all clients.
    pub transactions: Vec<CreditTransaction>,
}

#[derive(Debug, Clone)]
pub struct LedgerService {
    db: Database,
}

impl LedgerService {
    pub fn new(db: Database) -> Self {
        LedgerService { db }
    }

    /// Appends a ledger entry, provisioning the client on first use.
    ///
    /// Every validation failure reads "Invalid input data"; nothing is
    /// written in that case.
    pub async fn record_transaction(
        &self,
        form: &CreditTransactionForm,
    ) -> Result<CreditClient, ApiError> {
        let new = form.validate().map_err(rejected("Invalid input data"))?;
        let client = self.db.credits().record_transaction(&new).await?;

        info!(client = %client.client_name, total_owed = %client.total_owed, "Ledger updated");
        Ok(client)
    }

    pub async fn submit_transaction(&self, form: &CreditTransactionForm) -> ActionResult {
        ActionResult::from_result(self.record_transaction(form).await, |_| {
            "Transaction recorded successfully!".to_string()
        })
    }

    pub async fn page(&self) -> Result<LedgerPage, ApiError> {
        let credits = self.db.credits();
        Ok(LedgerPage {
            clients: credits.list_clients().await?,
            transactions: credits.list_transactions().await?,
        })
    }

    pub async fn client_statement(&self, client_id: i64) -> Result<ClientStatement, ApiError> {
        self.db
            .credits()
            .statement(client_id)
            .await?
            .ok_or_else(|| ApiError::not_found("Credit client", client_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form(name: &str, kind: &str, amount: &str) -> CreditTransactionForm {
        CreditTransactionForm {
            client_name: Some(name.to_string()),
            kind: Some(kind.to_string()),
            amount: Some(amount.to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_valid_form() {
        let mut f = form(" Acme Garage ", "debit", "100");
        f.due_date = Some("2024-02-29".to_string());
        let new = f.validate().unwrap();
        assert_eq!(new.client_name, "Acme Garage");
        assert_eq!(new.amount.cents(), 10_000);
        assert!(new.due_date.is_some());
    }

    #[test]
    fn test_rejects_bad_input() {
        assert!(form("Acme", "refund", "10").validate().is_err());
        assert!(form("Acme", "debit", "0").validate().is_err());
        assert!(form("Acme", "debit", "-5").validate().is_err());
        assert!(form("Acme", "debit", "ten").validate().is_err());
        assert!(form("  ", "debit", "10").validate().is_err());

        let mut f = form("Acme", "debit", "10");
        f.due_date = Some("31/12/2024".to_string());
        assert!(f.validate().is_err());
    }

    #[test]
    fn test_payment_ignores_due_date() {
        let mut f = form("Acme", "payment", "10");
        f.due_date = Some("31/12/2024".to_string());
        let new = f.validate().unwrap();
        assert_eq!(new.kind, CreditTransactionKind::Payment);
        assert!(new.due_date.is_none());

        f.due_date = Some("2024-12-31".to_string());
        assert!(f.validate().unwrap().due_date.is_none());
    }

    #[test]
    fn test_deserializes_form_names() {
        let f: CreditTransactionForm = serde_json::from_str(
            r#"{"clientName":"Acme","type":"payment","amount":"40","dueDate":""}"#,
        )
        .unwrap();
        let new = f.validate().unwrap();
        assert_eq!(new.kind, CreditTransactionKind::Payment);
        assert_eq!(new.due_date, None);
    }
}
