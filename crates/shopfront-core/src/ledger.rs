//! # Credit Ledger
//!
//! Derives what a credit client owes from its transaction history.
//!
//! ## Balance Rule
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │   balance    = Σ debit.amount − Σ payment.amount                        │
//! │   total_owed = max(0, balance)                                          │
//! │                                                                         │
//! │   Acme Garage                                                           │
//! │     debit   100  ──► 100                                                │
//! │     payment  40  ──►  60                                                │
//! │     payment 100  ──►   0   (balance -40, floored)                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The cached `total_owed` is always recomputed from the full history and
//! overwritten, never adjusted by the latest amount. A negative balance is
//! reported as zero owed and is not stored anywhere. The fold runs in `i128`,
//! so only a final balance outside the `i64` cent range yields `None`.

use crate::money::Money;
use crate::types::{CreditTransaction, CreditTransactionKind};

/// Signed contribution of one entry to the balance, in cents.
#[inline]
pub fn signed_cents(kind: CreditTransactionKind, amount: Money) -> i128 {
    let cents = i128::from(amount.cents());
    match kind {
        CreditTransactionKind::Debit => cents,
        CreditTransactionKind::Payment => -cents,
    }
}

/// Net balance before flooring. Negative means the client overpaid.
pub fn net_balance<'a, I>(transactions: I) -> Option<Money>
where
    I: IntoIterator<Item = &'a CreditTransaction>,
{
    let total: i128 = transactions
        .into_iter()
        .map(|t| signed_cents(t.transaction_type, t.amount))
        .sum();
    i64::try_from(total).ok().map(Money::from_cents)
}

/// What the client owes: the net balance floored at zero.
pub fn outstanding_balance<'a, I>(transactions: I) -> Option<Money>
where
    I: IntoIterator<Item = &'a CreditTransaction>,
{
    net_balance(transactions).map(|balance| balance.floor_zero())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(kind: CreditTransactionKind, cents: i64) -> CreditTransaction {
        CreditTransaction {
            id: 0,
            credit_id: 1,
            transaction_type: kind,
            amount: Money::from_cents(cents),
            description: None,
            due_date: None,
            transaction_date: 0,
        }
    }

    #[test]
    fn test_acme_garage_sequence() {
        use CreditTransactionKind::*;

        let mut history = vec![entry(Debit, 10000)];
        assert_eq!(outstanding_balance(&history).unwrap().cents(), 10000);

        history.push(entry(Payment, 4000));
        assert_eq!(outstanding_balance(&history).unwrap().cents(), 6000);

        history.push(entry(Payment, 10000));
        assert_eq!(outstanding_balance(&history).unwrap().cents(), 0);
        assert_eq!(net_balance(&history).unwrap().cents(), -4000);
    }

    #[test]
    fn test_overpayment_absorbs_later_debits() {
        use CreditTransactionKind::*;

        // Fold over the whole history: a later debit eats into the earlier
        // overpayment before anything is owed again.
        let history = vec![entry(Payment, 5000), entry(Debit, 3000)];
        assert_eq!(outstanding_balance(&history), Some(Money::zero()));

        let history = vec![entry(Payment, 5000), entry(Debit, 8000)];
        assert_eq!(outstanding_balance(&history).unwrap().cents(), 3000);
    }

    #[test]
    fn test_empty_history_owes_nothing() {
        let history: Vec<CreditTransaction> = Vec::new();
        assert_eq!(outstanding_balance(&history), Some(Money::zero()));
    }

    #[test]
    fn test_order_does_not_matter() {
        use CreditTransactionKind::*;

        let a = vec![entry(Debit, 2500), entry(Payment, 1000), entry(Debit, 700)];
        let b = vec![entry(Payment, 1000), entry(Debit, 700), entry(Debit, 2500)];
        assert_eq!(outstanding_balance(&a), outstanding_balance(&b));
        assert_eq!(outstanding_balance(&a).unwrap().cents(), 2200);
    }

    #[test]
    fn test_balance_beyond_i64_is_none() {
        use CreditTransactionKind::*;

        let history = vec![entry(Debit, i64::MAX), entry(Debit, i64::MAX)];
        assert_eq!(net_balance(&history), None);
        assert_eq!(outstanding_balance(&history), None);

        // intermediate sums may leave the range as long as the result fits
        let history = vec![entry(Debit, i64::MAX), entry(Debit, 10), entry(Payment, 20)];
        assert_eq!(net_balance(&history), Some(Money::from_cents(i64::MAX - 10)));
    }
}
