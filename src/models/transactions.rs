use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    Deposit,
    Withdrawal,
    Subscription,
    Profit,
}

impl TransactionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionType::Deposit => "deposit",
            TransactionType::Withdrawal => "withdrawal",
            TransactionType::Subscription => "subscription",
            TransactionType::Profit => "profit",
        }
    }

    /// Turns a positive magnitude into the signed ledger amount for this
    /// entry type. Deposits and profit credit the balance, withdrawals
    /// and subscription debits reduce it.
    pub fn signed_amount(&self, magnitude: BigDecimal) -> BigDecimal {
        match self {
            TransactionType::Deposit | TransactionType::Profit => magnitude,
            TransactionType::Withdrawal | TransactionType::Subscription => -magnitude,
        }
    }
}

/// Append-only ledger entry. The ledger is the only source of truth for
/// the available balance; no table stores a mutable balance field.
#[derive(Debug, Serialize, Deserialize, Clone, sqlx::FromRow)]
pub struct LedgerEntry {
    pub id: Uuid,
    pub user_id: Uuid,
    pub transaction_type: TransactionType,
    /// Signed: negative for withdrawals and subscription debits.
    pub amount: BigDecimal,
    pub description: String,
    /// Optional link to the subscription that produced this entry.
    pub reference: Option<Uuid>,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
pub struct DepositRequest {
    pub amount: BigDecimal,
}

#[derive(Debug, Deserialize)]
pub struct WithdrawRequest {
    pub amount: BigDecimal,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn credits_keep_their_sign() {
        let amount = BigDecimal::from(250);
        assert_eq!(
            TransactionType::Deposit.signed_amount(amount.clone()),
            BigDecimal::from(250)
        );
        assert_eq!(
            TransactionType::Profit.signed_amount(amount),
            BigDecimal::from(250)
        );
    }

    #[test]
    fn debits_are_negated() {
        let amount = BigDecimal::from(250);
        assert_eq!(
            TransactionType::Withdrawal.signed_amount(amount.clone()),
            BigDecimal::from(-250)
        );
        assert_eq!(
            TransactionType::Subscription.signed_amount(amount),
            BigDecimal::from(-250)
        );
    }

    #[test]
    fn replayed_ledger_sums_to_available_balance() {
        let entries = vec![
            TransactionType::Deposit.signed_amount(BigDecimal::from(1000)),
            TransactionType::Withdrawal.signed_amount(BigDecimal::from(300)),
            TransactionType::Profit.signed_amount(BigDecimal::from(45)),
            TransactionType::Withdrawal.signed_amount(BigDecimal::from(145)),
        ];

        let balance = entries
            .into_iter()
            .fold(BigDecimal::from(0), |acc, entry| acc + entry);
        assert_eq!(balance, BigDecimal::from(600));
    }
}
