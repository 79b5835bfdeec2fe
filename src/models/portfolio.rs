use bigdecimal::BigDecimal;
use serde::Serialize;

use crate::models::transactions::LedgerEntry;

/// Derived balances, computed on read by summing over the ledger and the
/// subscription table. Available and invested figures come from disjoint
/// data and are reported side by side, never netted.
#[derive(Debug, Serialize)]
pub struct PortfolioSummary {
    pub available_balance: BigDecimal,
    pub invested_balance: BigDecimal,
    pub total_performance: BigDecimal,
}

#[derive(Debug, Serialize)]
pub struct EarningsResponse {
    pub earnings: BigDecimal,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transaction: Option<LedgerEntry>,
}
