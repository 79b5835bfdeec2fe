use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Reference record for an investment product. Immutable once created.
#[derive(Debug, Serialize, Deserialize, Clone, sqlx::FromRow)]
pub struct Plan {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub min_amount: BigDecimal,
    pub duration_days: i32,
    /// Fraction of principal credited per elapsed day, e.g. 0.02.
    pub daily_profit_rate: BigDecimal,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
pub struct CreatePlanRequest {
    pub name: String,
    pub description: Option<String>,
    pub min_amount: BigDecimal,
    pub duration_days: i32,
    pub daily_profit_rate: BigDecimal,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct PlanSummary {
    pub id: Uuid,
    pub name: String,
    pub min_amount: BigDecimal,
    pub duration_days: i32,
    pub daily_profit_rate: BigDecimal,
}
