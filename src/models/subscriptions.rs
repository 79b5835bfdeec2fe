use bigdecimal::BigDecimal;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::plans::PlanSummary;

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum SubscriptionStatus {
    Active,
    Completed,
    Cancelled,
}

/// A user's commitment of capital to a plan for a bounded period.
///
/// `last_accrued_on` is the accrual watermark: the date through which
/// profit has already been credited to the ledger. It starts at NULL
/// (nothing credited) and only moves forward.
#[derive(Debug, Serialize, Deserialize, Clone, sqlx::FromRow)]
pub struct Subscription {
    pub id: Uuid,
    pub user_id: Uuid,
    pub plan_id: Uuid,
    pub amount: BigDecimal,
    pub status: SubscriptionStatus,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub last_accrued_on: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
pub struct SubscribeRequest {
    pub plan_id: Uuid,
    pub amount: BigDecimal,
}

#[derive(Debug, Serialize)]
pub struct SubscriptionWithPlan {
    pub id: Uuid,
    pub amount: BigDecimal,
    pub status: SubscriptionStatus,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub last_accrued_on: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
    pub plan: PlanSummary,
}
