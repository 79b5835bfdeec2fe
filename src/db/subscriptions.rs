use bigdecimal::BigDecimal;
use chrono::{NaiveDate, Utc};
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Postgres, Row, Transaction};
use uuid::Uuid;

use crate::core::AppError;
use crate::models::plans::PlanSummary;
use crate::models::subscriptions::{Subscription, SubscriptionWithPlan};

pub async fn create_subscription(
    pool: &PgPool,
    user_id: Uuid,
    plan_id: Uuid,
    duration_days: i32,
    amount: &BigDecimal,
) -> Result<Subscription, AppError> {
    let start_date = Utc::now().date_naive();
    let end_date = start_date + chrono::Duration::days(duration_days as i64);

    let subscription = sqlx::query_as::<_, Subscription>(
        r#"
        INSERT INTO subscriptions
            (id, user_id, plan_id, amount, status, start_date, end_date, last_accrued_on, created_at)
        VALUES ($1, $2, $3, $4, 'active', $5, $6, NULL, now())
        RETURNING id, user_id, plan_id, amount, status, start_date, end_date, last_accrued_on, created_at
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(user_id)
    .bind(plan_id)
    .bind(amount)
    .bind(start_date)
    .bind(end_date)
    .fetch_one(pool)
    .await
    .map_err(AppError::db_error)?;

    Ok(subscription)
}

pub async fn get_user_subscriptions_with_plans(
    pool: &PgPool,
    user_id: Uuid,
) -> Result<Vec<SubscriptionWithPlan>, AppError> {
    let rows: Vec<PgRow> = sqlx::query(
        r#"
        SELECT
            s.id, s.amount, s.status, s.start_date, s.end_date,
            s.last_accrued_on, s.created_at,
            p.id AS plan_id, p.name AS plan_name, p.min_amount AS plan_min_amount,
            p.duration_days AS plan_duration_days,
            p.daily_profit_rate AS plan_daily_profit_rate
        FROM subscriptions s
        JOIN plans p ON s.plan_id = p.id
        WHERE s.user_id = $1
        ORDER BY s.created_at DESC
        "#,
    )
    .bind(user_id)
    .fetch_all(pool)
    .await
    .map_err(AppError::db_error)?;

    let subscriptions = rows
        .into_iter()
        .map(|row| SubscriptionWithPlan {
            id: row.get("id"),
            amount: row.get("amount"),
            status: row.get("status"),
            start_date: row.get("start_date"),
            end_date: row.get("end_date"),
            last_accrued_on: row.get("last_accrued_on"),
            created_at: row.get("created_at"),
            plan: PlanSummary {
                id: row.get("plan_id"),
                name: row.get("plan_name"),
                min_amount: row.get("plan_min_amount"),
                duration_days: row.get("plan_duration_days"),
                daily_profit_rate: row.get("plan_daily_profit_rate"),
            },
        })
        .collect();

    Ok(subscriptions)
}

/// Subscription joined with the plan rate, as needed by the accrual engine.
#[derive(Debug, sqlx::FromRow)]
pub struct AccruableSubscription {
    pub id: Uuid,
    pub amount: BigDecimal,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub last_accrued_on: Option<NaiveDate>,
    pub daily_profit_rate: BigDecimal,
}

/// Loads every subscription of the user that may still owe profit:
/// active ones, plus completed ones whose watermark trails their end
/// date (the final days stay claimable after completion).
pub async fn load_accruable_subscriptions(
    db_transaction: &mut Transaction<'_, Postgres>,
    user_id: Uuid,
) -> Result<Vec<AccruableSubscription>, AppError> {
    let subscriptions = sqlx::query_as::<_, AccruableSubscription>(
        r#"
        SELECT
            s.id, s.amount, s.start_date, s.end_date,
            s.last_accrued_on, p.daily_profit_rate
        FROM subscriptions s
        JOIN plans p ON s.plan_id = p.id
        WHERE s.user_id = $1
          AND (
                s.status = 'active'
             OR (s.status = 'completed'
                 AND (s.last_accrued_on IS NULL OR s.last_accrued_on < s.end_date))
          )
        ORDER BY s.created_at ASC
        "#,
    )
    .bind(user_id)
    .fetch_all(db_transaction.as_mut())
    .await
    .map_err(AppError::db_error)?;

    Ok(subscriptions)
}

/// Compare-and-swap advance of the accrual watermark. Returns false when
/// the stored watermark no longer matches `previous`, i.e. a concurrent
/// run already credited this subscription.
pub async fn advance_watermark(
    db_transaction: &mut Transaction<'_, Postgres>,
    subscription_id: Uuid,
    previous: Option<NaiveDate>,
    through: NaiveDate,
) -> Result<bool, AppError> {
    let result = sqlx::query(
        r#"
        UPDATE subscriptions
        SET last_accrued_on = $1
        WHERE id = $2
          AND last_accrued_on IS NOT DISTINCT FROM $3
        "#,
    )
    .bind(through)
    .bind(subscription_id)
    .bind(previous)
    .execute(db_transaction.as_mut())
    .await
    .map_err(AppError::db_error)?;

    Ok(result.rows_affected() == 1)
}

pub async fn invested_balance(pool: &PgPool, user_id: Uuid) -> Result<BigDecimal, AppError> {
    let invested: BigDecimal = sqlx::query_scalar(
        r#"
        SELECT COALESCE(SUM(amount), 0)
        FROM subscriptions
        WHERE user_id = $1 AND status = 'active'
        "#,
    )
    .bind(user_id)
    .fetch_one(pool)
    .await
    .map_err(AppError::db_error)?;

    Ok(invested)
}

/// Marks active subscriptions whose end date has passed as completed.
/// Accrual of the final days stays claimable afterwards because the
/// watermark, not the status, gates what has been credited.
pub async fn complete_expired_subscriptions(pool: &PgPool) -> Result<u64, sqlx::Error> {
    let today = Utc::now().date_naive();

    let result = sqlx::query(
        r#"
        UPDATE subscriptions
        SET status = 'completed'
        WHERE status = 'active' AND end_date < $1
        "#,
    )
    .bind(today)
    .execute(pool)
    .await?;

    Ok(result.rows_affected())
}
