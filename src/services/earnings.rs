//! Daily earnings accrual.
//!
//! Accrual is a transition over the per-subscription watermark
//! (`last_accrued_on`), never a re-derivation from absolute elapsed
//! time. The watermark advance and the single profit ledger insert
//! commit in one database transaction, so running the process twice in
//! the same period credits exactly once.

use bigdecimal::BigDecimal;
use chrono::NaiveDate;
use sqlx::PgPool;
use uuid::Uuid;

use crate::core::AppError;
use crate::db;
use crate::models::portfolio::EarningsResponse;
use crate::models::transactions::TransactionType;

/// The date range a subscription can be credited for right now.
///
/// Days are whole elapsed days, floored: 3.5 days after the start only
/// 3 are owed. Accrual starts from the watermark when one exists,
/// otherwise from the start date, and never runs past the end date.
pub fn accrual_window(
    start_date: NaiveDate,
    last_accrued_on: Option<NaiveDate>,
    end_date: NaiveDate,
    today: NaiveDate,
) -> Option<(i64, NaiveDate)> {
    let from = last_accrued_on.unwrap_or(start_date);
    let through = today.min(end_date);
    let days = (through - from).num_days();
    if days <= 0 {
        return None;
    }
    Some((days, through))
}

/// Profit scales with the committed principal: days x rate x amount.
pub fn profit_for_days(days: i64, daily_profit_rate: &BigDecimal, amount: &BigDecimal) -> BigDecimal {
    BigDecimal::from(days) * daily_profit_rate * amount
}

#[tracing::instrument(name = "Run earnings accrual", skip(pool))]
pub async fn run_accrual(
    pool: &PgPool,
    user_id: Uuid,
    today: NaiveDate,
) -> Result<EarningsResponse, AppError> {
    let mut db_transaction = pool.begin().await.map_err(AppError::db_error)?;

    let subscriptions =
        db::subscriptions::load_accruable_subscriptions(&mut db_transaction, user_id).await?;

    let mut total_earnings = BigDecimal::from(0);
    let mut credited: Vec<Uuid> = Vec::new();

    for subscription in &subscriptions {
        let window = accrual_window(
            subscription.start_date,
            subscription.last_accrued_on,
            subscription.end_date,
            today,
        );
        let (days, through) = match window {
            Some(window) => window,
            None => continue,
        };

        let advanced = db::subscriptions::advance_watermark(
            &mut db_transaction,
            subscription.id,
            subscription.last_accrued_on,
            through,
        )
        .await?;

        // A concurrent run already moved the watermark; that run owns
        // the credit for these days.
        if !advanced {
            tracing::info!(
                subscription_id = %subscription.id,
                "watermark moved concurrently, skipping"
            );
            continue;
        }

        total_earnings += profit_for_days(days, &subscription.daily_profit_rate, &subscription.amount);
        credited.push(subscription.id);
    }

    if total_earnings <= BigDecimal::from(0) {
        db_transaction.commit().await.map_err(AppError::db_error)?;
        return Ok(EarningsResponse {
            earnings: BigDecimal::from(0),
            transaction: None,
        });
    }

    let reference = match credited.as_slice() {
        [only] => Some(*only),
        _ => None,
    };
    let description = format!("Daily profit across {} subscription(s)", credited.len());

    let entry = db::transactions::insert_ledger_entry(
        &mut db_transaction,
        user_id,
        TransactionType::Profit,
        &total_earnings,
        &description,
        reference,
    )
    .await?;

    db_transaction.commit().await.map_err(AppError::db_error)?;

    tracing::info!(
        user_id = %user_id,
        earnings = %total_earnings,
        subscriptions = credited.len(),
        "credited daily profit"
    );

    Ok(EarningsResponse {
        earnings: total_earnings,
        transaction: Some(entry),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use claim::{assert_none, assert_some_eq};
    use std::str::FromStr;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::from_str(s).unwrap()
    }

    #[test]
    fn fresh_subscription_accrues_from_start_date() {
        let window = accrual_window(date("2025-01-01"), None, date("2025-12-31"), date("2025-01-04"));
        assert_some_eq!(window, (3, date("2025-01-04")));
    }

    #[test]
    fn half_days_are_floored_by_date_granularity() {
        // 3.5 elapsed days lands on the fourth calendar day: only 3 owed.
        let window = accrual_window(date("2025-01-01"), None, date("2025-12-31"), date("2025-01-04"));
        let (days, _) = window.unwrap();
        assert_eq!(days, 3);
    }

    #[test]
    fn second_run_in_same_period_owes_nothing() {
        let window = accrual_window(
            date("2025-01-01"),
            Some(date("2025-01-04")),
            date("2025-12-31"),
            date("2025-01-04"),
        );
        assert_none!(window);
    }

    #[test]
    fn later_run_only_owes_the_new_days() {
        // Already credited through day 3; at day 4 only 1 more is owed.
        let window = accrual_window(
            date("2025-01-01"),
            Some(date("2025-01-04")),
            date("2025-12-31"),
            date("2025-01-05"),
        );
        assert_some_eq!(window, (1, date("2025-01-05")));
    }

    #[test]
    fn accrual_never_runs_past_end_date() {
        let window = accrual_window(
            date("2025-01-01"),
            Some(date("2025-01-08")),
            date("2025-01-11"),
            date("2025-02-01"),
        );
        assert_some_eq!(window, (3, date("2025-01-11")));

        // Everything through end_date credited: nothing further, ever.
        let window = accrual_window(
            date("2025-01-01"),
            Some(date("2025-01-11")),
            date("2025-01-11"),
            date("2025-03-01"),
        );
        assert_none!(window);
    }

    #[test]
    fn subscription_started_today_owes_nothing() {
        let window = accrual_window(date("2025-01-01"), None, date("2025-12-31"), date("2025-01-01"));
        assert_none!(window);
    }

    #[test]
    fn profit_scales_with_principal() {
        // 10 days x 0.02/day on 500 committed = 100.
        let rate = BigDecimal::from_str("0.02").unwrap();
        let amount = BigDecimal::from(500);
        let profit = profit_for_days(10, &rate, &amount);
        assert_eq!(profit, BigDecimal::from_str("100.00").unwrap());
    }

    #[test]
    fn zero_days_yield_zero_profit() {
        let rate = BigDecimal::from_str("0.015").unwrap();
        let amount = BigDecimal::from(1000);
        assert_eq!(profit_for_days(0, &rate, &amount), BigDecimal::from(0));
    }
}
