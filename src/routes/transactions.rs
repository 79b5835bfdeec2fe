use crate::core::jwt_auth::JwtClaims;
use crate::core::AppError;
use crate::core::{AppErrorResponse, AppSuccessResponse};
use crate::db::{transactions, users};
use crate::models::pagination::{PaginationMeta, PaginationQuery};
use crate::models::transactions::{DepositRequest, TransactionType, WithdrawRequest};
use actix_web::{get, post, web, HttpResponse, Result};
use bigdecimal::BigDecimal;
use sqlx::PgPool;

#[tracing::instrument(name = "Deposit Funds", skip(pool, claims, request))]
#[post("/deposit")]
pub async fn deposit(
    pool: web::Data<PgPool>,
    claims: JwtClaims,
    request: web::Json<DepositRequest>,
) -> Result<HttpResponse, AppError> {
    // Owner is always the authenticated caller, never a payload field.
    let user_id = claims.user_id()?;

    if let Some(message) = deposit_amount_error(&request.amount) {
        return Ok(HttpResponse::BadRequest().json(AppErrorResponse {
            success: false,
            message: message.to_string(),
        }));
    }

    let mut db_transaction = pool.begin().await.map_err(AppError::db_error)?;
    let entry = transactions::insert_ledger_entry(
        &mut db_transaction,
        user_id,
        TransactionType::Deposit,
        &TransactionType::Deposit.signed_amount(request.amount.clone()),
        "Account deposit",
        None,
    )
    .await?;
    db_transaction.commit().await.map_err(AppError::db_error)?;

    Ok(HttpResponse::Created().json(AppSuccessResponse {
        success: true,
        data: entry,
        message: "Deposit recorded successfully".to_string(),
        pagination: None,
    }))
}

#[tracing::instrument(name = "Withdraw Funds", skip(pool, claims, request))]
#[post("/withdraw")]
pub async fn withdraw(
    pool: web::Data<PgPool>,
    claims: JwtClaims,
    request: web::Json<WithdrawRequest>,
) -> Result<HttpResponse, AppError> {
    let user_id = claims.user_id()?;

    let mut db_transaction = pool.begin().await.map_err(AppError::db_error)?;

    // Under READ COMMITTED, two withdrawals could both read the old sum
    // and both pass the balance check. The row lock on the user makes
    // concurrent withdrawals queue, so the second one reads a balance
    // that already includes the first debit.
    users::lock_user(&mut db_transaction, user_id).await?;

    let available = transactions::available_balance_in_tx(&mut db_transaction, user_id).await?;
    if let Some(message) = withdrawal_error(&request.amount, &available) {
        return Ok(HttpResponse::BadRequest().json(AppErrorResponse {
            success: false,
            message: message.to_string(),
        }));
    }

    let entry = transactions::insert_ledger_entry(
        &mut db_transaction,
        user_id,
        TransactionType::Withdrawal,
        &TransactionType::Withdrawal.signed_amount(request.amount.clone()),
        "Account withdrawal",
        None,
    )
    .await?;
    db_transaction.commit().await.map_err(AppError::db_error)?;

    Ok(HttpResponse::Created().json(AppSuccessResponse {
        success: true,
        data: entry,
        message: "Withdrawal recorded successfully".to_string(),
        pagination: None,
    }))
}

#[tracing::instrument(name = "Get My Transactions", skip(pool, claims))]
#[get("")]
pub async fn get_my_transactions(
    pool: web::Data<PgPool>,
    claims: JwtClaims,
    mut pagination: web::Query<PaginationQuery>,
) -> Result<HttpResponse, AppError> {
    let user_id = claims.user_id()?;
    pagination.validate();

    let (entries, total_count) =
        transactions::get_user_transactions(&pool, user_id, &pagination).await?;

    Ok(HttpResponse::Ok().json(AppSuccessResponse {
        success: true,
        data: entries,
        message: "Transactions retrieved successfully".to_string(),
        pagination: Some(PaginationMeta::new(
            pagination.page,
            pagination.per_page,
            total_count,
        )),
    }))
}

const MIN_DEPOSIT: i32 = 100;
const DEPOSIT_INCREMENT: i32 = 50;

/// Server-side mirror of the product's deposit rules: at least 100
/// currency units, in increments of 50.
fn deposit_amount_error(amount: &BigDecimal) -> Option<&'static str> {
    if amount <= &BigDecimal::from(0) {
        return Some("Deposit amount must be positive");
    }
    if amount < &BigDecimal::from(MIN_DEPOSIT) {
        return Some("Minimum deposit is 100");
    }
    if !(amount / BigDecimal::from(DEPOSIT_INCREMENT)).is_integer() {
        return Some("Deposits must be in increments of 50");
    }
    None
}

/// Withdrawal guard, evaluated against a balance read under the user's
/// row lock: positive amount, fully covered by the available balance.
fn withdrawal_error(amount: &BigDecimal, available: &BigDecimal) -> Option<&'static str> {
    if amount <= &BigDecimal::from(0) {
        return Some("Withdrawal amount must be positive");
    }
    if amount > available {
        return Some("Insufficient available balance");
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use claim::{assert_none, assert_some};
    use std::str::FromStr;

    #[test]
    fn non_positive_amounts_are_rejected() {
        assert_some!(deposit_amount_error(&BigDecimal::from(0)));
        assert_some!(deposit_amount_error(&BigDecimal::from(-100)));
    }

    #[test]
    fn amounts_below_the_minimum_are_rejected() {
        assert_some!(deposit_amount_error(&BigDecimal::from(50)));
        assert_some!(deposit_amount_error(&BigDecimal::from_str("99.99").unwrap()));
    }

    #[test]
    fn the_minimum_itself_is_accepted() {
        assert_none!(deposit_amount_error(&BigDecimal::from(100)));
    }

    #[test]
    fn only_multiples_of_the_increment_pass() {
        assert_none!(deposit_amount_error(&BigDecimal::from(150)));
        assert_none!(deposit_amount_error(&BigDecimal::from(1000)));
        assert_some!(deposit_amount_error(&BigDecimal::from(120)));
        assert_some!(deposit_amount_error(&BigDecimal::from_str("150.5").unwrap()));
    }

    #[test]
    fn non_positive_withdrawals_are_rejected() {
        assert_some!(withdrawal_error(&BigDecimal::from(0), &BigDecimal::from(500)));
        assert_some!(withdrawal_error(&BigDecimal::from(-50), &BigDecimal::from(500)));
    }

    #[test]
    fn withdrawals_cannot_exceed_the_available_balance() {
        assert_some!(withdrawal_error(
            &BigDecimal::from_str("500.01").unwrap(),
            &BigDecimal::from(500),
        ));
        // A second withdrawal sees the balance left by the first, never
        // the pre-debit sum; after 300 of 500 only 200 remains coverable.
        assert_some!(withdrawal_error(&BigDecimal::from(300), &BigDecimal::from(200)));
        assert_none!(withdrawal_error(&BigDecimal::from(200), &BigDecimal::from(200)));
    }

    #[test]
    fn the_full_balance_can_be_withdrawn() {
        assert_none!(withdrawal_error(&BigDecimal::from(500), &BigDecimal::from(500)));
    }
}
