use bigdecimal::BigDecimal;
use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

use crate::core::AppError;
use crate::models::pagination::PaginationQuery;
use crate::models::transactions::{LedgerEntry, TransactionType};

/// Appends one ledger entry. `amount` is already signed; callers go
/// through `TransactionType::signed_amount` so debits land negative.
/// Runs inside the caller's transaction so multi-statement operations
/// commit atomically or not at all.
pub async fn insert_ledger_entry(
    db_transaction: &mut Transaction<'_, Postgres>,
    user_id: Uuid,
    transaction_type: TransactionType,
    amount: &BigDecimal,
    description: &str,
    reference: Option<Uuid>,
) -> Result<LedgerEntry, AppError> {
    let entry = sqlx::query_as::<_, LedgerEntry>(
        r#"
        INSERT INTO transactions
            (id, user_id, transaction_type, amount, description, reference, status, created_at)
        VALUES ($1, $2, $3, $4, $5, $6, 'completed', now())
        RETURNING id, user_id, transaction_type, amount, description, reference, status, created_at
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(user_id)
    .bind(transaction_type)
    .bind(amount)
    .bind(description)
    .bind(reference)
    .fetch_one(db_transaction.as_mut())
    .await
    .map_err(AppError::db_error)?;

    Ok(entry)
}

pub async fn get_user_transactions(
    pool: &PgPool,
    user_id: Uuid,
    pagination: &PaginationQuery,
) -> Result<(Vec<LedgerEntry>, i64), AppError> {
    let entries = sqlx::query_as::<_, LedgerEntry>(
        r#"
        SELECT id, user_id, transaction_type, amount, description, reference, status, created_at
        FROM transactions
        WHERE user_id = $1
        ORDER BY created_at DESC
        LIMIT $2 OFFSET $3
        "#,
    )
    .bind(user_id)
    .bind(pagination.per_page as i64)
    .bind(pagination.offset() as i64)
    .fetch_all(pool)
    .await
    .map_err(AppError::db_error)?;

    let total_count: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM transactions WHERE user_id = $1")
            .bind(user_id)
            .fetch_one(pool)
            .await
            .map_err(AppError::db_error)?;

    Ok((entries, total_count))
}

pub async fn available_balance(pool: &PgPool, user_id: Uuid) -> Result<BigDecimal, AppError> {
    let balance: BigDecimal = sqlx::query_scalar(
        r#"
        SELECT COALESCE(SUM(amount), 0)
        FROM transactions
        WHERE user_id = $1
        "#,
    )
    .bind(user_id)
    .fetch_one(pool)
    .await
    .map_err(AppError::db_error)?;

    Ok(balance)
}

/// Same signed sum as `available_balance`, read inside an open
/// transaction. Callers that go on to debit must hold the user's row
/// lock (`users::lock_user`) first; the sum alone does not protect
/// against a concurrent withdrawal committing in between.
pub async fn available_balance_in_tx(
    db_transaction: &mut Transaction<'_, Postgres>,
    user_id: Uuid,
) -> Result<BigDecimal, AppError> {
    let balance: BigDecimal = sqlx::query_scalar(
        r#"
        SELECT COALESCE(SUM(amount), 0)
        FROM transactions
        WHERE user_id = $1
        "#,
    )
    .bind(user_id)
    .fetch_one(db_transaction.as_mut())
    .await
    .map_err(AppError::db_error)?;

    Ok(balance)
}

pub async fn total_performance(pool: &PgPool, user_id: Uuid) -> Result<BigDecimal, AppError> {
    let performance: BigDecimal = sqlx::query_scalar(
        r#"
        SELECT COALESCE(SUM(amount), 0)
        FROM transactions
        WHERE user_id = $1 AND transaction_type = 'profit'
        "#,
    )
    .bind(user_id)
    .fetch_one(pool)
    .await
    .map_err(AppError::db_error)?;

    Ok(performance)
}
