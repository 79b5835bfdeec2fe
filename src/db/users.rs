use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

use crate::core::AppError;
use crate::models::users::{RegisterRequest, User};

pub async fn email_exists(pool: &PgPool, email: &str) -> Result<bool, AppError> {
    let exists: bool = sqlx::query_scalar(
        r#"
        SELECT EXISTS (
            SELECT 1 FROM users WHERE email = $1
        )
        "#,
    )
    .bind(email)
    .fetch_one(pool)
    .await
    .map_err(AppError::db_error)?;

    Ok(exists)
}

pub async fn create_user(pool: &PgPool, request: &RegisterRequest) -> Result<User, AppError> {
    let password_hash = bcrypt::hash(&request.password, bcrypt::DEFAULT_COST)?;

    let user = sqlx::query_as::<_, User>(
        r#"
        INSERT INTO users (id, email, password_hash, full_name, created_at)
        VALUES ($1, $2, $3, $4, now())
        RETURNING id, email, password_hash, full_name, created_at
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(&request.email)
    .bind(password_hash)
    .bind(&request.full_name)
    .fetch_one(pool)
    .await
    .map_err(duplicate_email_or_db_error)?;

    Ok(user)
}

/// Two registrations can pass the pre-insert existence check at once;
/// the unique index on `users.email` then fails the loser, which must
/// surface as the same duplicate-email rejection, not a server error.
fn duplicate_email_or_db_error(e: sqlx::Error) -> AppError {
    match e.as_database_error() {
        Some(db_err) if db_err.is_unique_violation() => {
            AppError::bad_request("A user with this email address already exists")
        }
        _ => AppError::db_error(e),
    }
}

/// Locks the user's row until the surrounding transaction ends.
/// Concurrent balance-affecting requests for the same user queue behind
/// it, so a balance read that follows sees every committed ledger entry.
pub async fn lock_user(
    db_transaction: &mut Transaction<'_, Postgres>,
    user_id: Uuid,
) -> Result<(), AppError> {
    sqlx::query("SELECT id FROM users WHERE id = $1 FOR UPDATE")
        .bind(user_id)
        .execute(db_transaction.as_mut())
        .await
        .map_err(AppError::db_error)?;

    Ok(())
}

pub async fn get_user_by_email(pool: &PgPool, email: &str) -> Result<Option<User>, AppError> {
    let user = sqlx::query_as::<_, User>(
        r#"
        SELECT id, email, password_hash, full_name, created_at
        FROM users
        WHERE email = $1
        "#,
    )
    .bind(email)
    .fetch_optional(pool)
    .await
    .map_err(AppError::db_error)?;

    Ok(user)
}

pub async fn get_user_by_id(pool: &PgPool, user_id: Uuid) -> Result<User, AppError> {
    let user = sqlx::query_as::<_, User>(
        r#"
        SELECT id, email, password_hash, full_name, created_at
        FROM users
        WHERE id = $1
        "#,
    )
    .bind(user_id)
    .fetch_optional(pool)
    .await
    .map_err(AppError::db_error)?
    .ok_or_else(|| AppError::not_found("User not found"))?;

    Ok(user)
}

pub async fn verify_password(password: &str, password_hash: &str) -> Result<bool, AppError> {
    Ok(bcrypt::verify(password, password_hash)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::AppErrorType;
    use sqlx::error::{DatabaseError, ErrorKind};
    use std::error::Error as StdError;

    #[derive(Debug)]
    struct StubPgError(ErrorKind);

    impl std::fmt::Display for StubPgError {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            write!(f, "stub database error")
        }
    }

    impl StdError for StubPgError {}

    impl DatabaseError for StubPgError {
        fn message(&self) -> &str {
            "stub database error"
        }

        fn kind(&self) -> ErrorKind {
            match self.0 {
                ErrorKind::UniqueViolation => ErrorKind::UniqueViolation,
                _ => ErrorKind::Other,
            }
        }

        fn as_error(&self) -> &(dyn StdError + Send + Sync + 'static) {
            self
        }

        fn as_error_mut(&mut self) -> &mut (dyn StdError + Send + Sync + 'static) {
            self
        }

        fn into_error(self: Box<Self>) -> Box<dyn StdError + Send + Sync + 'static> {
            self
        }
    }

    #[test]
    fn a_unique_violation_surfaces_as_the_duplicate_email_rejection() {
        let e = sqlx::Error::Database(Box::new(StubPgError(ErrorKind::UniqueViolation)));
        let mapped = duplicate_email_or_db_error(e);
        assert_eq!(mapped.error_type, AppErrorType::PayloadValidationError);
    }

    #[test]
    fn other_database_errors_stay_server_errors() {
        let e = sqlx::Error::Database(Box::new(StubPgError(ErrorKind::Other)));
        let mapped = duplicate_email_or_db_error(e);
        assert_eq!(mapped.error_type, AppErrorType::DbError);
    }
}
