use sqlx::PgPool;

use crate::core::AppError;

/// A user is an administrator iff their authenticated email has a row in
/// the admins table. Re-checked server-side on every privileged request;
/// any client-held flag is a UI hint only.
pub async fn is_admin(pool: &PgPool, email: &str) -> Result<bool, AppError> {
    let exists: bool = sqlx::query_scalar(
        r#"
        SELECT EXISTS (
            SELECT 1 FROM admins WHERE email = $1
        )
        "#,
    )
    .bind(email)
    .fetch_one(pool)
    .await
    .map_err(AppError::db_error)?;

    Ok(exists)
}
