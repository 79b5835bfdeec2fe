use sqlx::PgPool;
use uuid::Uuid;

use crate::core::AppError;
use crate::models::plans::{CreatePlanRequest, Plan};

pub async fn list_plans(pool: &PgPool) -> Result<Vec<Plan>, AppError> {
    let plans = sqlx::query_as::<_, Plan>(
        r#"
        SELECT id, name, description, min_amount, duration_days, daily_profit_rate, created_at
        FROM plans
        ORDER BY min_amount ASC, created_at ASC
        "#,
    )
    .fetch_all(pool)
    .await
    .map_err(AppError::db_error)?;

    Ok(plans)
}

pub async fn get_plan_by_id(pool: &PgPool, plan_id: Uuid) -> Result<Option<Plan>, AppError> {
    let plan = sqlx::query_as::<_, Plan>(
        r#"
        SELECT id, name, description, min_amount, duration_days, daily_profit_rate, created_at
        FROM plans
        WHERE id = $1
        "#,
    )
    .bind(plan_id)
    .fetch_optional(pool)
    .await
    .map_err(AppError::db_error)?;

    Ok(plan)
}

pub async fn create_plan(pool: &PgPool, request: &CreatePlanRequest) -> Result<Plan, AppError> {
    let plan = sqlx::query_as::<_, Plan>(
        r#"
        INSERT INTO plans (id, name, description, min_amount, duration_days, daily_profit_rate, created_at)
        VALUES ($1, $2, $3, $4, $5, $6, now())
        RETURNING id, name, description, min_amount, duration_days, daily_profit_rate, created_at
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(&request.name)
    .bind(&request.description)
    .bind(&request.min_amount)
    .bind(request.duration_days)
    .bind(&request.daily_profit_rate)
    .fetch_one(pool)
    .await
    .map_err(AppError::db_error)?;

    Ok(plan)
}
