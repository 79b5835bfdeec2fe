use crate::core::{AppError, AppSuccessResponse, RedisHelper};
use crate::db::plans;
use crate::models::plans::Plan;
use actix_web::{get, web, HttpResponse, Result};
use sqlx::PgPool;
use std::time::Duration;

pub(crate) const PLANS_CACHE_KEY: &str = "plans:catalog";
const PLANS_CACHE_TTL: Duration = Duration::from_secs(300);

/// The catalog is immutable reference data, so a short TTL cache is
/// safe: a stale read can only miss a plan added moments ago.
#[tracing::instrument(name = "Get Plans", skip(pool, redis_helper))]
#[get("")]
pub async fn get_plans(
    pool: web::Data<PgPool>,
    redis_helper: web::Data<RedisHelper>,
) -> Result<HttpResponse, AppError> {
    if let Ok(cached) = redis_helper.get::<Vec<Plan>>(PLANS_CACHE_KEY).await {
        return Ok(HttpResponse::Ok().json(AppSuccessResponse {
            success: true,
            data: cached,
            message: "Plans retrieved successfully".to_string(),
            pagination: None,
        }));
    }

    let plans = plans::list_plans(&pool).await?;

    if let Err(e) = redis_helper
        .set(PLANS_CACHE_KEY, &plans, Some(PLANS_CACHE_TTL))
        .await
    {
        tracing::warn!(error = %e, "failed to cache plan catalog");
    }

    Ok(HttpResponse::Ok().json(AppSuccessResponse {
        success: true,
        data: plans,
        message: "Plans retrieved successfully".to_string(),
        pagination: None,
    }))
}
