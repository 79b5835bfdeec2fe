use crate::core::jwt_auth::JwtClaims;
use crate::core::AppError;
use crate::core::{AppErrorResponse, AppSuccessResponse};
use crate::core::RedisHelper;
use crate::db::{admins, plans, subscriptions};
use crate::models::plans::CreatePlanRequest;
use crate::models::users::AdminCheckResponse;
use crate::routes::plans::PLANS_CACHE_KEY;
use actix_web::{get, post, web, HttpResponse, Result};
use bigdecimal::BigDecimal;
use sqlx::PgPool;

#[tracing::instrument(name = "Check Admin", skip(pool, claims))]
#[get("/check")]
pub async fn check_admin(
    pool: web::Data<PgPool>,
    claims: JwtClaims,
) -> Result<HttpResponse, AppError> {
    let is_admin = admins::is_admin(&pool, &claims.email).await?;

    let message = if is_admin {
        "Administrator access confirmed".to_string()
    } else {
        "This account has no administrator access".to_string()
    };

    Ok(HttpResponse::Ok().json(AppSuccessResponse {
        success: true,
        data: AdminCheckResponse { is_admin },
        message,
        pagination: None,
    }))
}

#[tracing::instrument(name = "Create Plan", skip(pool, redis_helper, claims, request))]
#[post("/plans")]
pub async fn create_plan(
    pool: web::Data<PgPool>,
    redis_helper: web::Data<RedisHelper>,
    claims: JwtClaims,
    request: web::Json<CreatePlanRequest>,
) -> Result<HttpResponse, AppError> {
    if !admins::is_admin(&pool, &claims.email).await? {
        return Ok(HttpResponse::Forbidden().json(AppErrorResponse {
            success: false,
            message: "Access denied. Administrator access required.".to_string(),
        }));
    }

    if request.min_amount <= BigDecimal::from(0)
        || request.daily_profit_rate <= BigDecimal::from(0)
        || request.duration_days <= 0
    {
        return Ok(HttpResponse::BadRequest().json(AppErrorResponse {
            success: false,
            message: "Plan minimum amount, rate and duration must all be positive".to_string(),
        }));
    }

    let plan = plans::create_plan(&pool, &request).await?;

    // The catalog cache may hold the pre-insert list for its full TTL.
    if let Err(e) = redis_helper.delete(PLANS_CACHE_KEY).await {
        tracing::warn!(error = %e, "failed to invalidate plan catalog cache");
    }

    Ok(HttpResponse::Created().json(AppSuccessResponse {
        success: true,
        data: plan,
        message: "Plan created successfully".to_string(),
        pagination: None,
    }))
}

/// Manual trigger for the completion sweep the background job runs hourly.
#[tracing::instrument(name = "Complete Expired Subscriptions", skip(pool, claims))]
#[post("/subscriptions/complete-expired")]
pub async fn complete_expired_now(
    pool: web::Data<PgPool>,
    claims: JwtClaims,
) -> Result<HttpResponse, AppError> {
    if !admins::is_admin(&pool, &claims.email).await? {
        return Ok(HttpResponse::Forbidden().json(AppErrorResponse {
            success: false,
            message: "Access denied. Administrator access required.".to_string(),
        }));
    }

    let completed = subscriptions::complete_expired_subscriptions(&pool)
        .await
        .map_err(AppError::db_error)?;

    Ok(HttpResponse::Ok().json(AppSuccessResponse {
        success: true,
        data: completed,
        message: format!("Marked {} subscription(s) as completed", completed),
        pagination: None,
    }))
}
