use crate::core::jwt_auth::JwtClaims;
use crate::core::AppError;
use crate::core::AppSuccessResponse;
use crate::db::{subscriptions, transactions};
use crate::models::portfolio::PortfolioSummary;
use crate::services::earnings;
use actix_web::{get, post, web, HttpResponse, Result};
use chrono::Utc;
use sqlx::PgPool;

#[tracing::instrument(name = "Accrue Earnings", skip(pool, claims))]
#[post("/accrue")]
pub async fn run_accrual(
    pool: web::Data<PgPool>,
    claims: JwtClaims,
) -> Result<HttpResponse, AppError> {
    let user_id = claims.user_id()?;
    let today = Utc::now().date_naive();

    let outcome = earnings::run_accrual(&pool, user_id, today).await?;

    Ok(HttpResponse::Ok().json(AppSuccessResponse {
        success: true,
        data: outcome,
        message: "Earnings accrual completed".to_string(),
        pagination: None,
    }))
}

#[tracing::instrument(name = "Get Portfolio", skip(pool, claims))]
#[get("")]
pub async fn get_portfolio(
    pool: web::Data<PgPool>,
    claims: JwtClaims,
) -> Result<HttpResponse, AppError> {
    let user_id = claims.user_id()?;

    let available_balance = transactions::available_balance(&pool, user_id).await?;
    let invested_balance = subscriptions::invested_balance(&pool, user_id).await?;
    let total_performance = transactions::total_performance(&pool, user_id).await?;

    let summary = PortfolioSummary {
        available_balance,
        invested_balance,
        total_performance,
    };

    Ok(HttpResponse::Ok().json(AppSuccessResponse {
        success: true,
        data: summary,
        message: "Portfolio retrieved successfully".to_string(),
        pagination: None,
    }))
}
