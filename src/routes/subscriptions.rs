use crate::core::jwt_auth::JwtClaims;
use crate::core::AppError;
use crate::core::{AppErrorResponse, AppSuccessResponse};
use crate::db::{plans, subscriptions};
use crate::models::subscriptions::SubscribeRequest;
use actix_web::{get, post, web, HttpResponse, Result};
use bigdecimal::BigDecimal;
use sqlx::PgPool;

#[tracing::instrument(name = "Subscribe To Plan", skip(pool, claims, request))]
#[post("/subscribe")]
pub async fn subscribe(
    pool: web::Data<PgPool>,
    claims: JwtClaims,
    request: web::Json<SubscribeRequest>,
) -> Result<HttpResponse, AppError> {
    let user_id = claims.user_id()?;

    let plan = plans::get_plan_by_id(&pool, request.plan_id)
        .await?
        .ok_or_else(|| AppError::bad_request("Invalid plan ID"))?;

    if !meets_minimum(&request.amount, &plan.min_amount) {
        return Ok(HttpResponse::BadRequest().json(AppErrorResponse {
            success: false,
            message: format!("Minimum amount for this plan is {}", plan.min_amount),
        }));
    }

    // Committed capital comes from external funds: no ledger debit here.
    // Available and invested balances are reported side by side.
    let subscription = subscriptions::create_subscription(
        &pool,
        user_id,
        plan.id,
        plan.duration_days,
        &request.amount,
    )
    .await?;

    Ok(HttpResponse::Created().json(AppSuccessResponse {
        success: true,
        data: subscription,
        message: "Subscription created successfully".to_string(),
        pagination: None,
    }))
}

#[tracing::instrument(name = "Get My Subscriptions", skip(pool, claims))]
#[get("")]
pub async fn get_my_subscriptions(
    pool: web::Data<PgPool>,
    claims: JwtClaims,
) -> Result<HttpResponse, AppError> {
    let user_id = claims.user_id()?;

    let subscriptions = subscriptions::get_user_subscriptions_with_plans(&pool, user_id).await?;

    Ok(HttpResponse::Ok().json(AppSuccessResponse {
        success: true,
        data: subscriptions,
        message: "Subscriptions retrieved successfully".to_string(),
        pagination: None,
    }))
}

fn meets_minimum(amount: &BigDecimal, min_amount: &BigDecimal) -> bool {
    amount >= min_amount && amount > &BigDecimal::from(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn exactly_the_minimum_is_accepted() {
        let min = BigDecimal::from(500);
        assert!(meets_minimum(&BigDecimal::from(500), &min));
    }

    #[test]
    fn below_the_minimum_is_rejected() {
        let min = BigDecimal::from(500);
        assert!(!meets_minimum(&BigDecimal::from_str("499.99").unwrap(), &min));
        assert!(!meets_minimum(&BigDecimal::from(0), &min));
        assert!(!meets_minimum(&BigDecimal::from(-500), &min));
    }

    #[test]
    fn above_the_minimum_is_accepted() {
        let min = BigDecimal::from(500);
        assert!(meets_minimum(&BigDecimal::from(501), &min));
    }
}
