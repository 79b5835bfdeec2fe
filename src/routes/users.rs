use crate::core::config::JwtAuthConfig;
use crate::core::jwt_auth::{generate_jwt_token, JwtClaims};
use crate::core::AppError;
use crate::core::{AppErrorResponse, AppSuccessResponse};
use crate::db::{admins, users};
use crate::models::users::{LoginRequest, LoginResponse, RegisterRequest, UserProfile};
use actix_web::{get, post, web, HttpResponse, Result};
use chrono::{Duration, Utc};
use sqlx::PgPool;
use validator::Validate;

#[tracing::instrument(name = "Register User", skip(pool, request))]
#[post("/register")]
pub async fn register(
    pool: web::Data<PgPool>,
    request: web::Json<RegisterRequest>,
) -> Result<HttpResponse, AppError> {
    // Payload shape first; only a well-formed request touches the database.
    if let Err(e) = request.validate() {
        return Err(AppError::bad_request(e));
    }

    if users::email_exists(&pool, &request.email).await? {
        return Ok(HttpResponse::BadRequest().json(AppErrorResponse {
            success: false,
            message: "A user with this email address already exists".to_string(),
        }));
    }

    let user = users::create_user(&pool, &request).await?;
    let user_profile = UserProfile::from(user);

    Ok(HttpResponse::Created().json(AppSuccessResponse {
        success: true,
        data: user_profile,
        message: "User registered successfully".to_string(),
        pagination: None,
    }))
}

#[tracing::instrument(name = "User Login", skip(pool, jwt_config, request))]
#[post("/login")]
pub async fn login(
    pool: web::Data<PgPool>,
    jwt_config: web::Data<JwtAuthConfig>,
    request: web::Json<LoginRequest>,
) -> Result<HttpResponse, AppError> {
    let user = match users::get_user_by_email(&pool, &request.email).await? {
        Some(user) => user,
        None => {
            return Ok(HttpResponse::Unauthorized().json(AppErrorResponse {
                success: false,
                message: "Email or password is incorrect".to_string(),
            }));
        }
    };

    if !users::verify_password(&request.password, &user.password_hash).await? {
        return Ok(HttpResponse::Unauthorized().json(AppErrorResponse {
            success: false,
            message: "Email or password is incorrect".to_string(),
        }));
    }

    let expires_at = Utc::now() + Duration::hours(jwt_config.token_expiration_hours);
    let claims = JwtClaims {
        sub: user.id.to_string(),
        email: user.email.clone(),
        exp: expires_at.timestamp() as usize,
    };

    let token = generate_jwt_token(&claims, &jwt_config)?;

    // UI hint only; every privileged handler re-checks the admins table.
    let is_admin = admins::is_admin(&pool, &user.email).await.unwrap_or(false);

    let response = LoginResponse {
        user: UserProfile::from(user),
        token,
        expires_at,
        is_admin,
    };

    Ok(HttpResponse::Ok().json(AppSuccessResponse {
        success: true,
        data: response,
        message: "Login successful".to_string(),
        pagination: None,
    }))
}

#[tracing::instrument(name = "Get User Profile", skip(pool, claims))]
#[get("/profile")]
pub async fn get_profile(
    pool: web::Data<PgPool>,
    claims: JwtClaims,
) -> Result<HttpResponse, AppError> {
    let user_id = claims.user_id()?;

    let user = users::get_user_by_id(&pool, user_id).await?;
    let user_profile = UserProfile::from(user);

    Ok(HttpResponse::Ok().json(AppSuccessResponse {
        success: true,
        data: user_profile,
        message: "Profile retrieved successfully".to_string(),
        pagination: None,
    }))
}
