use actix_web::{dev::Payload, Error as ActixWebError};
use actix_web::{error::ErrorUnauthorized, http, web, FromRequest, HttpRequest};
use core::fmt;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};
use std::future::{ready, Ready};
use uuid::Uuid;

use crate::core::config::JwtAuthConfig;
use crate::core::AppError;

#[derive(Debug, Serialize)]
struct ErrorResponse {
    success: bool,
    message: String,
}

impl fmt::Display for ErrorResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", serde_json::to_string(&self).unwrap())
    }
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct JwtClaims {
    pub sub: String, // user ID
    pub email: String,
    pub exp: usize, // expiration time
}

impl JwtClaims {
    pub fn user_id(&self) -> Result<Uuid, AppError> {
        self.sub
            .parse()
            .map_err(|_| AppError::unauthorized("Invalid user ID in token"))
    }
}

pub fn generate_jwt_token(claims: &JwtClaims, config: &JwtAuthConfig) -> Result<String, AppError> {
    let header = Header::default();
    let encoding_key = EncodingKey::from_secret(config.secret.expose_secret().as_ref());

    encode(&header, claims, &encoding_key)
        .map_err(|_| AppError::internal_error("Failed to generate JWT token"))
}

impl FromRequest for JwtClaims {
    type Error = ActixWebError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        let config = match req.app_data::<web::Data<JwtAuthConfig>>() {
            Some(config) => config,
            None => {
                let error = ErrorResponse {
                    message: "Authentication is not configured".to_string(),
                    success: false,
                };
                return ready(Err(ErrorUnauthorized(error)));
            }
        };

        let token = req
            .headers()
            .get(http::header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.strip_prefix("Bearer "))
            .map(|value| value.to_string());

        let token = match token {
            Some(token) => token,
            None => {
                let error = ErrorResponse {
                    message: "Invalid login credentials".to_string(),
                    success: false,
                };
                return ready(Err(ErrorUnauthorized(error)));
            }
        };

        let claims = match decode::<JwtClaims>(
            &token,
            &DecodingKey::from_secret(config.secret.expose_secret().as_ref()),
            &Validation::default(),
        ) {
            Ok(c) => c.claims,
            Err(_) => {
                let error = ErrorResponse {
                    message: "Invalid token".to_string(),
                    success: false,
                };
                return ready(Err(ErrorUnauthorized(error)));
            }
        };

        ready(Ok(claims))
    }
}
