/// Auth handlers - registration, login, current user
use crate::error::Result;
use crate::middleware::{AuthUser, TOKEN_COOKIE};
use crate::models::User;
use crate::services::AuthService;
use actix_web::cookie::Cookie;
use actix_web::{web, HttpResponse};
use auth_core::TokenCodec;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(custom(function = crate::validators::validate_email_shape))]
    pub email: String,
    #[validate(custom(function = crate::validators::validate_username_shape))]
    pub username: String,
    #[validate(length(min = 8, max = 72, message = "password must be 8-72 characters"))]
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub id: Uuid,
    pub email: String,
    pub username: String,
    pub created_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            email: user.email,
            username: user.username,
            created_at: user.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct RegisterResponse {
    pub message: String,
    pub user: UserResponse,
}

#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(custom(function = crate::validators::validate_email_shape))]
    pub email: String,
    #[validate(length(min = 1, message = "password is required"))]
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub id: Uuid,
    pub email: String,
    pub username: String,
    pub token: String,
}

/// Register a new user
/// POST /auth/register
pub async fn register(
    pool: web::Data<PgPool>,
    codec: web::Data<TokenCodec>,
    req: web::Json<RegisterRequest>,
) -> Result<HttpResponse> {
    req.validate()?;

    let service = AuthService::new((**pool).clone(), codec.clone().into_inner());
    let user = service
        .register(&req.email, &req.username, &req.password)
        .await?;

    Ok(HttpResponse::Created().json(RegisterResponse {
        message: "user registered successfully".to_string(),
        user: user.into(),
    }))
}

/// Log a user in and issue a token
/// POST /auth/login
///
/// The token is returned in the body for API clients and mirrored into an
/// HTTP-only cookie for server-rendered navigation.
pub async fn login(
    pool: web::Data<PgPool>,
    codec: web::Data<TokenCodec>,
    req: web::Json<LoginRequest>,
) -> Result<HttpResponse> {
    req.validate()?;

    let service = AuthService::new((**pool).clone(), codec.clone().into_inner());
    let (user, token) = service.login(&req.email, &req.password).await?;

    let cookie = Cookie::build(TOKEN_COOKIE, token.clone())
        .http_only(true)
        .path("/")
        .finish();

    Ok(HttpResponse::Ok().cookie(cookie).json(LoginResponse {
        id: user.id,
        email: user.email,
        username: user.username,
        token,
    }))
}

/// Return the authenticated caller's profile
/// GET /auth/me
pub async fn me(
    pool: web::Data<PgPool>,
    codec: web::Data<TokenCodec>,
    user: AuthUser,
) -> Result<HttpResponse> {
    let service = AuthService::new((**pool).clone(), codec.clone().into_inner());
    let profile = service.me(user.id).await?;

    Ok(HttpResponse::Ok().json(UserResponse::from(profile)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_request_accepts_valid_input() {
        let req = RegisterRequest {
            email: "user@example.com".to_string(),
            username: "john_doe".to_string(),
            password: "SecurePass123!".to_string(),
        };
        assert!(req.validate().is_ok());
    }

    #[test]
    fn test_register_request_rejects_bad_email() {
        let req = RegisterRequest {
            email: "not-an-email".to_string(),
            username: "john_doe".to_string(),
            password: "SecurePass123!".to_string(),
        };
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_register_request_rejects_bad_username() {
        let req = RegisterRequest {
            email: "user@example.com".to_string(),
            username: "no spaces allowed".to_string(),
            password: "SecurePass123!".to_string(),
        };
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_register_request_rejects_short_password() {
        let req = RegisterRequest {
            email: "user@example.com".to_string(),
            username: "john_doe".to_string(),
            password: "short".to_string(),
        };
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_login_request_requires_password() {
        let req = LoginRequest {
            email: "user@example.com".to_string(),
            password: String::new(),
        };
        assert!(req.validate().is_err());
    }
}
