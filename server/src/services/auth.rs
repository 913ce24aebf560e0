/// Authentication service - registration, login, current-user lookup
use crate::db::user_repo;
use crate::error::{is_unique_violation, AppError, Result};
use crate::models::User;
use auth_core::{hash_password, verify_password, Identity, TokenCodec};
use sqlx::PgPool;
use std::sync::Arc;
use uuid::Uuid;

pub struct AuthService {
    pool: PgPool,
    codec: Arc<TokenCodec>,
}

impl AuthService {
    pub fn new(pool: PgPool, codec: Arc<TokenCodec>) -> Self {
        Self { pool, codec }
    }

    /// Register a new account
    pub async fn register(&self, email: &str, username: &str, password: &str) -> Result<User> {
        if user_repo::email_or_username_exists(&self.pool, email, username).await? {
            return Err(AppError::Conflict(
                "email or username already exists".to_string(),
            ));
        }

        let password_hash = hash_password(password)?;

        let user = user_repo::create_user(&self.pool, email, username, &password_hash)
            .await
            .map_err(|err| {
                // Two concurrent registrations can both pass the pre-check;
                // the unique constraints settle the race.
                if is_unique_violation(&err) {
                    AppError::Conflict("email or username already exists".to_string())
                } else {
                    AppError::from(err)
                }
            })?;

        tracing::info!(user_id = %user.id, "user registered");
        Ok(user)
    }

    /// Log a user in, returning the account row and a fresh token
    ///
    /// Unknown email and wrong password collapse into the same error so the
    /// response does not reveal which emails are registered.
    pub async fn login(&self, email: &str, password: &str) -> Result<(User, String)> {
        let user = user_repo::find_user_by_email(&self.pool, email)
            .await?
            .ok_or(AppError::InvalidCredentials)?;

        if !verify_password(password, &user.password_hash)? {
            return Err(AppError::InvalidCredentials);
        }

        let token = self.codec.issue(&Identity {
            id: user.id,
            email: user.email.clone(),
            username: user.username.clone(),
        })?;

        tracing::info!(user_id = %user.id, "user logged in");
        Ok((user, token))
    }

    /// Load the authenticated caller's account row
    pub async fn me(&self, user_id: Uuid) -> Result<User> {
        user_repo::find_user_by_id(&self.pool, user_id)
            .await?
            .ok_or_else(|| AppError::NotFound("user not found".to_string()))
    }
}
