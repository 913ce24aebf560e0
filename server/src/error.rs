/// Error types for the ripple server
///
/// Every failure a handler can produce maps onto one of these variants, and
/// each variant maps onto exactly one HTTP status. Store-layer failures are
/// logged and surfaced as a generic 500 message; internal detail never
/// reaches the response body.
use actix_web::{error::ResponseError, http::StatusCode, HttpResponse};
use thiserror::Error;

/// Result type for server operations
pub type Result<T> = std::result::Result<T, AppError>;

#[derive(Debug, Error)]
pub enum AppError {
    /// Missing or malformed input (400)
    #[error("{0}")]
    Validation(String),

    /// No credential presented on a guarded endpoint (401)
    #[error("no token provided")]
    NoToken,

    /// Credential presented but past its expiry (401)
    #[error("token expired")]
    TokenExpired,

    /// Credential presented but signature or payload does not verify (401)
    #[error("invalid token")]
    InvalidToken,

    /// Login failed; deliberately identical for unknown email and wrong
    /// password (401)
    #[error("invalid credentials")]
    InvalidCredentials,

    /// Authenticated but not the owner of the resource (403)
    #[error("{0}")]
    Forbidden(String),

    /// Resource absent (404)
    #[error("{0}")]
    NotFound(String),

    /// Duplicate unique field (409)
    #[error("{0}")]
    Conflict(String),

    /// Unexpected failure from the persistence layer (500)
    #[error("internal server error")]
    Database(#[from] sqlx::Error),

    /// Any other unexpected failure (500)
    #[error("internal server error")]
    Internal(String),
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::NoToken
            | AppError::TokenExpired
            | AppError::InvalidToken
            | AppError::InvalidCredentials => StatusCode::UNAUTHORIZED,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Database(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        match self {
            AppError::Database(err) => tracing::error!("database error: {}", err),
            AppError::Internal(msg) => tracing::error!("internal error: {}", msg),
            _ => {}
        }

        HttpResponse::build(self.status_code()).json(serde_json::json!({
            "message": self.to_string(),
        }))
    }
}

impl From<auth_core::TokenError> for AppError {
    fn from(err: auth_core::TokenError) -> Self {
        match err {
            auth_core::TokenError::Expired => AppError::TokenExpired,
            auth_core::TokenError::Invalid => AppError::InvalidToken,
            auth_core::TokenError::Signing => AppError::Internal("token signing failed".to_string()),
        }
    }
}

impl From<auth_core::PasswordError> for AppError {
    fn from(err: auth_core::PasswordError) -> Self {
        AppError::Internal(err.to_string())
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(err: validator::ValidationErrors) -> Self {
        AppError::Validation(err.to_string())
    }
}

/// True for a Postgres unique-constraint violation (SQLSTATE 23505).
pub fn is_unique_violation(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(db) if db.code().as_deref() == Some("23505"))
}

/// True for a Postgres foreign-key violation (SQLSTATE 23503).
pub fn is_foreign_key_violation(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(db) if db.code().as_deref() == Some("23503"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes_match_taxonomy() {
        assert_eq!(
            AppError::Validation("bad".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(AppError::NoToken.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(AppError::TokenExpired.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(AppError::InvalidToken.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            AppError::InvalidCredentials.status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            AppError::Forbidden("nope".into()).status_code(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            AppError::NotFound("gone".into()).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            AppError::Conflict("dup".into()).status_code(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            AppError::Internal("boom".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_token_errors_keep_their_reason() {
        assert!(matches!(
            AppError::from(auth_core::TokenError::Expired),
            AppError::TokenExpired
        ));
        assert!(matches!(
            AppError::from(auth_core::TokenError::Invalid),
            AppError::InvalidToken
        ));
    }

    #[test]
    fn test_internal_errors_do_not_leak_detail() {
        let err = AppError::Internal("connection string contains password".into());
        assert_eq!(err.to_string(), "internal server error");
    }
}
