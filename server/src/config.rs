/// Configuration management for the ripple server
///
/// This module handles loading and managing configuration from environment
/// variables.
use serde::{Deserialize, Serialize};

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Application settings
    pub app: AppConfig,
    /// CORS configuration
    pub cors: CorsConfig,
    /// Database configuration
    pub database: DatabaseConfig,
    /// Token issuance configuration
    pub auth: AuthConfig,
    /// Object storage configuration; image uploads are rejected when absent
    pub storage: Option<StorageConfig>,
}

/// Application settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Application environment (development, staging, production)
    pub env: String,
    /// Server host to bind to
    pub host: String,
    /// Server port to bind to
    pub port: u16,
}

/// CORS configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorsConfig {
    /// Comma-separated list of allowed origins
    pub allowed_origins: String,
}

/// Database configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// Database URL
    pub url: String,
    /// Max connections in pool
    pub max_connections: u32,
}

/// Token issuance configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Process-wide signing secret; rotating it invalidates all outstanding
    /// tokens
    pub jwt_secret: String,
    /// Token lifetime in days
    pub token_ttl_days: i64,
}

/// Object storage configuration (any S3-compatible endpoint)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Bucket receiving image uploads
    pub bucket: String,
    /// Key prefix under the bucket
    pub key_prefix: String,
    /// Base URL from which uploaded objects are publicly retrievable
    pub public_base_url: String,
    /// Custom endpoint for S3-compatible providers
    pub endpoint: Option<String>,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, String> {
        let app_env = std::env::var("APP_ENV").unwrap_or_else(|_| "development".to_string());

        Ok(Config {
            app: AppConfig {
                env: app_env.clone(),
                host: std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
                port: std::env::var("PORT")
                    .ok()
                    .and_then(|p| p.parse().ok())
                    .unwrap_or(8080),
            },
            cors: {
                let allowed_origins = match std::env::var("CORS_ALLOWED_ORIGINS") {
                    Ok(value) => value,
                    Err(_) if app_env.eq_ignore_ascii_case("production") => {
                        return Err("CORS_ALLOWED_ORIGINS must be set in production".to_string())
                    }
                    Err(_) => "http://localhost:3000".to_string(),
                };

                if app_env.eq_ignore_ascii_case("production") && allowed_origins.trim() == "*" {
                    return Err("CORS_ALLOWED_ORIGINS cannot be '*' in production".to_string());
                }

                CorsConfig { allowed_origins }
            },
            database: DatabaseConfig {
                url: std::env::var("DATABASE_URL")
                    .unwrap_or_else(|_| "postgresql://localhost/ripple".to_string()),
                max_connections: std::env::var("DATABASE_MAX_CONNECTIONS")
                    .ok()
                    .and_then(|c| c.parse().ok())
                    .unwrap_or(10),
            },
            auth: {
                let jwt_secret = match std::env::var("JWT_SECRET") {
                    Ok(value) if !value.trim().is_empty() => value,
                    _ if app_env.eq_ignore_ascii_case("production") => {
                        return Err("JWT_SECRET must be set in production".to_string())
                    }
                    _ => "dev-only-secret".to_string(),
                };

                AuthConfig {
                    jwt_secret,
                    token_ttl_days: std::env::var("TOKEN_TTL_DAYS")
                        .ok()
                        .and_then(|v| v.parse().ok())
                        .unwrap_or(auth_core::jwt::DEFAULT_TOKEN_TTL_DAYS),
                }
            },
            storage: match std::env::var("STORAGE_BUCKET") {
                Ok(bucket) => {
                    let public_base_url = std::env::var("STORAGE_PUBLIC_URL").map_err(|_| {
                        "STORAGE_PUBLIC_URL must be set when STORAGE_BUCKET is".to_string()
                    })?;

                    Some(StorageConfig {
                        bucket,
                        key_prefix: std::env::var("STORAGE_KEY_PREFIX")
                            .unwrap_or_else(|_| "images".to_string()),
                        public_base_url: public_base_url.trim_end_matches('/').to_string(),
                        endpoint: std::env::var("STORAGE_ENDPOINT").ok(),
                    })
                }
                Err(_) => None,
            },
        })
    }
}
