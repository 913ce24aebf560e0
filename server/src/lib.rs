/// Ripple Server Library
///
/// A social feed backend: registration/login, text+image posts, comments and
/// likes over PostgreSQL, with S3-compatible object storage for images.
///
/// # Modules
///
/// - `handlers`: HTTP request handlers and their request/response types
/// - `models`: Row types for users, posts, comments, likes
/// - `services`: Business logic layer
/// - `db`: Database access layer, one repository module per table
/// - `middleware`: Authorization guard extractors and ownership checks
/// - `error`: Error types and HTTP mapping
/// - `config`: Configuration management
pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod openapi;
pub mod services;
pub mod validators;

pub use config::Config;
pub use error::{AppError, Result};
