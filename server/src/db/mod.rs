/// Database access layer
///
/// One repository module per table. Repositories are plain async functions
/// over `&PgPool`; error mapping to HTTP lives in the service layer.
pub mod comment_repo;
pub mod like_repo;
pub mod post_repo;
pub mod user_repo;
