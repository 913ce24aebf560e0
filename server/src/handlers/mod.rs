/// HTTP request handlers
///
/// Request/response types live next to the handlers that use them and are
/// validated at the boundary before any business logic runs.
pub mod auth;
pub mod comments;
pub mod likes;
pub mod posts;

pub use auth::{login, me, register};
pub use comments::{add_comment, delete_comment, get_post_comments};
pub use likes::toggle_like;
pub use posts::{create_post, delete_post, get_post, list_posts, update_post};
