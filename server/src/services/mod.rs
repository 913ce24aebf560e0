/// Business logic layer
///
/// Services validate inputs, apply the ownership policy, and delegate to the
/// db layer. They are constructed per request from the shared pool.
pub mod auth;
pub mod comments;
pub mod likes;
pub mod posts;
pub mod storage;

pub use auth::AuthService;
pub use comments::CommentService;
pub use likes::LikeService;
pub use posts::{EngagedPost, PostService};
pub use storage::ImageStore;
