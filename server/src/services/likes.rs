/// Like service - the two-state toggle keyed by (caller, post)
use crate::db::{like_repo, post_repo};
use crate::error::{is_foreign_key_violation, is_unique_violation, AppError, Result};
use sqlx::PgPool;
use uuid::Uuid;

pub struct LikeService {
    pool: PgPool,
}

impl LikeService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Toggle the caller's like on a post
    ///
    /// An existing row is removed (`liked = false`); otherwise one is
    /// inserted (`liked = true`). Concurrent double-toggles race to
    /// last-writer-wins; the unique (post_id, user_id) key keeps the row
    /// count at zero or one either way.
    pub async fn toggle_like(&self, post_id: Uuid, user_id: Uuid) -> Result<bool> {
        if like_repo::like_exists(&self.pool, post_id, user_id).await? {
            like_repo::delete_like(&self.pool, post_id, user_id).await?;
            tracing::debug!(%post_id, %user_id, "post unliked");
            return Ok(false);
        }

        if !post_repo::post_exists(&self.pool, post_id).await? {
            return Err(AppError::NotFound(
                "post not found, cannot like".to_string(),
            ));
        }

        match like_repo::insert_like(&self.pool, post_id, user_id).await {
            Ok(_) => {
                tracing::debug!(%post_id, %user_id, "post liked");
                Ok(true)
            }
            // A concurrent toggle inserted the row first; the end state is
            // identical.
            Err(err) if is_unique_violation(&err) => Ok(true),
            // The post vanished between the check and the insert.
            Err(err) if is_foreign_key_violation(&err) => Err(AppError::NotFound(
                "post not found, cannot like".to_string(),
            )),
            Err(err) => Err(err.into()),
        }
    }
}
