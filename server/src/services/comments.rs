/// Comment service - creation, listing, deletion
use crate::db::{comment_repo, post_repo};
use crate::error::{is_foreign_key_violation, AppError, Result};
use crate::middleware::check_comment_ownership;
use crate::models::{Comment, CommentWithAuthor};
use sqlx::PgPool;
use uuid::Uuid;

pub struct CommentService {
    pool: PgPool,
}

impl CommentService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Add a comment to a post
    pub async fn add_comment(
        &self,
        post_id: Uuid,
        user_id: Uuid,
        content: &str,
    ) -> Result<Comment> {
        if !post_repo::post_exists(&self.pool, post_id).await? {
            return Err(AppError::NotFound(
                "post not found, cannot comment".to_string(),
            ));
        }

        comment_repo::create_comment(&self.pool, post_id, user_id, content)
            .await
            .map_err(|err| {
                // The post can vanish between the check and the insert; the
                // foreign key turns that race into a clean not-found.
                if is_foreign_key_violation(&err) {
                    AppError::NotFound("post not found, cannot comment".to_string())
                } else {
                    AppError::from(err)
                }
            })
    }

    /// All comments on a post with their authors, oldest first
    pub async fn list_comments(&self, post_id: Uuid) -> Result<Vec<CommentWithAuthor>> {
        Ok(comment_repo::list_comments_by_post(&self.pool, post_id).await?)
    }

    /// Delete a comment the caller owns
    pub async fn delete_comment(&self, comment_id: Uuid, caller: Uuid) -> Result<()> {
        let existing = comment_repo::find_comment_by_id(&self.pool, comment_id)
            .await?
            .ok_or_else(|| AppError::NotFound("comment not found".to_string()))?;
        check_comment_ownership(caller, &existing)?;

        let deleted = comment_repo::delete_comment(&self.pool, comment_id, caller).await?;
        if deleted == 0 {
            return Err(AppError::Forbidden(
                "you can only delete your own comments".to_string(),
            ));
        }

        tracing::info!(comment_id = %comment_id, user_id = %caller, "comment deleted");
        Ok(())
    }
}
