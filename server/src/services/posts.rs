/// Post service - creation, listing, detail, update, delete
use crate::db::{comment_repo, like_repo, post_repo};
use crate::error::{AppError, Result};
use crate::middleware::check_post_ownership;
use crate::models::{Post, PostWithAuthor};
use futures::future::try_join_all;
use futures::try_join;
use sqlx::PgPool;
use uuid::Uuid;

/// A post joined with its author and annotated with engagement state for one
/// caller. `is_liked` is always false for anonymous callers.
pub struct EngagedPost {
    pub post: PostWithAuthor,
    pub like_count: i64,
    pub comment_count: i64,
    pub is_liked: bool,
}

pub struct PostService {
    pool: PgPool,
}

impl PostService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a new post owned by the caller
    pub async fn create_post(
        &self,
        user_id: Uuid,
        title: &str,
        content: &str,
        image_url: Option<&str>,
    ) -> Result<Post> {
        let post = post_repo::create_post(&self.pool, user_id, title, content, image_url).await?;

        tracing::info!(post_id = %post.id, user_id = %user_id, "post created");
        Ok(post)
    }

    /// One page of posts, newest first, each annotated with counts and the
    /// caller's like status
    pub async fn list_posts(
        &self,
        caller: Option<Uuid>,
        limit: i64,
        offset: i64,
    ) -> Result<(Vec<EngagedPost>, i64)> {
        let (posts, total) = try_join!(
            post_repo::find_posts_page(&self.pool, limit, offset),
            post_repo::count_posts(&self.pool),
        )?;

        let annotated =
            try_join_all(posts.into_iter().map(|post| self.annotate(post, caller))).await?;

        Ok((annotated, total))
    }

    /// Fetch a single post with engagement annotations
    pub async fn get_post(&self, post_id: Uuid, caller: Option<Uuid>) -> Result<EngagedPost> {
        let post = post_repo::find_post_with_author(&self.pool, post_id)
            .await?
            .ok_or_else(|| AppError::NotFound("post not found".to_string()))?;

        self.annotate(post, caller).await
    }

    /// Attach like/comment counts and the caller's like flag to a post row.
    /// The three lookups are independent reads and run concurrently.
    async fn annotate(&self, post: PostWithAuthor, caller: Option<Uuid>) -> Result<EngagedPost> {
        let likes = like_repo::count_likes_by_post(&self.pool, post.id);
        let comments = comment_repo::count_comments_by_post(&self.pool, post.id);
        let liked = async {
            match caller {
                Some(user_id) => like_repo::like_exists(&self.pool, post.id, user_id).await,
                None => Ok(false),
            }
        };

        let (like_count, comment_count, is_liked) = try_join!(likes, comments, liked)?;

        Ok(EngagedPost {
            post,
            like_count,
            comment_count,
            is_liked,
        })
    }

    /// Apply a partial update to a post the caller owns
    pub async fn update_post(
        &self,
        post_id: Uuid,
        caller: Uuid,
        title: Option<&str>,
        content: Option<&str>,
        image_url: Option<&str>,
    ) -> Result<Post> {
        let existing = post_repo::find_post_by_id(&self.pool, post_id)
            .await?
            .ok_or_else(|| AppError::NotFound("post not found".to_string()))?;
        check_post_ownership(caller, &existing)?;

        // The write itself is filtered by owner; a row that slipped away
        // between check and write reads as zero rows affected.
        post_repo::update_post(&self.pool, post_id, caller, title, content, image_url)
            .await?
            .ok_or_else(|| AppError::Forbidden("you can only modify your own posts".to_string()))
    }

    /// Delete a post the caller owns; the store cascades to its comments and
    /// likes
    pub async fn delete_post(&self, post_id: Uuid, caller: Uuid) -> Result<()> {
        let existing = post_repo::find_post_by_id(&self.pool, post_id)
            .await?
            .ok_or_else(|| AppError::NotFound("post not found".to_string()))?;
        check_post_ownership(caller, &existing)?;

        let deleted = post_repo::delete_post(&self.pool, post_id, caller).await?;
        if deleted == 0 {
            return Err(AppError::Forbidden(
                "you can only delete your own posts".to_string(),
            ));
        }

        tracing::info!(post_id = %post_id, user_id = %caller, "post deleted");
        Ok(())
    }
}
