use crate::models::{Post, PostWithAuthor};
use sqlx::PgPool;
use uuid::Uuid;

/// Create a new post
pub async fn create_post(
    pool: &PgPool,
    user_id: Uuid,
    title: &str,
    content: &str,
    image_url: Option<&str>,
) -> Result<Post, sqlx::Error> {
    let post = sqlx::query_as::<_, Post>(
        r#"
        INSERT INTO posts (user_id, title, content, image_url)
        VALUES ($1, $2, $3, $4)
        RETURNING id, user_id, title, content, image_url, created_at, updated_at
        "#,
    )
    .bind(user_id)
    .bind(title)
    .bind(content)
    .bind(image_url)
    .fetch_one(pool)
    .await?;

    Ok(post)
}

/// Find a post by ID
pub async fn find_post_by_id(pool: &PgPool, post_id: Uuid) -> Result<Option<Post>, sqlx::Error> {
    let post = sqlx::query_as::<_, Post>(
        r#"
        SELECT id, user_id, title, content, image_url, created_at, updated_at
        FROM posts
        WHERE id = $1
        "#,
    )
    .bind(post_id)
    .fetch_optional(pool)
    .await?;

    Ok(post)
}

/// Find a post by ID, joined with its author's username
pub async fn find_post_with_author(
    pool: &PgPool,
    post_id: Uuid,
) -> Result<Option<PostWithAuthor>, sqlx::Error> {
    let post = sqlx::query_as::<_, PostWithAuthor>(
        r#"
        SELECT p.id, p.user_id, p.title, p.content, p.image_url, p.created_at, p.updated_at,
               u.username AS author_username
        FROM posts p
        JOIN users u ON u.id = p.user_id
        WHERE p.id = $1
        "#,
    )
    .bind(post_id)
    .fetch_optional(pool)
    .await?;

    Ok(post)
}

/// Fetch one page of posts with authors, newest first
pub async fn find_posts_page(
    pool: &PgPool,
    limit: i64,
    offset: i64,
) -> Result<Vec<PostWithAuthor>, sqlx::Error> {
    let posts = sqlx::query_as::<_, PostWithAuthor>(
        r#"
        SELECT p.id, p.user_id, p.title, p.content, p.image_url, p.created_at, p.updated_at,
               u.username AS author_username
        FROM posts p
        JOIN users u ON u.id = p.user_id
        ORDER BY p.created_at DESC
        LIMIT $1 OFFSET $2
        "#,
    )
    .bind(limit)
    .bind(offset)
    .fetch_all(pool)
    .await?;

    Ok(posts)
}

/// Count all posts
pub async fn count_posts(pool: &PgPool) -> Result<i64, sqlx::Error> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM posts")
        .fetch_one(pool)
        .await?;

    Ok(count)
}

/// Check whether a post exists
pub async fn post_exists(pool: &PgPool, post_id: Uuid) -> Result<bool, sqlx::Error> {
    let exists: bool = sqlx::query_scalar(
        r#"
        SELECT EXISTS(SELECT 1 FROM posts WHERE id = $1)
        "#,
    )
    .bind(post_id)
    .fetch_one(pool)
    .await?;

    Ok(exists)
}

/// Apply a partial update to a post, filtered by owner id
///
/// Absent fields keep their current value. Returns `None` when no row
/// matched the (id, owner) pair.
pub async fn update_post(
    pool: &PgPool,
    post_id: Uuid,
    owner_id: Uuid,
    title: Option<&str>,
    content: Option<&str>,
    image_url: Option<&str>,
) -> Result<Option<Post>, sqlx::Error> {
    let post = sqlx::query_as::<_, Post>(
        r#"
        UPDATE posts
        SET title = COALESCE($3, title),
            content = COALESCE($4, content),
            image_url = COALESCE($5, image_url),
            updated_at = NOW()
        WHERE id = $1 AND user_id = $2
        RETURNING id, user_id, title, content, image_url, created_at, updated_at
        "#,
    )
    .bind(post_id)
    .bind(owner_id)
    .bind(title)
    .bind(content)
    .bind(image_url)
    .fetch_optional(pool)
    .await?;

    Ok(post)
}

/// Delete a post, filtered by owner id; the store cascades to comments and
/// likes. Returns the number of rows removed.
pub async fn delete_post(pool: &PgPool, post_id: Uuid, owner_id: Uuid) -> Result<u64, sqlx::Error> {
    let result = sqlx::query(
        r#"
        DELETE FROM posts
        WHERE id = $1 AND user_id = $2
        "#,
    )
    .bind(post_id)
    .bind(owner_id)
    .execute(pool)
    .await?;

    Ok(result.rows_affected())
}
