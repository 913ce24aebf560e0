/// Post handlers - HTTP endpoints for post operations
///
/// Create and update accept multipart form data so an image can ride along
/// with the text fields; everything else is JSON.
use crate::error::{AppError, Result};
use crate::handlers::comments::CommentResponse;
use crate::middleware::{AuthUser, MaybeUser};
use crate::models::{Author, Post};
use crate::services::{CommentService, EngagedPost, ImageStore, PostService};
use actix_multipart::form::{bytes::Bytes as UploadBytes, text::Text, MultipartForm};
use actix_web::{web, HttpResponse};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

#[derive(Debug, MultipartForm)]
pub struct CreatePostForm {
    pub title: Text<String>,
    pub content: Text<String>,
    #[multipart(limit = "5MiB")]
    pub image: Option<UploadBytes>,
}

#[derive(Debug, MultipartForm)]
pub struct UpdatePostForm {
    pub title: Option<Text<String>>,
    pub content: Option<Text<String>>,
    #[multipart(limit = "5MiB")]
    pub image: Option<UploadBytes>,
}

#[derive(Debug, Serialize)]
pub struct PostResponse {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub content: String,
    pub image_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub author: Author,
}

impl PostResponse {
    fn from_post(post: Post, author: Author) -> Self {
        Self {
            id: post.id,
            user_id: post.user_id,
            title: post.title,
            content: post.content,
            image_url: post.image_url,
            created_at: post.created_at,
            updated_at: post.updated_at,
            author,
        }
    }
}

/// A post annotated with engagement state for the requesting caller.
#[derive(Debug, Serialize)]
pub struct EngagedPostResponse {
    #[serde(flatten)]
    pub post: PostResponse,
    pub like_count: i64,
    pub comment_count: i64,
    pub is_liked: bool,
}

impl From<EngagedPost> for EngagedPostResponse {
    fn from(engaged: EngagedPost) -> Self {
        let row = engaged.post;
        let post = Post {
            id: row.id,
            user_id: row.user_id,
            title: row.title,
            content: row.content,
            image_url: row.image_url,
            created_at: row.created_at,
            updated_at: row.updated_at,
        };
        let author = Author {
            id: post.user_id,
            username: row.author_username,
        };

        Self {
            post: PostResponse::from_post(post, author),
            like_count: engaged.like_count,
            comment_count: engaged.comment_count,
            is_liked: engaged.is_liked,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct PostListResponse {
    pub posts: Vec<EngagedPostResponse>,
    pub total_posts: i64,
    pub current_page: i64,
    pub total_pages: i64,
}

#[derive(Debug, Serialize)]
pub struct PostDetailResponse {
    #[serde(flatten)]
    pub post: EngagedPostResponse,
    pub comments: Vec<CommentResponse>,
}

/// Pagination query parameters
#[derive(Debug, Deserialize)]
pub struct ListPostsQuery {
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

/// Upload an attached image, if storage is configured.
async fn upload_post_image(
    store: Option<&web::Data<ImageStore>>,
    owner_id: Uuid,
    image: UploadBytes,
) -> Result<String> {
    let store =
        store.ok_or_else(|| AppError::Validation("image uploads are not configured".to_string()))?;

    let file_name = image
        .file_name
        .clone()
        .unwrap_or_else(|| "upload".to_string());
    let content_type = image
        .content_type
        .as_ref()
        .map(|m| m.to_string())
        .unwrap_or_else(|| mime::APPLICATION_OCTET_STREAM.to_string());

    store
        .upload_image(owner_id, &file_name, &content_type, image.data.to_vec())
        .await
}

/// Create a new post
/// POST /posts
pub async fn create_post(
    pool: web::Data<PgPool>,
    store: Option<web::Data<ImageStore>>,
    user: AuthUser,
    MultipartForm(form): MultipartForm<CreatePostForm>,
) -> Result<HttpResponse> {
    let title = form.title.trim().to_string();
    let content = form.content.trim().to_string();
    if title.is_empty() || content.is_empty() {
        return Err(AppError::Validation(
            "post title and content are required".to_string(),
        ));
    }

    let image_url = match form.image {
        Some(image) => Some(upload_post_image(store.as_ref(), user.id, image).await?),
        None => None,
    };

    let service = PostService::new((**pool).clone());
    let post = service
        .create_post(user.id, &title, &content, image_url.as_deref())
        .await?;

    let author = Author {
        id: user.id,
        username: user.username.clone(),
    };

    Ok(HttpResponse::Created().json(PostResponse::from_post(post, author)))
}

/// List posts, newest first
/// GET /posts
pub async fn list_posts(
    pool: web::Data<PgPool>,
    user: MaybeUser,
    query: web::Query<ListPostsQuery>,
) -> Result<HttpResponse> {
    let page = query.page.unwrap_or(1).max(1);
    let limit = query.limit.unwrap_or(10).clamp(1, 100);
    let offset = (page - 1) * limit;
    let caller = user.0.as_ref().map(|identity| identity.id);

    let service = PostService::new((**pool).clone());
    let (posts, total) = service.list_posts(caller, limit, offset).await?;

    let total_pages = if total == 0 { 0 } else { (total + limit - 1) / limit };

    Ok(HttpResponse::Ok().json(PostListResponse {
        posts: posts.into_iter().map(EngagedPostResponse::from).collect(),
        total_posts: total,
        current_page: page,
        total_pages,
    }))
}

/// Fetch a single post with its comments
/// GET /posts/{id}
pub async fn get_post(
    pool: web::Data<PgPool>,
    user: MaybeUser,
    post_id: web::Path<Uuid>,
) -> Result<HttpResponse> {
    let caller = user.0.as_ref().map(|identity| identity.id);

    let post_service = PostService::new((**pool).clone());
    let comment_service = CommentService::new((**pool).clone());

    let engaged = post_service.get_post(*post_id, caller).await?;
    let comments = comment_service.list_comments(*post_id).await?;

    Ok(HttpResponse::Ok().json(PostDetailResponse {
        post: engaged.into(),
        comments: comments.into_iter().map(CommentResponse::from).collect(),
    }))
}

/// Apply a partial update to a post the caller owns
/// PUT /posts/{id}
pub async fn update_post(
    pool: web::Data<PgPool>,
    store: Option<web::Data<ImageStore>>,
    user: AuthUser,
    post_id: web::Path<Uuid>,
    MultipartForm(form): MultipartForm<UpdatePostForm>,
) -> Result<HttpResponse> {
    // Empty fields count as absent; any non-empty subset is a valid update.
    let title = form
        .title
        .as_ref()
        .map(|t| t.trim())
        .filter(|s| !s.is_empty())
        .map(|s| s.to_string());
    let content = form
        .content
        .as_ref()
        .map(|t| t.trim())
        .filter(|s| !s.is_empty())
        .map(|s| s.to_string());

    if title.is_none() && content.is_none() && form.image.is_none() {
        return Err(AppError::Validation(
            "updated title, content or image is required".to_string(),
        ));
    }

    let image_url = match form.image {
        Some(image) => Some(upload_post_image(store.as_ref(), user.id, image).await?),
        None => None,
    };

    let service = PostService::new((**pool).clone());
    let post = service
        .update_post(
            *post_id,
            user.id,
            title.as_deref(),
            content.as_deref(),
            image_url.as_deref(),
        )
        .await?;

    let author = Author {
        id: user.id,
        username: user.username.clone(),
    };

    Ok(HttpResponse::Ok().json(PostResponse::from_post(post, author)))
}

/// Delete a post the caller owns
/// DELETE /posts/{id}
pub async fn delete_post(
    pool: web::Data<PgPool>,
    user: AuthUser,
    post_id: web::Path<Uuid>,
) -> Result<HttpResponse> {
    let service = PostService::new((**pool).clone());
    service.delete_post(*post_id, user.id).await?;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": "post deleted successfully",
    })))
}
