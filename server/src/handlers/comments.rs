/// Comment handlers - HTTP endpoints for comment operations
use crate::error::{AppError, Result};
use crate::middleware::AuthUser;
use crate::models::{Author, Comment, CommentWithAuthor};
use crate::services::CommentService;
use actix_web::{web, HttpResponse};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Deserialize, Validate)]
pub struct CreateCommentRequest {
    pub post_id: Uuid,
    #[validate(length(min = 1, message = "comment content cannot be empty"))]
    pub content: String,
}

#[derive(Debug, Serialize)]
pub struct CommentResponse {
    pub id: Uuid,
    pub post_id: Uuid,
    pub user_id: Uuid,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub author: Author,
}

impl From<CommentWithAuthor> for CommentResponse {
    fn from(comment: CommentWithAuthor) -> Self {
        Self {
            id: comment.id,
            post_id: comment.post_id,
            user_id: comment.user_id,
            content: comment.content,
            created_at: comment.created_at,
            updated_at: comment.updated_at,
            author: Author {
                id: comment.user_id,
                username: comment.author_username,
            },
        }
    }
}

impl CommentResponse {
    fn from_comment(comment: Comment, author: Author) -> Self {
        Self {
            id: comment.id,
            post_id: comment.post_id,
            user_id: comment.user_id,
            content: comment.content,
            created_at: comment.created_at,
            updated_at: comment.updated_at,
            author,
        }
    }
}

/// Add a comment to a post
/// POST /comments
pub async fn add_comment(
    pool: web::Data<PgPool>,
    user: AuthUser,
    req: web::Json<CreateCommentRequest>,
) -> Result<HttpResponse> {
    req.validate()?;

    let content = req.content.trim();
    if content.is_empty() {
        return Err(AppError::Validation(
            "comment content cannot be empty".to_string(),
        ));
    }

    let service = CommentService::new((**pool).clone());
    let comment = service.add_comment(req.post_id, user.id, content).await?;

    let author = Author {
        id: user.id,
        username: user.username.clone(),
    };

    Ok(HttpResponse::Created().json(CommentResponse::from_comment(comment, author)))
}

/// List the comments on a post, oldest first
/// GET /posts/{id}/comments
pub async fn get_post_comments(
    pool: web::Data<PgPool>,
    post_id: web::Path<Uuid>,
) -> Result<HttpResponse> {
    let service = CommentService::new((**pool).clone());
    let comments = service.list_comments(*post_id).await?;

    let response: Vec<CommentResponse> = comments.into_iter().map(CommentResponse::from).collect();

    Ok(HttpResponse::Ok().json(response))
}

/// Delete a comment the caller owns
/// DELETE /comments/{id}
pub async fn delete_comment(
    pool: web::Data<PgPool>,
    user: AuthUser,
    comment_id: web::Path<Uuid>,
) -> Result<HttpResponse> {
    let service = CommentService::new((**pool).clone());
    service.delete_comment(*comment_id, user.id).await?;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": "comment deleted successfully",
    })))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_comment_request_rejects_empty_content() {
        let req = CreateCommentRequest {
            post_id: Uuid::new_v4(),
            content: String::new(),
        };
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_create_comment_request_accepts_content() {
        let req = CreateCommentRequest {
            post_id: Uuid::new_v4(),
            content: "nice post".to_string(),
        };
        assert!(req.validate().is_ok());
    }
}
