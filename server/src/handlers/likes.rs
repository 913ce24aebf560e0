/// Like handlers - the toggle endpoint
use crate::error::Result;
use crate::middleware::AuthUser;
use crate::services::LikeService;
use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

#[derive(Debug, Deserialize)]
pub struct ToggleLikeRequest {
    pub post_id: Uuid,
}

#[derive(Debug, Serialize)]
pub struct ToggleLikeResponse {
    pub message: String,
    pub liked: bool,
}

/// Toggle the caller's like on a post
/// POST /likes
///
/// 201 when the toggle created a like, 200 when it removed one.
pub async fn toggle_like(
    pool: web::Data<PgPool>,
    user: AuthUser,
    req: web::Json<ToggleLikeRequest>,
) -> Result<HttpResponse> {
    let service = LikeService::new((**pool).clone());
    let liked = service.toggle_like(req.post_id, user.id).await?;

    let response = ToggleLikeResponse {
        message: if liked { "post liked" } else { "post unliked" }.to_string(),
        liked,
    };

    if liked {
        Ok(HttpResponse::Created().json(response))
    } else {
        Ok(HttpResponse::Ok().json(response))
    }
}
