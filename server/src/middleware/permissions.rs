/// Ownership policy
///
/// Only a resource's owner may mutate or delete it. Services call these
/// checks after looking a resource up and before touching the store; the
/// store-level write is additionally filtered by owner id, so a failed check
/// here and a zero-row write are the same outcome.
use crate::error::AppError;
use crate::models::{Comment, Post};
use uuid::Uuid;

/// Result type for permission checks
pub type PermissionResult = Result<(), AppError>;

/// Check if a user owns a post
pub fn check_post_ownership(user_id: Uuid, post: &Post) -> PermissionResult {
    if post.user_id == user_id {
        Ok(())
    } else {
        Err(AppError::Forbidden(
            "you can only modify your own posts".to_string(),
        ))
    }
}

/// Check if a user owns a comment
pub fn check_comment_ownership(user_id: Uuid, comment: &Comment) -> PermissionResult {
    if comment.user_id == user_id {
        Ok(())
    } else {
        Err(AppError::Forbidden(
            "you can only modify your own comments".to_string(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn post_owned_by(user_id: Uuid) -> Post {
        Post {
            id: Uuid::new_v4(),
            user_id,
            title: "title".to_string(),
            content: "content".to_string(),
            image_url: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn comment_owned_by(user_id: Uuid) -> Comment {
        Comment {
            id: Uuid::new_v4(),
            post_id: Uuid::new_v4(),
            user_id,
            content: "content".to_string(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_owner_may_mutate_post() {
        let owner = Uuid::new_v4();
        assert!(check_post_ownership(owner, &post_owned_by(owner)).is_ok());
    }

    #[test]
    fn test_non_owner_is_forbidden_from_post() {
        let owner = Uuid::new_v4();
        let other = Uuid::new_v4();
        let result = check_post_ownership(other, &post_owned_by(owner));
        assert!(matches!(result, Err(AppError::Forbidden(_))));
    }

    #[test]
    fn test_owner_may_mutate_comment() {
        let owner = Uuid::new_v4();
        assert!(check_comment_ownership(owner, &comment_owned_by(owner)).is_ok());
    }

    #[test]
    fn test_non_owner_is_forbidden_from_comment() {
        let owner = Uuid::new_v4();
        let other = Uuid::new_v4();
        let result = check_comment_ownership(other, &comment_owned_by(owner));
        assert!(matches!(result, Err(AppError::Forbidden(_))));
    }
}
