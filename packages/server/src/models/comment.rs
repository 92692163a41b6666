use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::entity::comment;
use crate::error::AppError;

use super::shared::{FormField, FormResponse, Link, UserSummary};

const MAX_BODY_LEN: usize = 10_000;

/// Request body for creating or editing a comment.
#[derive(Deserialize, utoipa::ToSchema)]
pub struct CommentRequest {
    #[schema(example = "Great resource, thanks!")]
    pub body: String,
}

pub fn validate_comment(payload: &CommentRequest) -> Result<(), AppError> {
    let body = payload.body.trim();
    if body.is_empty() || body.chars().count() > MAX_BODY_LEN {
        return Err(AppError::Validation(format!(
            "Comment must be 1-{MAX_BODY_LEN} characters"
        )));
    }
    Ok(())
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct CommentResponse {
    pub id: i32,
    pub body: String,
    pub post_id: i32,
    pub creator: UserSummary,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Always "Edit Comment" and "Delete Comment"; the server refuses
    /// non-creators when they are used.
    pub actions: Vec<Link>,
}

impl CommentResponse {
    pub fn new(m: comment::Model, creator: UserSummary, actions: Vec<Link>) -> Self {
        Self {
            id: m.id,
            body: m.body,
            post_id: m.post_id,
            creator,
            created_at: m.created_at,
            updated_at: m.updated_at,
            actions,
        }
    }
}

pub fn edit_comment_form(m: &comment::Model) -> FormResponse {
    FormResponse {
        action: format!("/posts/{}/comments/{}", m.post_id, m.id),
        method: "PATCH",
        fields: vec![FormField::new("body", "Comment", Some(m.body.clone()))],
    }
}
