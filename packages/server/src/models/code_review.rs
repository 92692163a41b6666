use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::entity::code_review;
use crate::error::AppError;

pub use super::shared::Pagination;
use super::shared::{FormField, FormResponse, Link, UserSummary, validate_link};

/// Request body for asking for a code review.
#[derive(Deserialize, utoipa::ToSchema)]
pub struct CreateCodeReviewRequest {
    #[schema(example = "https://github.com/alice/bank-tech-test")]
    pub link: String,
}

pub fn validate_create_code_review(payload: &CreateCodeReviewRequest) -> Result<(), AppError> {
    validate_link(&payload.link)
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct CodeReviewResponse {
    pub id: i32,
    pub link: String,
    pub requester: UserSummary,
    pub created_at: DateTime<Utc>,
    /// Delete, present only for the requester.
    pub actions: Vec<Link>,
}

impl CodeReviewResponse {
    pub fn new(m: code_review::Model, requester: UserSummary, actions: Vec<Link>) -> Self {
        Self {
            id: m.id,
            link: m.link,
            requester,
            created_at: m.created_at,
            actions,
        }
    }
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct CodeReviewListResponse {
    pub data: Vec<CodeReviewResponse>,
    pub pagination: Pagination,
    /// E.g. "Duplicate Link" after a rejected submission.
    #[schema(example = "Duplicate Link")]
    pub flash: Option<String>,
}

pub fn new_code_review_form() -> FormResponse {
    FormResponse {
        action: "/codereviews".into(),
        method: "POST",
        fields: vec![FormField::new("link", "Link", None)],
    }
}
