use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::entity::post;
use crate::error::AppError;
use crate::utils::tags::parse_tags;

pub use super::shared::{Pagination, validate_link, validate_title};
use super::comment::CommentResponse;
use super::shared::{FormField, FormResponse, Link, PageQuery, UserSummary};

const MAX_TAGS_LEN: usize = 512;

/// Request body for creating a post.
#[derive(Deserialize, utoipa::ToSchema)]
pub struct CreatePostRequest {
    #[schema(example = "Ultimate Resource")]
    pub title: String,
    #[schema(example = "www.google.com")]
    pub link: String,
    /// Comma-separated tags, stored as typed.
    #[serde(default)]
    #[schema(example = "ruby, makers, beginner")]
    pub tags: String,
}

pub fn validate_create_post(payload: &CreatePostRequest) -> Result<(), AppError> {
    validate_title(&payload.title)?;
    validate_link(&payload.link)?;
    validate_tags(&payload.tags)
}

/// Partial update; absent fields are left unchanged.
#[derive(Deserialize, Default, PartialEq, utoipa::ToSchema)]
pub struct UpdatePostRequest {
    #[schema(example = "Title has been changed")]
    pub title: Option<String>,
    pub link: Option<String>,
    pub tags: Option<String>,
}

pub fn validate_update_post(payload: &UpdatePostRequest) -> Result<(), AppError> {
    if let Some(ref title) = payload.title {
        validate_title(title)?;
    }
    if let Some(ref link) = payload.link {
        validate_link(link)?;
    }
    if let Some(ref tags) = payload.tags {
        validate_tags(tags)?;
    }
    Ok(())
}

fn validate_tags(tags: &str) -> Result<(), AppError> {
    if tags.trim().chars().count() > MAX_TAGS_LEN {
        return Err(AppError::Validation(format!(
            "Tags must be at most {MAX_TAGS_LEN} characters"
        )));
    }
    Ok(())
}

#[derive(Deserialize, utoipa::IntoParams)]
pub struct PostListQuery {
    /// 1-based page number. Defaults to 1.
    pub page: Option<u64>,
    /// Items per page, 1-100. Defaults to 20.
    pub per_page: Option<u64>,
    /// Only posts carrying this tag (case-insensitive).
    pub tag: Option<String>,
}

impl PostListQuery {
    pub fn resolve_page(&self) -> (u64, u64) {
        PageQuery {
            page: self.page,
            per_page: self.per_page,
        }
        .resolve()
    }
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct PostResponse {
    pub id: i32,
    pub title: String,
    pub link: String,
    /// Tags exactly as entered.
    pub tags: String,
    /// Normalised tag names.
    pub tag_list: Vec<String>,
    pub user_id: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Edit/Delete, present only for the creator.
    pub actions: Vec<Link>,
}

impl PostResponse {
    pub fn new(m: post::Model, actions: Vec<Link>) -> Self {
        Self {
            tag_list: parse_tags(&m.tags),
            id: m.id,
            title: m.title,
            link: m.link,
            tags: m.tags,
            user_id: m.user_id,
            created_at: m.created_at,
            updated_at: m.updated_at,
            actions,
        }
    }
}

/// One row of the resources listing.
#[derive(Serialize, utoipa::ToSchema)]
pub struct PostListItem {
    #[serde(flatten)]
    pub post: PostResponse,
    pub creator: UserSummary,
    pub like_count: u64,
    pub comment_count: u64,
    /// Whether the viewer has liked this post.
    pub liked: bool,
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct PostListResponse {
    pub data: Vec<PostListItem>,
    pub pagination: Pagination,
}

/// A post with its discussion.
#[derive(Serialize, utoipa::ToSchema)]
pub struct PostDetailResponse {
    #[serde(flatten)]
    pub item: PostListItem,
    /// Oldest first.
    pub comments: Vec<CommentResponse>,
}

pub fn new_post_form() -> FormResponse {
    FormResponse {
        action: "/posts".into(),
        method: "POST",
        fields: vec![
            FormField::new("title", "Title", None),
            FormField::new("link", "Link", None),
            FormField::new("tags", "Tags", None),
        ],
    }
}

pub fn edit_post_form(m: &post::Model) -> FormResponse {
    FormResponse {
        action: format!("/posts/{}", m.id),
        method: "PATCH",
        fields: vec![
            FormField::new("title", "Title", Some(m.title.clone())),
            FormField::new("link", "Link", Some(m.link.clone())),
            FormField::new("tags", "Tags", Some(m.tags.clone())),
        ],
    }
}
