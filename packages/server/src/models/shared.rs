use serde::{Deserialize, Serialize};

use crate::entity::user;
use crate::error::AppError;

/// Pagination metadata included in list responses.
#[derive(Serialize, utoipa::ToSchema)]
pub struct Pagination {
    /// Current page number (1-based).
    #[schema(example = 1)]
    pub page: u64,
    /// Number of items per page.
    #[schema(example = 20)]
    pub per_page: u64,
    /// Total number of matching items across all pages.
    #[schema(example = 47)]
    pub total: u64,
    /// Total number of pages.
    #[schema(example = 3)]
    pub total_pages: u64,
}

/// Page/per-page query parameters shared by the listings.
#[derive(Deserialize, utoipa::IntoParams)]
pub struct PageQuery {
    /// 1-based page number. Defaults to 1.
    pub page: Option<u64>,
    /// Items per page, 1-100. Defaults to 20.
    pub per_page: Option<u64>,
}

/// Pages past this are served as this page, keeping offsets within what
/// the database accepts.
const MAX_PAGE: u64 = 1_000_000;

impl PageQuery {
    pub fn resolve(&self) -> (u64, u64) {
        let page = self.page.unwrap_or(1).clamp(1, MAX_PAGE);
        let per_page = self.per_page.unwrap_or(20).clamp(1, 100);
        (page, per_page)
    }
}

/// Row offset of the first item on `page`.
pub fn page_offset(page: u64, per_page: u64) -> u64 {
    page.saturating_sub(1).saturating_mul(per_page)
}

impl Pagination {
    pub fn new(page: u64, per_page: u64, total: u64) -> Self {
        Self {
            page,
            per_page,
            total,
            total_pages: total.div_ceil(per_page),
        }
    }
}

/// A rendered affordance: a labelled request the viewer may make.
#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
pub struct Link {
    #[schema(example = "Delete")]
    pub label: String,
    #[schema(example = "DELETE")]
    pub method: &'static str,
    #[schema(example = "/posts/1")]
    pub href: String,
}

impl Link {
    pub fn get(label: impl Into<String>, href: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            method: "GET",
            href: href.into(),
        }
    }

    pub fn delete(label: impl Into<String>, href: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            method: "DELETE",
            href: href.into(),
        }
    }
}

/// Public view of a user, attached to the things they created.
#[derive(Serialize, utoipa::ToSchema)]
pub struct UserSummary {
    #[schema(example = 42)]
    pub id: i32,
    /// GitHub display name, falling back to the email address.
    #[schema(example = "Alice")]
    pub name: String,
}

impl From<&user::Model> for UserSummary {
    fn from(u: &user::Model) -> Self {
        Self {
            id: u.id,
            name: u
                .name
                .clone()
                .filter(|n| !n.trim().is_empty())
                .unwrap_or_else(|| u.email.clone()),
        }
    }
}

impl UserSummary {
    /// Placeholder for a creator row that could not be loaded.
    pub fn unknown(id: i32) -> Self {
        Self {
            id,
            name: "unknown".into(),
        }
    }
}

/// Description of an input form (`/new` and `/edit` pages).
#[derive(Serialize, utoipa::ToSchema)]
pub struct FormResponse {
    #[schema(example = "/posts")]
    pub action: String,
    #[schema(example = "POST")]
    pub method: &'static str,
    pub fields: Vec<FormField>,
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct FormField {
    #[schema(example = "title")]
    pub name: &'static str,
    #[schema(example = "Title")]
    pub label: &'static str,
    /// Current value on edit forms.
    pub value: Option<String>,
}

impl FormField {
    pub fn new(name: &'static str, label: &'static str, value: Option<String>) -> Self {
        Self { name, label, value }
    }
}

/// Validate a trimmed title (1-256 Unicode characters).
pub fn validate_title(title: &str) -> Result<(), AppError> {
    let title = title.trim();
    if title.is_empty() || title.chars().count() > 256 {
        return Err(AppError::Validation(
            "Title must be 1-256 characters".into(),
        ));
    }
    Ok(())
}

/// Validate a trimmed link (1-2048 characters). Links are free-form:
/// "www.google.com" is as acceptable as a full URL.
pub fn validate_link(link: &str) -> Result<(), AppError> {
    let link = link.trim();
    if link.is_empty() || link.chars().count() > 2048 {
        return Err(AppError::Validation("Link must be 1-2048 characters".into()));
    }
    Ok(())
}
