use serde::Serialize;

use super::shared::Link;

/// Landing page: navigation links for the visitor and any pending flash.
#[derive(Serialize, utoipa::ToSchema)]
pub struct HomeResponse {
    pub signed_in: bool,
    /// Email of the signed-in user.
    #[schema(example = "alice@example.com")]
    pub email: Option<String>,
    pub links: Vec<Link>,
    /// One-shot message from the previous action.
    #[schema(example = "Github log in failed")]
    pub flash: Option<String>,
}

impl HomeResponse {
    pub fn anonymous(flash: Option<&str>) -> Self {
        Self {
            signed_in: false,
            email: None,
            links: vec![Link::get("Sign in with Github", "/auth/github")],
            flash: flash.map(str::to_owned),
        }
    }

    pub fn signed_in(email: String, flash: Option<&str>) -> Self {
        Self {
            signed_in: true,
            email: Some(email),
            links: vec![
                Link::get("Resources", "/posts"),
                Link::get("Code Reviews", "/codereviews"),
                Link::delete("Sign out", "/auth/session"),
            ],
            flash: flash.map(str::to_owned),
        }
    }
}
