use serde::{Deserialize, Serialize};

/// Query string GitHub appends to the callback URL.
#[derive(Deserialize, utoipa::IntoParams)]
pub struct CallbackQuery {
    /// Authorization code to exchange.
    pub code: Option<String>,
    /// Anti-forgery value issued by `/auth/github`.
    pub state: Option<String>,
    /// Set when the user declined access.
    pub error: Option<String>,
}

/// Current authenticated user's profile.
#[derive(Serialize, utoipa::ToSchema)]
pub struct MeResponse {
    /// User ID.
    #[schema(example = 42)]
    pub id: i32,
    #[schema(example = 583231)]
    pub github_id: i64,
    #[schema(example = "alice@example.com")]
    pub email: String,
    #[schema(example = "Alice")]
    pub name: Option<String>,
    pub avatar_url: Option<String>,
    /// Posts created by the user.
    pub post_count: u64,
    /// Comments written by the user.
    pub comment_count: u64,
    /// Posts the user has liked.
    pub liked_post_count: u64,
    /// Likes other users gave to the user's posts.
    pub likes_received: u64,
}
