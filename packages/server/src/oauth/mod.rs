//! Third-party identity providers.
//!
//! The OAuth handshake is delegated to an [`IdentityProvider`]. Production
//! uses [`github::GithubProvider`]; tests plug in a stub.

pub mod github;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Identity claim returned by the provider after a successful handshake.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OAuthAssertion {
    /// Provider-side account id.
    pub provider_id: i64,
    /// `None` when the account exposes no usable email.
    pub email: Option<String>,
    pub name: Option<String>,
    pub avatar_url: Option<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum OAuthError {
    #[error("request to identity provider failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("identity provider returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("identity provider rejected the authorization code: {0}")]
    Rejected(String),

    #[error("invalid provider URL: {0}")]
    InvalidUrl(String),
}

#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// URL the visitor is redirected to in order to start the handshake.
    fn authorize_url(&self, state: &str) -> Result<String, OAuthError>;

    /// Exchange an authorization code for the visitor's identity.
    async fn exchange(&self, code: &str) -> Result<OAuthAssertion, OAuthError>;
}
