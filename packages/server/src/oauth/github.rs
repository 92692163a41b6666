use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{ACCEPT, AUTHORIZATION};
use reqwest::{Client, Response, Url};
use serde::Deserialize;
use tracing::{debug, instrument};

use super::{IdentityProvider, OAuthAssertion, OAuthError};
use crate::config::GithubConfig;

/// Scope needed to read private primary emails.
const SCOPE: &str = "user:email";

const USER_AGENT: &str = concat!("resource-hub/", env!("CARGO_PKG_VERSION"));

/// GitHub OAuth app client.
pub struct GithubProvider {
    config: GithubConfig,
    client: Client,
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: Option<String>,
    error: Option<String>,
    error_description: Option<String>,
}

#[derive(Deserialize)]
struct GithubUser {
    id: i64,
    login: String,
    name: Option<String>,
    email: Option<String>,
    avatar_url: Option<String>,
}

#[derive(Deserialize)]
struct GithubEmail {
    email: String,
    primary: bool,
    verified: bool,
}

impl GithubProvider {
    pub fn new(config: GithubConfig) -> Result<Self, OAuthError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(10))
            .user_agent(USER_AGENT)
            .build()?;
        Ok(Self { config, client })
    }

    fn api(&self, path: &str) -> String {
        format!("{}{}", self.config.api_url.trim_end_matches('/'), path)
    }

    async fn access_token(&self, code: &str) -> Result<String, OAuthError> {
        let resp = self
            .client
            .post(&self.config.token_url)
            .header(ACCEPT, "application/json")
            .form(&[
                ("client_id", self.config.client_id.as_str()),
                ("client_secret", self.config.client_secret.as_str()),
                ("code", code),
                ("redirect_uri", self.config.redirect_url.as_str()),
            ])
            .send()
            .await?;

        let token: TokenResponse = ensure_success(resp).await?.json().await?;

        // GitHub reports a bad code with 200 and an `error` field.
        match (token.access_token, token.error) {
            (Some(access_token), None) => Ok(access_token),
            (_, error) => Err(OAuthError::Rejected(
                token
                    .error_description
                    .or(error)
                    .unwrap_or_else(|| "missing access_token".into()),
            )),
        }
    }

    async fn get(&self, path: &str, access_token: &str) -> Result<Response, OAuthError> {
        Ok(self
            .client
            .get(self.api(path))
            .header(ACCEPT, "application/vnd.github+json")
            .header(AUTHORIZATION, format!("Bearer {access_token}"))
            .send()
            .await?)
    }

    /// Primary verified address from `/user/emails`, for accounts whose
    /// profile email is private.
    async fn primary_email(&self, access_token: &str) -> Result<Option<String>, OAuthError> {
        let resp = self.get("/user/emails", access_token).await?;
        if !resp.status().is_success() {
            // Token lacks the `user:email` scope.
            debug!(status = resp.status().as_u16(), "GitHub email lookup refused");
            return Ok(None);
        }

        let emails: Vec<GithubEmail> = resp.json().await?;
        Ok(emails
            .into_iter()
            .find(|e| e.primary && e.verified)
            .map(|e| e.email))
    }
}

#[async_trait]
impl IdentityProvider for GithubProvider {
    fn authorize_url(&self, state: &str) -> Result<String, OAuthError> {
        let url = Url::parse_with_params(
            &self.config.authorize_url,
            &[
                ("client_id", self.config.client_id.as_str()),
                ("redirect_uri", self.config.redirect_url.as_str()),
                ("scope", SCOPE),
                ("state", state),
            ],
        )
        .map_err(|e| OAuthError::InvalidUrl(e.to_string()))?;

        Ok(url.into())
    }

    #[instrument(skip_all)]
    async fn exchange(&self, code: &str) -> Result<OAuthAssertion, OAuthError> {
        let access_token = self.access_token(code).await?;

        let resp = self.get("/user", &access_token).await?;
        let user: GithubUser = ensure_success(resp).await?.json().await?;

        let email = match user.email.filter(|e| !e.trim().is_empty()) {
            Some(email) => Some(email),
            None => self.primary_email(&access_token).await?,
        };

        Ok(OAuthAssertion {
            provider_id: user.id,
            email,
            name: user.name.or(Some(user.login)),
            avatar_url: user.avatar_url,
        })
    }
}

async fn ensure_success(resp: Response) -> Result<Response, OAuthError> {
    if resp.status().is_success() {
        return Ok(resp);
    }
    let status = resp.status().as_u16();
    let body = resp.text().await.unwrap_or_default();
    Err(OAuthError::Status { status, body })
}
