use std::convert::Infallible;

use axum::{extract::FromRequestParts, http::header::AUTHORIZATION, http::request::Parts};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};

use crate::config::AuthConfig;
use crate::error::AppError;
use crate::state::AppState;
use crate::utils::jwt;

pub const SESSION_COOKIE: &str = "session";

/// Signed-in user for the current request.
///
/// Read from the `session` cookie, or from an `Authorization: Bearer <token>`
/// header for API clients. Add this as a handler parameter to require a
/// session; anonymous visitors are redirected to `/`.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: i32,
    pub email: String,
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = session_token(parts).ok_or(AppError::Unauthenticated)?;

        let claims = jwt::verify(&token, &state.config.auth.jwt_secret).map_err(|e| {
            tracing::debug!("Rejected session token: {}", e);
            AppError::Unauthenticated
        })?;

        Ok(AuthUser {
            user_id: claims.uid,
            email: claims.sub,
        })
    }
}

/// Like [`AuthUser`], but lets anonymous visitors through.
pub struct MaybeAuthUser(pub Option<AuthUser>);

impl FromRequestParts<AppState> for MaybeAuthUser {
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        Ok(MaybeAuthUser(
            AuthUser::from_request_parts(parts, state).await.ok(),
        ))
    }
}

fn session_token(parts: &Parts) -> Option<String> {
    let jar = CookieJar::from_headers(&parts.headers);
    if let Some(cookie) = jar.get(SESSION_COOKIE) {
        return Some(cookie.value().to_owned());
    }

    parts
        .headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::to_owned)
}

/// Session cookie carrying a freshly signed token.
pub fn session_cookie(token: String, config: &AuthConfig) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, token))
        .path("/")
        .http_only(true)
        .secure(config.secure_cookies)
        .same_site(SameSite::Lax)
        .max_age(time::Duration::days(config.session_ttl_days))
        .build()
}

/// Cookie shape that clears the session on sign-out.
pub fn expired_session_cookie() -> Cookie<'static> {
    Cookie::build(SESSION_COOKIE).path("/").build()
}
