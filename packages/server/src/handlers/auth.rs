use axum::Json;
use axum::extract::{Query, State};
use axum::response::Redirect;
use axum_extra::extract::CookieJar;
use axum_extra::extract::cookie::{Cookie, SameSite};
use rand::Rng;
use rand::distr::Alphanumeric;
use sea_orm::sea_query::Query as SeaQuery;
use sea_orm::*;
use tracing::{info, instrument, warn};

use crate::entity::{comment, post, post_like, user};
use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::{AuthUser, expired_session_cookie, session_cookie};
use crate::extractors::flash::{Flash, set_flash};
use crate::models::auth::{CallbackQuery, MeResponse};
use crate::models::post::PostListItem;
use crate::state::AppState;
use crate::utils::identity::resolve_user;
use crate::utils::jwt;
use crate::utils::lookup::post_list_items;

const OAUTH_STATE_COOKIE: &str = "oauth_state";
const OAUTH_STATE_PATH: &str = "/auth";

fn random_state() -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(32)
        .map(char::from)
        .collect()
}

#[utoipa::path(
    get,
    path = "/auth/github",
    tag = "Auth",
    operation_id = "githubSignIn",
    summary = "Start GitHub sign-in",
    description = "Issues an anti-forgery `state` cookie and redirects to GitHub's authorize page.",
    responses(
        (status = 303, description = "Redirect to GitHub"),
        (status = 500, description = "Provider misconfigured (INTERNAL_ERROR)", body = ErrorBody),
    ),
)]
#[instrument(skip_all)]
pub async fn github_sign_in(
    State(state): State<AppState>,
    jar: CookieJar,
) -> Result<(CookieJar, Redirect), AppError> {
    let oauth_state = random_state();
    let url = state.identity.authorize_url(&oauth_state)?;

    let cookie = Cookie::build((OAUTH_STATE_COOKIE, oauth_state))
        .path(OAUTH_STATE_PATH)
        .http_only(true)
        .secure(state.config.auth.secure_cookies)
        .same_site(SameSite::Lax)
        .max_age(time::Duration::minutes(10));

    Ok((jar.add(cookie), Redirect::to(&url)))
}

#[utoipa::path(
    get,
    path = "/auth/github/callback",
    tag = "Auth",
    operation_id = "githubCallback",
    summary = "Complete GitHub sign-in",
    description = "Exchanges the authorization code, resolves the local user and starts a session. Every failure (forged state, declined consent, provider error, missing email) leaves the visitor signed out with the `Github log in failed` flash.",
    params(CallbackQuery),
    responses(
        (status = 303, description = "Redirect to `/`, signed in or with a flash message"),
    ),
)]
#[instrument(skip_all)]
pub async fn github_callback(
    State(state): State<AppState>,
    jar: CookieJar,
    Query(query): Query<CallbackQuery>,
) -> (CookieJar, Redirect) {
    let expected_state = jar.get(OAUTH_STATE_COOKIE).map(|c| c.value().to_owned());
    let jar = jar.remove(Cookie::build(OAUTH_STATE_COOKIE).path(OAUTH_STATE_PATH));

    match complete_sign_in(&state, expected_state.as_deref(), &query).await {
        Ok(token) => {
            let jar = jar.add(session_cookie(token, &state.config.auth));
            (jar, Redirect::to("/"))
        }
        Err(e) => {
            warn!(error = ?e, "Github log in failed");
            (set_flash(jar, Flash::LoginFailed), Redirect::to("/"))
        }
    }
}

/// Run the callback checks and return a signed session token.
async fn complete_sign_in(
    state: &AppState,
    expected_state: Option<&str>,
    query: &CallbackQuery,
) -> Result<String, AppError> {
    if let Some(ref error) = query.error {
        return Err(AppError::Validation(format!("Provider returned error: {error}")));
    }
    match (expected_state, query.state.as_deref()) {
        (Some(expected), Some(got)) if expected == got => {}
        _ => return Err(AppError::Validation("OAuth state mismatch".into())),
    }
    let code = query
        .code
        .as_deref()
        .filter(|c| !c.is_empty())
        .ok_or_else(|| AppError::Validation("Missing authorization code".into()))?;

    let assertion = state.identity.exchange(code).await?;
    let user = resolve_user(&state.db, &assertion).await?;

    let token = jwt::sign(
        user.id,
        &user.email,
        &state.config.auth.jwt_secret,
        state.config.auth.session_ttl_days,
    )
    .map_err(|e| AppError::Internal(format!("JWT sign error: {}", e)))?;

    info!(user_id = user.id, "Signed in");
    Ok(token)
}

#[utoipa::path(
    delete,
    path = "/auth/session",
    tag = "Auth",
    operation_id = "signOut",
    summary = "Sign out",
    description = "Clears the session cookie and redirects to `/`.",
    responses(
        (status = 303, description = "Redirect to `/`"),
    ),
)]
/// Sessions are stateless JWTs: a token copied before sign-out stays valid
/// as a `Bearer` credential until it expires.
#[instrument(skip_all)]
pub async fn sign_out(jar: CookieJar) -> (CookieJar, Redirect) {
    (jar.remove(expired_session_cookie()), Redirect::to("/"))
}

#[utoipa::path(
    get,
    path = "/me",
    tag = "Auth",
    operation_id = "me",
    summary = "Current user's profile",
    description = "Returns the signed-in user with counts of their posts, comments, liked posts and the likes their posts received.",
    responses(
        (status = 200, description = "Profile", body = MeResponse),
        (status = 303, description = "Not signed in; redirect to `/`"),
    ),
)]
#[instrument(skip(state, auth_user), fields(user_id = auth_user.user_id))]
pub async fn me(
    auth_user: AuthUser,
    State(state): State<AppState>,
) -> Result<Json<MeResponse>, AppError> {
    let user_id = auth_user.user_id;
    let user = user::Entity::find_by_id(user_id)
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".into()))?;

    let post_count = post::Entity::find()
        .filter(post::Column::UserId.eq(user_id))
        .count(&state.db)
        .await?;
    let comment_count = comment::Entity::find()
        .filter(comment::Column::UserId.eq(user_id))
        .count(&state.db)
        .await?;
    let liked_post_count = post_like::Entity::find()
        .filter(post_like::Column::UserId.eq(user_id))
        .count(&state.db)
        .await?;
    let likes_received = post_like::Entity::find()
        .filter(
            post_like::Column::PostId.in_subquery(
                SeaQuery::select()
                    .column(post::Column::Id)
                    .from(post::Entity)
                    .and_where(post::Column::UserId.eq(user_id))
                    .to_owned(),
            ),
        )
        .count(&state.db)
        .await?;

    Ok(Json(MeResponse {
        id: user.id,
        github_id: user.github_id,
        email: user.email,
        name: user.name,
        avatar_url: user.avatar_url,
        post_count,
        comment_count,
        liked_post_count,
        likes_received,
    }))
}

#[utoipa::path(
    get,
    path = "/me/liked-posts",
    tag = "Likes",
    operation_id = "listLikedPosts",
    summary = "Posts the current user liked",
    description = "Most recently liked first.",
    responses(
        (status = 200, description = "Liked posts", body = Vec<PostListItem>),
        (status = 303, description = "Not signed in; redirect to `/`"),
    ),
)]
#[instrument(skip(state, auth_user), fields(user_id = auth_user.user_id))]
pub async fn liked_posts(
    auth_user: AuthUser,
    State(state): State<AppState>,
) -> Result<Json<Vec<PostListItem>>, AppError> {
    let likes = post_like::Entity::find()
        .filter(post_like::Column::UserId.eq(auth_user.user_id))
        .order_by_desc(post_like::Column::CreatedAt)
        .all(&state.db)
        .await?;
    let order: Vec<i32> = likes.iter().map(|l| l.post_id).collect();

    let mut posts = post::Entity::find()
        .filter(post::Column::Id.is_in(order.clone()))
        .all(&state.db)
        .await?;
    posts.sort_by_key(|p| order.iter().position(|&id| id == p.id));

    Ok(Json(post_list_items(&state.db, &auth_user, posts).await?))
}
