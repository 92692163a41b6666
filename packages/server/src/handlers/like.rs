use axum::extract::{Path, State};
use axum::http::StatusCode;
use sea_orm::*;
use tracing::instrument;

use crate::entity::post_like;
use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::AuthUser;
use crate::state::AppState;
use crate::utils::lookup::find_post;

#[utoipa::path(
    post,
    path = "/posts/{id}/like",
    tag = "Likes",
    operation_id = "likePost",
    summary = "Like a resource",
    description = "A user can like a post once; a second like returns 409.",
    params(("id" = i32, Path, description = "Post ID")),
    responses(
        (status = 201, description = "Liked"),
        (status = 404, description = "Post not found (NOT_FOUND)", body = ErrorBody),
        (status = 409, description = "Already liked (CONFLICT)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, auth_user), fields(user_id = auth_user.user_id, id))]
pub async fn like_post(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<StatusCode, AppError> {
    find_post(&state.db, id).await?;

    let like = post_like::ActiveModel {
        user_id: Set(auth_user.user_id),
        post_id: Set(id),
        created_at: Set(chrono::Utc::now()),
        ..Default::default()
    };

    match post_like::Entity::insert(like)
        .exec_without_returning(&state.db)
        .await
    {
        Ok(_) => Ok(StatusCode::CREATED),
        Err(e) if matches!(e.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) => {
            Err(AppError::Conflict("Already liked".into()))
        }
        Err(e) => Err(e.into()),
    }
}

#[utoipa::path(
    delete,
    path = "/posts/{id}/like",
    tag = "Likes",
    operation_id = "unlikePost",
    summary = "Remove a like",
    params(("id" = i32, Path, description = "Post ID")),
    responses(
        (status = 204, description = "Like removed"),
        (status = 404, description = "Post not liked (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, auth_user), fields(user_id = auth_user.user_id, id))]
pub async fn unlike_post(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<StatusCode, AppError> {
    let result = post_like::Entity::delete_by_id((auth_user.user_id, id))
        .exec(&state.db)
        .await?;

    if result.rows_affected == 0 {
        return Err(AppError::NotFound("Post is not liked".into()));
    }
    Ok(StatusCode::NO_CONTENT)
}
