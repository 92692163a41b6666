use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use sea_orm::*;
use tracing::instrument;

use crate::entity::{comment, user};
use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::AuthUser;
use crate::extractors::json::AppJson;
use crate::models::comment::*;
use crate::models::shared::{FormResponse, UserSummary};
use crate::state::AppState;
use crate::utils::lookup::{find_comment, find_post};
use crate::utils::ownership::{Mutation, actions, authorize};

async fn creator_summary<C: ConnectionTrait>(db: &C, user_id: i32) -> Result<UserSummary, AppError> {
    Ok(user::Entity::find_by_id(user_id)
        .one(db)
        .await?
        .as_ref()
        .map(UserSummary::from)
        .unwrap_or_else(|| UserSummary::unknown(user_id)))
}

#[utoipa::path(
    post,
    path = "/posts/{id}/comments",
    tag = "Comments",
    operation_id = "createComment",
    summary = "Comment on a resource",
    params(("id" = i32, Path, description = "Post ID")),
    request_body = CommentRequest,
    responses(
        (status = 201, description = "Comment created", body = CommentResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 404, description = "Post not found (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, auth_user, payload), fields(user_id = auth_user.user_id, post_id))]
pub async fn create_comment(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(post_id): Path<i32>,
    AppJson(payload): AppJson<CommentRequest>,
) -> Result<impl IntoResponse, AppError> {
    validate_comment(&payload)?;
    find_post(&state.db, post_id).await?;

    let now = chrono::Utc::now();
    let new_comment = comment::ActiveModel {
        body: Set(payload.body.trim().to_string()),
        post_id: Set(post_id),
        user_id: Set(auth_user.user_id),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };
    let model = new_comment.insert(&state.db).await?;

    let creator = creator_summary(&state.db, auth_user.user_id).await?;
    let links = actions(&auth_user, &model);
    Ok((
        StatusCode::CREATED,
        Json(CommentResponse::new(model, creator, links)),
    ))
}

#[utoipa::path(
    get,
    path = "/posts/{id}/comments/{comment_id}/edit",
    tag = "Comments",
    operation_id = "editCommentForm",
    summary = "Form for editing a comment",
    description = "Refused with `Cannot edit a comment you haven't created` for anyone but the creator.",
    params(
        ("id" = i32, Path, description = "Post ID"),
        ("comment_id" = i32, Path, description = "Comment ID"),
    ),
    responses(
        (status = 200, description = "Pre-filled form", body = FormResponse),
        (status = 403, description = "Not the creator (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Comment not found (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, auth_user), fields(post_id, comment_id))]
pub async fn edit_comment_form_handler(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path((post_id, comment_id)): Path<(i32, i32)>,
) -> Result<Json<FormResponse>, AppError> {
    let model = find_comment(&state.db, post_id, comment_id).await?;
    authorize(&auth_user, &model, Mutation::Edit)?;
    Ok(Json(edit_comment_form(&model)))
}

#[utoipa::path(
    patch,
    path = "/posts/{id}/comments/{comment_id}",
    tag = "Comments",
    operation_id = "updateComment",
    summary = "Edit a comment",
    description = "Only the creator may edit; others get `Cannot edit a comment you haven't created` and the comment is left untouched.",
    params(
        ("id" = i32, Path, description = "Post ID"),
        ("comment_id" = i32, Path, description = "Comment ID"),
    ),
    request_body = CommentRequest,
    responses(
        (status = 200, description = "Comment updated", body = CommentResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 403, description = "Not the creator (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Comment not found (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, auth_user, payload), fields(post_id, comment_id))]
pub async fn update_comment(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path((post_id, comment_id)): Path<(i32, i32)>,
    AppJson(payload): AppJson<CommentRequest>,
) -> Result<Json<CommentResponse>, AppError> {
    let existing = find_comment(&state.db, post_id, comment_id).await?;
    authorize(&auth_user, &existing, Mutation::Edit)?;
    validate_comment(&payload)?;

    let mut active: comment::ActiveModel = existing.into();
    active.body = Set(payload.body.trim().to_string());
    active.updated_at = Set(chrono::Utc::now());
    let model = active.update(&state.db).await?;

    let creator = creator_summary(&state.db, model.user_id).await?;
    let links = actions(&auth_user, &model);
    Ok(Json(CommentResponse::new(model, creator, links)))
}

#[utoipa::path(
    delete,
    path = "/posts/{id}/comments/{comment_id}",
    tag = "Comments",
    operation_id = "deleteComment",
    summary = "Delete a comment",
    description = "Only the creator may delete; others get `Cannot delete a comment you haven't created` and the comment stays.",
    params(
        ("id" = i32, Path, description = "Post ID"),
        ("comment_id" = i32, Path, description = "Comment ID"),
    ),
    responses(
        (status = 204, description = "Comment deleted"),
        (status = 403, description = "Not the creator (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Comment not found (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, auth_user), fields(post_id, comment_id))]
pub async fn delete_comment(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path((post_id, comment_id)): Path<(i32, i32)>,
) -> Result<impl IntoResponse, AppError> {
    let existing = find_comment(&state.db, post_id, comment_id).await?;
    authorize(&auth_user, &existing, Mutation::Delete)?;

    comment::Entity::delete_by_id(existing.id)
        .exec(&state.db)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
