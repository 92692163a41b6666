use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use sea_orm::sea_query::Query as SeaQuery;
use sea_orm::*;
use tracing::instrument;

use crate::entity::{comment, post, post_like, post_tag};
use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::AuthUser;
use crate::extractors::json::AppJson;
use crate::models::comment::CommentResponse;
use crate::models::post::*;
use crate::models::shared::{FormResponse, page_offset};
use crate::state::AppState;
use crate::utils::lookup::{find_post, load_users, post_list_items, summary};
use crate::utils::ownership::{Mutation, actions, authorize};
use crate::utils::tags::{normalize_tag, parse_tags};

#[utoipa::path(
    get,
    path = "/posts",
    tag = "Posts",
    operation_id = "listPosts",
    summary = "List resources",
    description = "Returns every post regardless of creator, newest first. `Edit` and `Delete` actions appear only on the viewer's own posts. Optionally filtered by a single tag.",
    params(PostListQuery),
    responses(
        (status = 200, description = "Page of posts", body = PostListResponse),
        (status = 303, description = "Not signed in; redirect to `/`"),
    ),
)]
#[instrument(skip(state, auth_user, query), fields(user_id = auth_user.user_id))]
pub async fn list_posts(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Query(query): Query<PostListQuery>,
) -> Result<Json<PostListResponse>, AppError> {
    let (page, per_page) = query.resolve_page();

    let mut select = post::Entity::find();

    if let Some(ref tag) = query.tag {
        let tag = normalize_tag(tag);
        if !tag.is_empty() {
            select = select.filter(
                post::Column::Id.in_subquery(
                    SeaQuery::select()
                        .column(post_tag::Column::PostId)
                        .from(post_tag::Entity)
                        .and_where(post_tag::Column::Name.eq(tag))
                        .to_owned(),
                ),
            );
        }
    }

    let total = select
        .clone()
        .paginate(&state.db, per_page)
        .num_items()
        .await?;

    let posts = select
        .order_by_desc(post::Column::CreatedAt)
        .order_by_desc(post::Column::Id)
        .offset(Some(page_offset(page, per_page)))
        .limit(Some(per_page))
        .all(&state.db)
        .await?;

    let data = post_list_items(&state.db, &auth_user, posts).await?;

    Ok(Json(PostListResponse {
        data,
        pagination: Pagination::new(page, per_page, total),
    }))
}

#[utoipa::path(
    get,
    path = "/posts/new",
    tag = "Posts",
    operation_id = "newPostForm",
    summary = "Form for a new resource",
    responses(
        (status = 200, description = "Empty form", body = FormResponse),
        (status = 303, description = "Not signed in; redirect to `/`"),
    ),
)]
pub async fn new_post_form_handler(_auth_user: AuthUser) -> Json<FormResponse> {
    Json(new_post_form())
}

#[utoipa::path(
    post,
    path = "/posts",
    tag = "Posts",
    operation_id = "createPost",
    summary = "Share a resource",
    description = "Creates a post owned by the signed-in user. Title, link and tags are stored as entered (trimmed).",
    request_body = CreatePostRequest,
    responses(
        (status = 201, description = "Post created", body = PostResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 303, description = "Not signed in; redirect to `/`"),
    ),
)]
#[instrument(skip(state, auth_user, payload), fields(user_id = auth_user.user_id, title = %payload.title))]
pub async fn create_post(
    auth_user: AuthUser,
    State(state): State<AppState>,
    AppJson(payload): AppJson<CreatePostRequest>,
) -> Result<impl IntoResponse, AppError> {
    validate_create_post(&payload)?;

    let now = chrono::Utc::now();
    let txn = state.db.begin().await?;

    let new_post = post::ActiveModel {
        title: Set(payload.title.trim().to_string()),
        link: Set(payload.link.trim().to_string()),
        tags: Set(payload.tags.trim().to_string()),
        user_id: Set(auth_user.user_id),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };
    let model = new_post.insert(&txn).await?;
    replace_tags(&txn, model.id, &model.tags).await?;

    txn.commit().await?;

    let links = actions(&auth_user, &model);
    Ok((StatusCode::CREATED, Json(PostResponse::new(model, links))))
}

#[utoipa::path(
    get,
    path = "/posts/{id}",
    tag = "Posts",
    operation_id = "getPost",
    summary = "Show a resource with its comments",
    description = "Every comment carries `Edit Comment` and `Delete Comment` actions; only the comment's creator can complete them.",
    params(("id" = i32, Path, description = "Post ID")),
    responses(
        (status = 200, description = "Post details", body = PostDetailResponse),
        (status = 303, description = "Not signed in; redirect to `/`"),
        (status = 404, description = "Post not found (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, auth_user), fields(id))]
pub async fn get_post(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<PostDetailResponse>, AppError> {
    let model = find_post(&state.db, id).await?;

    let comments = comment::Entity::find()
        .filter(comment::Column::PostId.eq(id))
        .order_by_asc(comment::Column::CreatedAt)
        .order_by_asc(comment::Column::Id)
        .all(&state.db)
        .await?;
    let users = load_users(&state.db, comments.iter().map(|c| c.user_id)).await?;

    let comments = comments
        .into_iter()
        .map(|c| {
            let creator = summary(&users, c.user_id);
            let links = actions(&auth_user, &c);
            CommentResponse::new(c, creator, links)
        })
        .collect();

    let item = post_list_items(&state.db, &auth_user, vec![model])
        .await?
        .pop()
        .ok_or_else(|| AppError::Internal("Post vanished while loading".into()))?;

    Ok(Json(PostDetailResponse { item, comments }))
}

#[utoipa::path(
    get,
    path = "/posts/{id}/edit",
    tag = "Posts",
    operation_id = "editPostForm",
    summary = "Form for editing a resource",
    params(("id" = i32, Path, description = "Post ID")),
    responses(
        (status = 200, description = "Pre-filled form", body = FormResponse),
        (status = 403, description = "Not the creator (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Post not found (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, auth_user), fields(id))]
pub async fn edit_post_form_handler(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<FormResponse>, AppError> {
    let model = find_post(&state.db, id).await?;
    authorize(&auth_user, &model, Mutation::Edit)?;
    Ok(Json(edit_post_form(&model)))
}

#[utoipa::path(
    patch,
    path = "/posts/{id}",
    tag = "Posts",
    operation_id = "updatePost",
    summary = "Edit a resource",
    description = "Partially updates a post using PATCH semantics. Only the creator may edit. An empty payload returns the current resource unchanged.",
    params(("id" = i32, Path, description = "Post ID")),
    request_body = UpdatePostRequest,
    responses(
        (status = 200, description = "Post updated", body = PostResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 403, description = "Not the creator (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Post not found (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, auth_user, payload), fields(id))]
pub async fn update_post(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
    AppJson(payload): AppJson<UpdatePostRequest>,
) -> Result<Json<PostResponse>, AppError> {
    let txn = state.db.begin().await?;

    let existing = find_post(&txn, id).await?;
    authorize(&auth_user, &existing, Mutation::Edit)?;
    validate_update_post(&payload)?;

    if payload == UpdatePostRequest::default() {
        let links = actions(&auth_user, &existing);
        return Ok(Json(PostResponse::new(existing, links)));
    }

    let mut active: post::ActiveModel = existing.into();

    if let Some(ref title) = payload.title {
        active.title = Set(title.trim().to_string());
    }
    if let Some(ref link) = payload.link {
        active.link = Set(link.trim().to_string());
    }
    if let Some(ref tags) = payload.tags {
        active.tags = Set(tags.trim().to_string());
    }
    active.updated_at = Set(chrono::Utc::now());

    let model = active.update(&txn).await?;
    if payload.tags.is_some() {
        replace_tags(&txn, model.id, &model.tags).await?;
    }
    txn.commit().await?;

    let links = actions(&auth_user, &model);
    Ok(Json(PostResponse::new(model, links)))
}

#[utoipa::path(
    delete,
    path = "/posts/{id}",
    tag = "Posts",
    operation_id = "deletePost",
    summary = "Delete a resource",
    description = "Deletes a post with its comments, likes and tags. Only the creator may delete.",
    params(("id" = i32, Path, description = "Post ID")),
    responses(
        (status = 204, description = "Post deleted"),
        (status = 403, description = "Not the creator (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Post not found (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, auth_user), fields(id))]
pub async fn delete_post(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, AppError> {
    let txn = state.db.begin().await?;

    let existing = find_post(&txn, id).await?;
    authorize(&auth_user, &existing, Mutation::Delete)?;

    comment::Entity::delete_many()
        .filter(comment::Column::PostId.eq(id))
        .exec(&txn)
        .await?;
    post_like::Entity::delete_many()
        .filter(post_like::Column::PostId.eq(id))
        .exec(&txn)
        .await?;
    post_tag::Entity::delete_many()
        .filter(post_tag::Column::PostId.eq(id))
        .exec(&txn)
        .await?;
    post::Entity::delete_by_id(id).exec(&txn).await?;

    txn.commit().await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Rewrite the normalised tag rows for a post from its raw tag string.
async fn replace_tags<C: ConnectionTrait>(db: &C, post_id: i32, raw: &str) -> Result<(), DbErr> {
    post_tag::Entity::delete_many()
        .filter(post_tag::Column::PostId.eq(post_id))
        .exec(db)
        .await?;

    let rows: Vec<post_tag::ActiveModel> = parse_tags(raw)
        .into_iter()
        .map(|name| post_tag::ActiveModel {
            post_id: Set(post_id),
            name: Set(name),
            ..Default::default()
        })
        .collect();

    if !rows.is_empty() {
        post_tag::Entity::insert_many(rows)
            .exec_without_returning(db)
            .await?;
    }
    Ok(())
}
