use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum_extra::extract::CookieJar;
use sea_orm::*;
use tracing::{info, instrument};

use crate::entity::code_review;
use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::AuthUser;
use crate::extractors::flash::take_flash;
use crate::extractors::json::AppJson;
use crate::models::code_review::*;
use crate::models::shared::{FormResponse, PageQuery, page_offset};
use crate::state::AppState;
use crate::utils::lookup::{load_users, summary};
use crate::utils::ownership::{Mutation, actions, authorize};

#[utoipa::path(
    get,
    path = "/codereviews",
    tag = "Code Reviews",
    operation_id = "listCodeReviews",
    summary = "List code review requests",
    description = "Newest first. Consumes any pending flash message, e.g. `Duplicate Link` after a rejected submission.",
    params(PageQuery),
    responses(
        (status = 200, description = "Page of requests", body = CodeReviewListResponse),
        (status = 303, description = "Not signed in; redirect to `/`"),
    ),
)]
#[instrument(skip(state, auth_user, jar, query), fields(user_id = auth_user.user_id))]
pub async fn list_code_reviews(
    auth_user: AuthUser,
    State(state): State<AppState>,
    jar: CookieJar,
    Query(query): Query<PageQuery>,
) -> Result<(CookieJar, Json<CodeReviewListResponse>), AppError> {
    let (page, per_page) = query.resolve();
    let (jar, flash) = take_flash(jar);

    let select = code_review::Entity::find();
    let total = select
        .clone()
        .paginate(&state.db, per_page)
        .num_items()
        .await?;

    let requests = select
        .order_by_desc(code_review::Column::CreatedAt)
        .order_by_desc(code_review::Column::Id)
        .offset(Some(page_offset(page, per_page)))
        .limit(Some(per_page))
        .all(&state.db)
        .await?;
    let users = load_users(&state.db, requests.iter().map(|r| r.user_id)).await?;

    let data = requests
        .into_iter()
        .map(|r| {
            let requester = summary(&users, r.user_id);
            let links = actions(&auth_user, &r);
            CodeReviewResponse::new(r, requester, links)
        })
        .collect();

    Ok((
        jar,
        Json(CodeReviewListResponse {
            data,
            pagination: Pagination::new(page, per_page, total),
            flash: flash.map(str::to_owned),
        }),
    ))
}

#[utoipa::path(
    get,
    path = "/codereviews/new",
    tag = "Code Reviews",
    operation_id = "newCodeReviewForm",
    summary = "Form for a new code review request",
    responses(
        (status = 200, description = "Empty form", body = FormResponse),
        (status = 303, description = "Not signed in; redirect to `/`"),
    ),
)]
pub async fn new_code_review_form_handler(_auth_user: AuthUser) -> Json<FormResponse> {
    Json(new_code_review_form())
}

#[utoipa::path(
    post,
    path = "/codereviews",
    tag = "Code Reviews",
    operation_id = "createCodeReview",
    summary = "Ask for a code review",
    description = "A link can be submitted only once across all users. A repeat submission redirects back to `/codereviews` with the `Duplicate Link` flash and stores nothing.",
    request_body = CreateCodeReviewRequest,
    responses(
        (status = 201, description = "Request created", body = CodeReviewResponse),
        (status = 303, description = "Duplicate link, or not signed in"),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, auth_user, payload), fields(user_id = auth_user.user_id))]
pub async fn create_code_review(
    auth_user: AuthUser,
    State(state): State<AppState>,
    AppJson(payload): AppJson<CreateCodeReviewRequest>,
) -> Result<impl IntoResponse, AppError> {
    validate_create_code_review(&payload)?;
    let link = payload.link.trim().to_string();

    let exists = code_review::Entity::find()
        .filter(code_review::Column::Link.eq(link.as_str()))
        .one(&state.db)
        .await?
        .is_some();
    if exists {
        info!(link = %link, "Rejected duplicate code review link");
        return Err(AppError::DuplicateLink);
    }

    let new_request = code_review::ActiveModel {
        link: Set(link),
        user_id: Set(auth_user.user_id),
        created_at: Set(chrono::Utc::now()),
        ..Default::default()
    };

    let model = match new_request.insert(&state.db).await {
        Ok(model) => model,
        Err(e) if matches!(e.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) => {
            info!("Duplicate code review link caught on insert");
            return Err(AppError::DuplicateLink);
        }
        Err(e) => return Err(e.into()),
    };

    let users = load_users(&state.db, [model.user_id]).await?;
    let requester = summary(&users, model.user_id);
    let links = actions(&auth_user, &model);
    Ok((
        StatusCode::CREATED,
        Json(CodeReviewResponse::new(model, requester, links)),
    ))
}

#[utoipa::path(
    delete,
    path = "/codereviews/{id}",
    tag = "Code Reviews",
    operation_id = "deleteCodeReview",
    summary = "Withdraw a code review request",
    description = "Only the requester may delete.",
    params(("id" = i32, Path, description = "Code review request ID")),
    responses(
        (status = 204, description = "Request deleted"),
        (status = 403, description = "Not the requester (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Request not found (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, auth_user), fields(id))]
pub async fn delete_code_review(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, AppError> {
    let existing = code_review::Entity::find_by_id(id)
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Code review request not found".into()))?;
    authorize(&auth_user, &existing, Mutation::Delete)?;

    code_review::Entity::delete_by_id(id).exec(&state.db).await?;
    Ok(StatusCode::NO_CONTENT)
}
