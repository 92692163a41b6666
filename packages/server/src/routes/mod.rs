use axum::{
    Router,
    routing::{delete, get, patch, post},
};

use crate::handlers;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::home::home))
        .nest("/auth", auth_routes())
        .nest("/me", me_routes())
        .nest("/posts", post_routes())
        .nest("/codereviews", code_review_routes())
}

fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/github", get(handlers::auth::github_sign_in))
        .route("/github/callback", get(handlers::auth::github_callback))
        .route("/session", delete(handlers::auth::sign_out))
}

fn me_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::auth::me))
        .route("/liked-posts", get(handlers::auth::liked_posts))
}

fn post_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(handlers::post::list_posts).post(handlers::post::create_post),
        )
        .route("/new", get(handlers::post::new_post_form_handler))
        .route(
            "/{id}",
            get(handlers::post::get_post)
                .patch(handlers::post::update_post)
                .delete(handlers::post::delete_post),
        )
        .route("/{id}/edit", get(handlers::post::edit_post_form_handler))
        .route(
            "/{id}/like",
            post(handlers::like::like_post).delete(handlers::like::unlike_post),
        )
        .nest("/{id}/comments", comment_routes())
}

fn comment_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(handlers::comment::create_comment))
        .route(
            "/{comment_id}",
            patch(handlers::comment::update_comment)
                .delete(handlers::comment::delete_comment),
        )
        .route(
            "/{comment_id}/edit",
            get(handlers::comment::edit_comment_form_handler),
        )
}

fn code_review_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(handlers::code_review::list_code_reviews)
                .post(handlers::code_review::create_code_review),
        )
        .route(
            "/new",
            get(handlers::code_review::new_code_review_form_handler),
        )
        .route(
            "/{id}",
            delete(handlers::code_review::delete_code_review),
        )
}
