pub mod config;
pub mod database;
pub mod entity;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod models;
pub mod oauth;
pub mod routes;
pub mod state;
pub mod utils;

use std::time::Duration;

use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{HeaderValue, Method};
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::openapi::security::{ApiKey, ApiKeyValue, HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};
use utoipa_scalar::{Scalar, Servable as ScalarServable};

use crate::config::CorsConfig;
use crate::state::AppState;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Resource Hub API",
        version = "1.0.0",
        description = "Share learning resources, discuss them and ask for code reviews"
    ),
    paths(
        handlers::home::home,
        handlers::auth::github_sign_in,
        handlers::auth::github_callback,
        handlers::auth::sign_out,
        handlers::auth::me,
        handlers::auth::liked_posts,
        handlers::post::list_posts,
        handlers::post::new_post_form_handler,
        handlers::post::create_post,
        handlers::post::get_post,
        handlers::post::edit_post_form_handler,
        handlers::post::update_post,
        handlers::post::delete_post,
        handlers::like::like_post,
        handlers::like::unlike_post,
        handlers::comment::create_comment,
        handlers::comment::edit_comment_form_handler,
        handlers::comment::update_comment,
        handlers::comment::delete_comment,
        handlers::code_review::list_code_reviews,
        handlers::code_review::new_code_review_form_handler,
        handlers::code_review::create_code_review,
        handlers::code_review::delete_code_review,
    ),
    tags(
        (name = "Home", description = "Landing page and navigation"),
        (name = "Auth", description = "GitHub sign-in and sessions"),
        (name = "Posts", description = "Shared resources"),
        (name = "Comments", description = "Discussion under a resource"),
        (name = "Likes", description = "Liking resources"),
        (name = "Code Reviews", description = "Code review requests"),
    ),
    modifiers(&SecurityAddon),
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_default();
        components.add_security_scheme(
            "session",
            SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::new(
                extractors::auth::SESSION_COOKIE,
            ))),
        );
        components.add_security_scheme(
            "jwt",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}

fn cors_layer(config: &CorsConfig) -> CorsLayer {
    let origins: Vec<HeaderValue> = config
        .allow_origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST, Method::PATCH, Method::DELETE])
        .allow_headers([CONTENT_TYPE, AUTHORIZATION])
        .allow_credentials(true)
        .max_age(Duration::from_secs(config.max_age))
}

/// Build the application router.
pub fn build_router(state: AppState) -> axum::Router {
    let cors = cors_layer(&state.config.server.cors);

    routes::routes()
        .with_state(state)
        .merge(Scalar::with_url("/scalar", ApiDoc::openapi()))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}
