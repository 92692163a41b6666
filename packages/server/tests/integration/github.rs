use std::net::SocketAddr;

use axum::extract::Form;
use axum::http::{HeaderMap, StatusCode};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{Value, json};

use server::config::GithubConfig;
use server::oauth::github::GithubProvider;
use server::oauth::{IdentityProvider, OAuthError};

const GOOD_CODE: &str = "good-code";
const TOKEN: &str = "gho_test_token";

async fn token(Form(form): Form<Vec<(String, String)>>) -> Json<Value> {
    let code = form
        .iter()
        .find(|(k, _)| k == "code")
        .map(|(_, v)| v.as_str());
    if code == Some(GOOD_CODE) {
        Json(json!({"access_token": TOKEN, "token_type": "bearer"}))
    } else {
        Json(json!({
            "error": "bad_verification_code",
            "error_description": "The code passed is incorrect or expired."
        }))
    }
}

fn authorized(headers: &HeaderMap) -> bool {
    headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v == format!("Bearer {TOKEN}"))
}

/// Fake GitHub: `/user` hides the email unless `public_email` is set.
async fn spawn_github(public_email: Option<&'static str>) -> SocketAddr {
    let app = Router::new()
        .route("/login/oauth/access_token", post(token))
        .route(
            "/user",
            get(move |headers: HeaderMap| async move {
                if !authorized(&headers) {
                    return Err(StatusCode::UNAUTHORIZED);
                }
                Ok(Json(json!({
                    "id": 583231,
                    "login": "octocat",
                    "name": null,
                    "email": public_email,
                    "avatar_url": "https://avatars.example/u/583231",
                })))
            }),
        )
        .route(
            "/user/emails",
            get(|headers: HeaderMap| async move {
                if !authorized(&headers) {
                    return Err(StatusCode::UNAUTHORIZED);
                }
                Ok(Json(json!([
                    {"email": "old@example.com", "primary": false, "verified": true},
                    {"email": "octocat@example.com", "primary": true, "verified": true},
                ])))
            }),
        );

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind fake GitHub");
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

fn provider(addr: SocketAddr) -> GithubProvider {
    GithubProvider::new(GithubConfig {
        client_id: "client".into(),
        client_secret: "secret".into(),
        redirect_url: "http://127.0.0.1/auth/github/callback".into(),
        authorize_url: format!("http://{addr}/login/oauth/authorize"),
        token_url: format!("http://{addr}/login/oauth/access_token"),
        api_url: format!("http://{addr}"),
    })
    .unwrap()
}

#[tokio::test]
async fn exchange_uses_public_profile_email() {
    let addr = spawn_github(Some("public@example.com")).await;

    let assertion = provider(addr).exchange(GOOD_CODE).await.unwrap();

    assert_eq!(assertion.provider_id, 583231);
    assert_eq!(assertion.email.as_deref(), Some("public@example.com"));
    assert_eq!(assertion.name.as_deref(), Some("octocat"));
    assert_eq!(
        assertion.avatar_url.as_deref(),
        Some("https://avatars.example/u/583231")
    );
}

#[tokio::test]
async fn exchange_falls_back_to_primary_verified_email() {
    let addr = spawn_github(None).await;

    let assertion = provider(addr).exchange(GOOD_CODE).await.unwrap();

    assert_eq!(assertion.email.as_deref(), Some("octocat@example.com"));
}

#[tokio::test]
async fn bad_code_is_rejected() {
    let addr = spawn_github(None).await;

    let err = provider(addr).exchange("stale").await.unwrap_err();

    match err {
        OAuthError::Rejected(msg) => assert!(msg.contains("incorrect or expired")),
        other => panic!("expected Rejected, got {other:?}"),
    }
}
