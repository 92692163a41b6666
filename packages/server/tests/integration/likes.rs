use serde_json::json;

use crate::common::{TestApp, routes};

#[tokio::test]
async fn liking_twice_conflicts() {
    let app = TestApp::spawn().await;
    let alice = app.sign_in(1, "alice@example.com").await;
    let bob = app.sign_in(2, "bob@example.com").await;
    let id = alice.create_post("Resource", "x.example", "").await;

    let first = bob.post(&routes::like(id), &json!({})).await;
    assert_eq!(first.status, 201);

    let second = bob.post(&routes::like(id), &json!({})).await;
    assert_eq!(second.status, 409);
    assert_eq!(second.body["code"], "CONFLICT");
    assert_eq!(second.body["message"], "Already liked");

    let detail = bob.get(&routes::post(id)).await;
    assert_eq!(detail.body["like_count"], 1);
    assert_eq!(detail.body["liked"], true);

    let other = alice.get(&routes::post(id)).await;
    assert_eq!(other.body["liked"], false);
}

#[tokio::test]
async fn unliking_removes_the_like() {
    let app = TestApp::spawn().await;
    let alice = app.sign_in(1, "alice@example.com").await;
    let id = alice.create_post("Resource", "x.example", "").await;

    alice.post(&routes::like(id), &json!({})).await;
    let res = alice.delete(&routes::like(id)).await;
    assert_eq!(res.status, 204);

    let again = alice.delete(&routes::like(id)).await;
    assert_eq!(again.status, 404);

    let detail = alice.get(&routes::post(id)).await;
    assert_eq!(detail.body["like_count"], 0);
}

#[tokio::test]
async fn liking_a_missing_post_is_not_found() {
    let app = TestApp::spawn().await;
    let alice = app.sign_in(1, "alice@example.com").await;

    let res = alice.post(&routes::like(5), &json!({})).await;

    assert_eq!(res.status, 404);
}

#[tokio::test]
async fn liked_posts_are_most_recent_first() {
    let app = TestApp::spawn().await;
    let alice = app.sign_in(1, "alice@example.com").await;
    let bob = app.sign_in(2, "bob@example.com").await;
    let first = alice.create_post("First", "a.example", "").await;
    let second = alice.create_post("Second", "b.example", "").await;
    alice.create_post("Unliked", "c.example", "").await;

    bob.post(&routes::like(second), &json!({})).await;
    bob.post(&routes::like(first), &json!({})).await;

    let res = bob.get(routes::LIKED_POSTS).await;
    assert_eq!(res.status, 200);
    let titles: Vec<&str> = res
        .body
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["title"].as_str().unwrap())
        .collect();
    assert_eq!(titles, vec!["First", "Second"]);
    assert!(res.body[0]["liked"].as_bool().unwrap());
}
