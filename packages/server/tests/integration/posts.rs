use sea_orm::{ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter};
use serde_json::json;
use server::entity::{comment, post, post_like, post_tag};

use crate::common::{TestApp, routes};

mod create_post {
    use super::*;

    #[tokio::test]
    async fn listing_shows_title_link_and_tags_verbatim() {
        let app = TestApp::spawn().await;
        let alice = app.sign_in(1, "alice@example.com").await;

        let res = alice
            .post(
                routes::POSTS,
                &json!({
                    "title": "Ultimate Resource",
                    "link": "www.google.com",
                    "tags": "ruby, makers, beginner",
                }),
            )
            .await;
        assert_eq!(res.status, 201, "{}", res.text);
        assert_eq!(res.body["tag_list"], json!(["ruby", "makers", "beginner"]));

        let list = alice.get(routes::POSTS).await;
        assert_eq!(list.status, 200);
        let item = &list.body["data"][0];
        assert_eq!(item["title"], "Ultimate Resource");
        assert_eq!(item["link"], "www.google.com");
        assert_eq!(item["tags"], "ruby, makers, beginner");
        assert_eq!(item["creator"]["name"], "alice@example.com");
        assert_eq!(list.body["pagination"]["total"], 1);
    }

    #[tokio::test]
    async fn blank_title_is_rejected() {
        let app = TestApp::spawn().await;
        let alice = app.sign_in(1, "alice@example.com").await;

        let res = alice
            .post(routes::POSTS, &json!({"title": "   ", "link": "www.google.com"}))
            .await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"], "VALIDATION_ERROR");
        assert_eq!(post::Entity::find().count(&app.db).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn malformed_body_is_a_validation_error() {
        let app = TestApp::spawn().await;
        let alice = app.sign_in(1, "alice@example.com").await;

        let res = alice.post(routes::POSTS, &json!({"title": "No link"})).await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn new_post_form_lists_fields() {
        let app = TestApp::spawn().await;
        let alice = app.sign_in(1, "alice@example.com").await;

        let res = alice.get(routes::NEW_POST).await;

        assert_eq!(res.status, 200);
        assert_eq!(res.body["action"], "/posts");
        assert_eq!(res.body["method"], "POST");
        assert_eq!(res.body["fields"].as_array().unwrap().len(), 3);
    }
}

mod affordances {
    use super::*;

    #[tokio::test]
    async fn only_creator_sees_edit_and_delete() {
        let app = TestApp::spawn().await;
        let alice = app.sign_in(1, "alice@example.com").await;
        let bob = app.sign_in(2, "bob@example.com").await;
        let id = alice.create_post("Rust Book", "doc.rust-lang.org", "rust").await;

        let own = alice.get(routes::POSTS).await;
        assert_eq!(own.labels("/data/0/actions"), vec!["Edit", "Delete"]);
        assert_eq!(
            own.body["data"][0]["actions"][0]["href"],
            format!("/posts/{id}/edit")
        );
        assert_eq!(own.body["data"][0]["actions"][1]["method"], "DELETE");

        let other = bob.get(routes::POSTS).await;
        assert_eq!(other.body["data"][0]["title"], "Rust Book");
        assert!(other.labels("/data/0/actions").is_empty());

        let detail = bob.get(&routes::post(id)).await;
        assert_eq!(detail.status, 200);
        assert!(detail.labels("/actions").is_empty());
    }

    #[tokio::test]
    async fn listing_is_newest_first() {
        let app = TestApp::spawn().await;
        let alice = app.sign_in(1, "alice@example.com").await;
        alice.create_post("Older", "a.example", "").await;
        alice.create_post("Newer", "b.example", "").await;

        let list = alice.get(routes::POSTS).await;

        assert_eq!(list.body["data"][0]["title"], "Newer");
        assert_eq!(list.body["data"][1]["title"], "Older");
    }

    #[tokio::test]
    async fn listing_paginates() {
        let app = TestApp::spawn().await;
        let alice = app.sign_in(1, "alice@example.com").await;
        for i in 0..3 {
            alice.create_post(&format!("Post {i}"), "x.example", "").await;
        }

        let page = alice
            .get(&format!("{}?page=2&per_page=2", routes::POSTS))
            .await;

        assert_eq!(page.body["data"].as_array().unwrap().len(), 1);
        assert_eq!(page.body["pagination"]["total"], 3);
        assert_eq!(page.body["pagination"]["total_pages"], 2);
    }

    #[tokio::test]
    async fn page_far_past_the_end_is_empty() {
        let app = TestApp::spawn().await;
        let alice = app.sign_in(1, "alice@example.com").await;
        alice.create_post("Only post", "x.example", "").await;

        for page in ["18446744073709551615", "999999999999999999"] {
            let res = alice.get(&format!("{}?page={page}", routes::POSTS)).await;

            assert_eq!(res.status, 200, "{}", res.text);
            assert!(res.body["data"].as_array().unwrap().is_empty());
            assert_eq!(res.body["pagination"]["total"], 1);
        }
    }
}

mod tags {
    use super::*;

    #[tokio::test]
    async fn tag_filter_returns_only_matching_posts() {
        let app = TestApp::spawn().await;
        let alice = app.sign_in(1, "alice@example.com").await;
        alice.create_post("Ruby intro", "ruby.example", "Ruby, beginner").await;
        alice.create_post("Rust intro", "rust.example", "rust, beginner").await;

        let ruby = alice.get(&format!("{}?tag=ruby", routes::POSTS)).await;
        assert_eq!(ruby.body["pagination"]["total"], 1);
        assert_eq!(ruby.body["data"][0]["title"], "Ruby intro");

        let beginner = alice.get(&format!("{}?tag=BEGINNER", routes::POSTS)).await;
        assert_eq!(beginner.body["pagination"]["total"], 2);

        let none = alice.get(&format!("{}?tag=python", routes::POSTS)).await;
        assert_eq!(none.body["pagination"]["total"], 0);
    }

    #[tokio::test]
    async fn editing_tags_rewrites_the_index() {
        let app = TestApp::spawn().await;
        let alice = app.sign_in(1, "alice@example.com").await;
        let id = alice.create_post("Ruby intro", "ruby.example", "ruby").await;

        let res = alice.patch(&routes::post(id), &json!({"tags": "Go, go"})).await;
        assert_eq!(res.status, 200, "{}", res.text);
        assert_eq!(res.body["tags"], "Go, go");

        let names: Vec<String> = post_tag::Entity::find()
            .filter(post_tag::Column::PostId.eq(id))
            .all(&app.db)
            .await
            .unwrap()
            .into_iter()
            .map(|t| t.name)
            .collect();
        assert_eq!(names, vec!["go"]);
    }
}

mod update_post {
    use super::*;

    #[tokio::test]
    async fn creator_can_edit() {
        let app = TestApp::spawn().await;
        let alice = app.sign_in(1, "alice@example.com").await;
        let id = alice.create_post("Ultimate Resource", "www.google.com", "").await;

        let form = alice.get(&routes::edit_post(id)).await;
        assert_eq!(form.status, 200);
        assert_eq!(form.body["fields"][0]["value"], "Ultimate Resource");

        let res = alice
            .patch(&routes::post(id), &json!({"title": "Title has been changed"}))
            .await;
        assert_eq!(res.status, 200);
        assert_eq!(res.body["title"], "Title has been changed");
        assert_eq!(res.body["link"], "www.google.com");
    }

    #[tokio::test]
    async fn non_creator_cannot_edit() {
        let app = TestApp::spawn().await;
        let alice = app.sign_in(1, "alice@example.com").await;
        let bob = app.sign_in(2, "bob@example.com").await;
        let id = alice.create_post("Ultimate Resource", "www.google.com", "").await;

        let form = bob.get(&routes::edit_post(id)).await;
        assert_eq!(form.status, 403);
        assert_eq!(form.body["message"], "Cannot edit a post you haven't created");

        for _ in 0..2 {
            let res = bob.patch(&routes::post(id), &json!({"title": "Hijacked"})).await;
            assert_eq!(res.status, 403);
            assert_eq!(res.body["code"], "PERMISSION_DENIED");
        }

        let stored = post::Entity::find_by_id(id).one(&app.db).await.unwrap().unwrap();
        assert_eq!(stored.title, "Ultimate Resource");
    }

    #[tokio::test]
    async fn non_creator_is_denied_before_payload_is_validated() {
        let app = TestApp::spawn().await;
        let alice = app.sign_in(1, "alice@example.com").await;
        let bob = app.sign_in(2, "bob@example.com").await;
        let id = alice.create_post("Ultimate Resource", "www.google.com", "").await;

        let res = bob.patch(&routes::post(id), &json!({"title": "   "})).await;

        assert_eq!(res.status, 403);
        assert_eq!(res.body["message"], "Cannot edit a post you haven't created");

        let own = alice.patch(&routes::post(id), &json!({"title": "   "})).await;
        assert_eq!(own.status, 400);
        assert_eq!(own.body["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn missing_post_is_not_found() {
        let app = TestApp::spawn().await;
        let alice = app.sign_in(1, "alice@example.com").await;

        assert_eq!(alice.get(&routes::post(404)).await.status, 404);
        assert_eq!(
            alice.patch(&routes::post(404), &json!({"title": "x"})).await.status,
            404
        );
    }
}

mod delete_post {
    use super::*;

    #[tokio::test]
    async fn deleting_a_post_removes_its_comments_likes_and_tags() {
        let app = TestApp::spawn().await;
        let alice = app.sign_in(1, "alice@example.com").await;
        let bob = app.sign_in(2, "bob@example.com").await;
        let id = alice.create_post("Doomed", "doomed.example", "a, b").await;
        bob.create_comment(id, "first!").await;
        bob.post(&routes::like(id), &json!({})).await;

        let res = alice.delete(&routes::post(id)).await;
        assert_eq!(res.status, 204);

        assert_eq!(post::Entity::find().count(&app.db).await.unwrap(), 0);
        assert_eq!(comment::Entity::find().count(&app.db).await.unwrap(), 0);
        assert_eq!(post_like::Entity::find().count(&app.db).await.unwrap(), 0);
        assert_eq!(post_tag::Entity::find().count(&app.db).await.unwrap(), 0);
        assert_eq!(alice.get(&routes::post(id)).await.status, 404);
    }

    #[tokio::test]
    async fn non_creator_cannot_delete() {
        let app = TestApp::spawn().await;
        let alice = app.sign_in(1, "alice@example.com").await;
        let bob = app.sign_in(2, "bob@example.com").await;
        let id = alice.create_post("Keep me", "keep.example", "").await;

        let res = bob.delete(&routes::post(id)).await;

        assert_eq!(res.status, 403);
        assert_eq!(res.body["message"], "Cannot delete a post you haven't created");
        assert_eq!(post::Entity::find().count(&app.db).await.unwrap(), 1);
    }
}
