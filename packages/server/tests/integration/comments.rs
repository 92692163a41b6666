use sea_orm::{EntityTrait, PaginatorTrait};
use serde_json::json;
use server::entity::comment;

use crate::common::{TestApp, routes};

mod create_comment {
    use super::*;

    #[tokio::test]
    async fn comment_appears_on_post_detail() {
        let app = TestApp::spawn().await;
        let alice = app.sign_in(1, "alice@example.com").await;
        let bob = app.sign_in(2, "bob@example.com").await;
        let post_id = alice.create_post("Ultimate Resource", "www.google.com", "").await;

        let res = bob
            .post(&routes::comments(post_id), &json!({"body": "  Great resource!  "}))
            .await;
        assert_eq!(res.status, 201, "{}", res.text);
        assert_eq!(res.body["body"], "Great resource!");
        assert_eq!(res.body["creator"]["name"], "bob@example.com");

        let detail = alice.get(&routes::post(post_id)).await;
        assert_eq!(detail.body["comment_count"], 1);
        assert_eq!(detail.body["comments"][0]["body"], "Great resource!");
    }

    #[tokio::test]
    async fn empty_comment_is_rejected() {
        let app = TestApp::spawn().await;
        let alice = app.sign_in(1, "alice@example.com").await;
        let post_id = alice.create_post("Resource", "x.example", "").await;

        let res = alice.post(&routes::comments(post_id), &json!({"body": " "})).await;

        assert_eq!(res.status, 400);
        assert_eq!(comment::Entity::find().count(&app.db).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn commenting_on_missing_post_is_not_found() {
        let app = TestApp::spawn().await;
        let alice = app.sign_in(1, "alice@example.com").await;

        let res = alice.post(&routes::comments(77), &json!({"body": "hello"})).await;

        assert_eq!(res.status, 404);
    }
}

mod ownership {
    use super::*;

    #[tokio::test]
    async fn non_creator_sees_comment_actions_but_is_denied() {
        let app = TestApp::spawn().await;
        let alice = app.sign_in(1, "alice@example.com").await;
        let bob = app.sign_in(2, "bob@example.com").await;
        let post_id = alice.create_post("Ultimate Resource", "www.google.com", "").await;
        let comment_id = bob.create_comment(post_id, "Bob's comment").await;

        let detail = alice.get(&routes::post(post_id)).await;
        assert_eq!(
            detail.labels("/comments/0/actions"),
            vec!["Edit Comment", "Delete Comment"]
        );

        let form = alice.get(&routes::edit_comment(post_id, comment_id)).await;
        assert_eq!(form.status, 403);
        assert_eq!(form.body["message"], "Cannot edit a comment you haven't created");

        let edit = alice
            .patch(&routes::comment(post_id, comment_id), &json!({"body": "Alice was here"}))
            .await;
        assert_eq!(edit.status, 403);
        assert_eq!(edit.body["message"], "Cannot edit a comment you haven't created");

        let delete = alice.delete(&routes::comment(post_id, comment_id)).await;
        assert_eq!(delete.status, 403);
        assert_eq!(
            delete.body["message"],
            "Cannot delete a comment you haven't created"
        );

        let stored = comment::Entity::find_by_id(comment_id)
            .one(&app.db)
            .await
            .unwrap()
            .expect("comment should survive denied mutations");
        assert_eq!(stored.body, "Bob's comment");
    }

    #[tokio::test]
    async fn repeated_denials_never_change_state() {
        let app = TestApp::spawn().await;
        let alice = app.sign_in(1, "alice@example.com").await;
        let bob = app.sign_in(2, "bob@example.com").await;
        let post_id = alice.create_post("Resource", "x.example", "").await;
        let comment_id = bob.create_comment(post_id, "original").await;

        for _ in 0..3 {
            alice
                .patch(&routes::comment(post_id, comment_id), &json!({"body": "changed"}))
                .await;
            alice.delete(&routes::comment(post_id, comment_id)).await;
        }

        let stored = comment::Entity::find_by_id(comment_id)
            .one(&app.db)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.body, "original");
        assert_eq!(stored.created_at, stored.updated_at);
    }

    #[tokio::test]
    async fn creator_can_edit_and_delete() {
        let app = TestApp::spawn().await;
        let alice = app.sign_in(1, "alice@example.com").await;
        let bob = app.sign_in(2, "bob@example.com").await;
        let post_id = alice.create_post("Resource", "x.example", "").await;
        let comment_id = bob.create_comment(post_id, "typo").await;

        let form = bob.get(&routes::edit_comment(post_id, comment_id)).await;
        assert_eq!(form.status, 200);
        assert_eq!(form.body["fields"][0]["value"], "typo");

        let edit = bob
            .patch(&routes::comment(post_id, comment_id), &json!({"body": "fixed"}))
            .await;
        assert_eq!(edit.status, 200);
        assert_eq!(edit.body["body"], "fixed");

        let delete = bob.delete(&routes::comment(post_id, comment_id)).await;
        assert_eq!(delete.status, 204);
        assert_eq!(comment::Entity::find().count(&app.db).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn comment_under_another_post_is_not_found() {
        let app = TestApp::spawn().await;
        let alice = app.sign_in(1, "alice@example.com").await;
        let first = alice.create_post("First", "a.example", "").await;
        let second = alice.create_post("Second", "b.example", "").await;
        let comment_id = alice.create_comment(first, "on first").await;

        let res = alice.delete(&routes::comment(second, comment_id)).await;

        assert_eq!(res.status, 404);
        assert_eq!(comment::Entity::find().count(&app.db).await.unwrap(), 1);
    }
}
