use sea_orm::{ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter};
use server::entity::{post, post_like};

use crate::common::{TestApp, routes};

mod likes {
    use super::*;

    #[tokio::test]
    async fn liking_twice_counts_once() {
        let app = TestApp::spawn().await;
        let alice = app.signup("alice").await;
        let bob = app.signup("bob").await;
        let id = app.create_post(&alice, "likeable").await;

        for _ in 0..2 {
            let res = app.post_form(&bob.client, &routes::like(id), &[]).await;
            assert_eq!(res.status, 303);
        }

        let feed = app.get(&bob.client, routes::FEED).await;
        assert_eq!(feed.body["posts"][0]["likes_count"], 1);
        assert_eq!(feed.body["posts"][0]["liked"], true);

        let theirs = app.get(&alice.client, routes::FEED).await;
        assert_eq!(theirs.body["posts"][0]["liked"], false);
    }

    #[tokio::test]
    async fn unliking_a_post_never_liked_is_a_no_op() {
        let app = TestApp::spawn().await;
        let alice = app.signup("alice").await;
        let bob = app.signup("bob").await;
        let id = app.create_post(&alice, "untouched").await;

        let res = app.post_form(&bob.client, &routes::unlike(id), &[]).await;

        assert_eq!(res.status, 303);
        assert_eq!(post_like::Entity::find().count(&app.db).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn unlike_removes_only_the_callers_like() {
        let app = TestApp::spawn().await;
        let alice = app.signup("alice").await;
        let bob = app.signup("bob").await;
        let id = app.create_post(&alice, "popular").await;
        app.post_form(&alice.client, &routes::like(id), &[]).await;
        app.post_form(&bob.client, &routes::like(id), &[]).await;

        app.post_form(&bob.client, &routes::unlike(id), &[]).await;

        let remaining = post_like::Entity::find()
            .filter(post_like::Column::PostId.eq(id))
            .all(&app.db)
            .await
            .unwrap();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].profile_id, alice.profile_id);
    }

    #[tokio::test]
    async fn like_returns_to_the_referring_page() {
        let app = TestApp::spawn().await;
        let alice = app.signup("alice").await;
        let id = app.create_post(&alice, "on my profile").await;
        let page = routes::profile(alice.profile_id);

        let res = app
            .post_from(&alice.client, &routes::like(id), &app.url(&page))
            .await;
        assert_eq!(res.location.as_deref(), Some(page.as_str()));

        let res = app.post_form(&alice.client, &routes::unlike(id), &[]).await;
        assert_eq!(res.location.as_deref(), Some("/"));
    }

    #[tokio::test]
    async fn liking_an_unknown_post_is_not_found() {
        let app = TestApp::spawn().await;
        let alice = app.signup("alice").await;

        let res = app.post_form(&alice.client, &routes::like(9999), &[]).await;

        assert_eq!(res.status, 404);
        assert_eq!(res.body["code"], "NOT_FOUND");
    }

    #[tokio::test]
    async fn like_endpoints_reject_get() {
        let app = TestApp::spawn().await;
        let alice = app.signup("alice").await;
        let id = app.create_post(&alice, "hands off").await;

        let res = app.get(&alice.client, &routes::like(id)).await;
        assert_eq!(res.status, 405);
        let res = app.get(&alice.client, &routes::unlike(id)).await;
        assert_eq!(res.status, 405);

        assert_eq!(post_like::Entity::find().count(&app.db).await.unwrap(), 0);
    }
}

mod editing {
    use super::*;

    #[tokio::test]
    async fn owner_can_edit_a_post() {
        let app = TestApp::spawn().await;
        let alice = app.signup("alice").await;
        let id = app.create_post(&alice, "draft").await;

        let form = app.get(&alice.client, &routes::edit(id)).await;
        assert_eq!(form.status, 200);
        assert_eq!(form.body["content"], "draft");

        let res = app
            .post_form(&alice.client, &routes::edit(id), &[("content", "final")])
            .await;
        assert_eq!(res.status, 303);
        assert_eq!(res.location.as_deref(), Some("/"));

        let stored = post::Entity::find_by_id(id)
            .one(&app.db)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.content, "final");
    }

    #[tokio::test]
    async fn others_cannot_edit_a_post() {
        let app = TestApp::spawn().await;
        let alice = app.signup("alice").await;
        let bob = app.signup("bob").await;
        let id = app.create_post(&alice, "mine").await;

        let form = app.get(&bob.client, &routes::edit(id)).await;
        assert_eq!(form.status, 403);

        let res = app
            .post_form(&bob.client, &routes::edit(id), &[("content", "hijacked")])
            .await;
        assert_eq!(res.status, 403);
        assert_eq!(res.body["code"], "PERMISSION_DENIED");

        let stored = post::Entity::find_by_id(id)
            .one(&app.db)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.content, "mine");
    }

    #[tokio::test]
    async fn edit_validates_content() {
        let app = TestApp::spawn().await;
        let alice = app.signup("alice").await;
        let id = app.create_post(&alice, "draft").await;

        let res = app
            .post_form(&alice.client, &routes::edit(id), &[("content", "")])
            .await;

        assert_eq!(res.status, 400);
    }
}

mod deleting {
    use super::*;

    #[tokio::test]
    async fn owner_can_delete_a_post_and_its_likes() {
        let app = TestApp::spawn().await;
        let alice = app.signup("alice").await;
        let bob = app.signup("bob").await;
        let id = app.create_post(&alice, "short-lived").await;
        app.post_form(&bob.client, &routes::like(id), &[]).await;

        let confirm = app.get(&alice.client, &routes::delete(id)).await;
        assert_eq!(confirm.status, 200);
        assert_eq!(confirm.body["likes_count"], 1);

        let res = app.post_form(&alice.client, &routes::delete(id), &[]).await;
        assert_eq!(res.status, 303);

        assert!(post::Entity::find_by_id(id).one(&app.db).await.unwrap().is_none());
        assert_eq!(post_like::Entity::find().count(&app.db).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn others_cannot_delete_a_post() {
        let app = TestApp::spawn().await;
        let alice = app.signup("alice").await;
        let bob = app.signup("bob").await;
        let id = app.create_post(&alice, "keep me").await;

        let res = app.post_form(&bob.client, &routes::delete(id), &[]).await;

        assert_eq!(res.status, 403);
        assert!(post::Entity::find_by_id(id).one(&app.db).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn deleting_an_unknown_post_is_not_found() {
        let app = TestApp::spawn().await;
        let alice = app.signup("alice").await;

        let res = app.post_form(&alice.client, &routes::delete(9999), &[]).await;

        assert_eq!(res.status, 404);
    }
}
