use sea_orm::{EntityTrait, PaginatorTrait};
use server::entity::{account, profile};

use crate::common::{PASSWORD, TestApp, routes};

mod signup {
    use super::*;

    #[tokio::test]
    async fn signup_creates_one_account_and_one_profile() {
        let app = TestApp::spawn().await;

        let user = app.signup("alice").await;

        assert_eq!(account::Entity::find().count(&app.db).await.unwrap(), 1);
        assert_eq!(profile::Entity::find().count(&app.db).await.unwrap(), 1);
        let stored = profile::Entity::find_by_id(user.profile_id)
            .one(&app.db)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.account_id, user.account_id);
        assert_eq!(stored.name, "Tester");
    }

    #[tokio::test]
    async fn signup_redirects_to_feed_and_starts_a_session() {
        let app = TestApp::spawn().await;
        let client = app.client();

        let res = app
            .post_form(
                &client,
                routes::SIGNUP,
                &[
                    ("username", "alice"),
                    ("password1", PASSWORD),
                    ("password2", PASSWORD),
                    ("name", "Alice"),
                    ("bio", "Hello"),
                ],
            )
            .await;
        assert_eq!(res.status, 303);
        assert_eq!(res.location.as_deref(), Some("/"));

        let feed = app.get(&client, routes::FEED).await;
        assert_eq!(feed.status, 200);
        assert_eq!(feed.body["profile"]["name"], "Alice");
    }

    #[tokio::test]
    async fn signup_form_lists_password_rules() {
        let app = TestApp::spawn().await;

        let res = app.get(&app.client(), routes::SIGNUP).await;

        assert_eq!(res.status, 200);
        assert_eq!(res.body["help_texts"].as_array().unwrap().len(), 5);
    }

    #[tokio::test]
    async fn mismatched_passwords_are_rejected_with_help_texts() {
        let app = TestApp::spawn().await;

        let res = app
            .post_form(
                &app.client(),
                routes::SIGNUP,
                &[
                    ("username", "alice"),
                    ("password1", PASSWORD),
                    ("password2", "something-else-9"),
                    ("name", "Alice"),
                    ("bio", "Hello"),
                ],
            )
            .await;

        assert_eq!(res.status, 400);
        assert!(
            res.body["error_message"]
                .as_str()
                .unwrap()
                .starts_with("Invalid sign up")
        );
        assert_eq!(
            res.body["errors"][0],
            "The two password fields didn't match."
        );
        assert!(!res.body["help_texts"].as_array().unwrap().is_empty());
        assert_eq!(account::Entity::find().count(&app.db).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn weak_password_and_long_name_are_reported_together() {
        let app = TestApp::spawn().await;

        let res = app
            .post_form(
                &app.client(),
                routes::SIGNUP,
                &[
                    ("username", "alice"),
                    ("password1", "12345678"),
                    ("password2", "12345678"),
                    ("name", "A name well over fifteen characters"),
                    ("bio", "Hello"),
                ],
            )
            .await;

        assert_eq!(res.status, 400);
        let errors = res.body["errors"].as_array().unwrap();
        assert!(errors.iter().any(|e| e.as_str().unwrap().contains("too common")));
        assert!(errors.iter().any(|e| e.as_str().unwrap().contains("entirely numeric")));
        assert!(errors.iter().any(|e| e.as_str().unwrap().starts_with("Name")));
    }

    #[tokio::test]
    async fn taken_username_is_rejected() {
        let app = TestApp::spawn().await;
        app.signup("alice").await;

        let res = app
            .post_form(
                &app.client(),
                routes::SIGNUP,
                &[
                    ("username", "alice"),
                    ("password1", PASSWORD),
                    ("password2", PASSWORD),
                    ("name", "Other"),
                    ("bio", "Hello"),
                ],
            )
            .await;

        assert_eq!(res.status, 400);
        assert_eq!(
            res.body["errors"][0],
            "A user with that username already exists."
        );
        assert_eq!(account::Entity::find().count(&app.db).await.unwrap(), 1);
        assert_eq!(profile::Entity::find().count(&app.db).await.unwrap(), 1);
    }
}

mod login {
    use super::*;

    #[tokio::test]
    async fn login_sets_a_session_cookie() {
        let app = TestApp::spawn().await;
        app.signup("alice").await;
        let client = app.client();

        let res = app
            .post_form(
                &client,
                routes::LOGIN,
                &[("username", "alice"), ("password", PASSWORD)],
            )
            .await;
        assert_eq!(res.status, 303);
        assert_eq!(res.location.as_deref(), Some("/"));

        let following = app.get(&client, routes::FOLLOWING).await;
        assert_eq!(following.status, 200);
    }

    #[tokio::test]
    async fn login_continues_to_local_next_only() {
        let app = TestApp::spawn().await;
        app.signup("alice").await;

        let res = app
            .post_form(
                &app.client(),
                routes::LOGIN,
                &[
                    ("username", "alice"),
                    ("password", PASSWORD),
                    ("next", "/following"),
                ],
            )
            .await;
        assert_eq!(res.location.as_deref(), Some("/following"));

        let res = app
            .post_form(
                &app.client(),
                routes::LOGIN,
                &[
                    ("username", "alice"),
                    ("password", PASSWORD),
                    ("next", "//evil.example/"),
                ],
            )
            .await;
        assert_eq!(res.location.as_deref(), Some("/"));
    }

    #[tokio::test]
    async fn wrong_password_is_rejected() {
        let app = TestApp::spawn().await;
        app.signup("alice").await;

        let res = app
            .post_form(
                &app.client(),
                routes::LOGIN,
                &[("username", "alice"), ("password", "not-the-password")],
            )
            .await;

        assert_eq!(res.status, 401);
        assert_eq!(res.body["code"], "INVALID_CREDENTIALS");
    }

    #[tokio::test]
    async fn unknown_user_is_rejected() {
        let app = TestApp::spawn().await;

        let res = app
            .post_form(
                &app.client(),
                routes::LOGIN,
                &[("username", "nobody"), ("password", PASSWORD)],
            )
            .await;

        assert_eq!(res.status, 401);
        assert_eq!(res.body["code"], "INVALID_CREDENTIALS");
    }

    #[tokio::test]
    async fn logout_expires_the_session_cookie() {
        let app = TestApp::spawn().await;
        let user = app.signup("alice").await;

        let res = user
            .client
            .post(app.url(routes::LOGOUT))
            .send()
            .await
            .unwrap();

        assert_eq!(res.status().as_u16(), 303);
        let cookie = res
            .headers()
            .get_all(reqwest::header::SET_COOKIE)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .find(|v| v.starts_with("flock_session="))
            .expect("logout should reset the session cookie")
            .to_string();
        assert!(cookie.contains("Max-Age=0"), "unexpected cookie: {cookie}");
    }
}

mod sessions {
    use super::*;

    #[tokio::test]
    async fn bearer_token_is_accepted() {
        let app = TestApp::spawn().await;
        let user = app.signup("alice").await;
        let token = server::utils::jwt::sign(
            user.account_id,
            user.profile_id,
            &user.username,
            "test-secret-for-integration-tests",
            1,
        )
        .unwrap();

        let res = reqwest::Client::new()
            .get(app.url(routes::FOLLOWING))
            .bearer_auth(token)
            .send()
            .await
            .unwrap();

        assert_eq!(res.status().as_u16(), 200);
    }

    #[tokio::test]
    async fn forged_token_is_rejected() {
        let app = TestApp::spawn().await;

        let res = reqwest::Client::new()
            .get(app.url(routes::FOLLOWING))
            .bearer_auth("not.a.jwt")
            .send()
            .await
            .unwrap();

        assert_eq!(res.status().as_u16(), 401);
        let body: serde_json::Value = res.json().await.unwrap();
        assert_eq!(body["code"], "TOKEN_INVALID");
    }

    #[tokio::test]
    async fn anonymous_post_is_rejected() {
        let app = TestApp::spawn().await;

        let res = app
            .post_form(&app.client(), routes::FEED, &[("content", "hello")])
            .await;

        assert_eq!(res.status, 401);
        assert_eq!(res.body["code"], "TOKEN_MISSING");
    }
}
