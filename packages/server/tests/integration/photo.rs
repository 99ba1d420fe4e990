use std::sync::Arc;

use sea_orm::{ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter};
use server::entity::photo;

use crate::common::{BASE_URL, BUCKET, BrokenPhotoStore, TestApp, routes};

const PNG_BYTES: &[u8] = b"\x89PNG\r\n\x1a\nnot really a png";

async fn stored_photo(app: &TestApp, profile_id: i32) -> Option<photo::Model> {
    photo::Entity::find()
        .filter(photo::Column::ProfileId.eq(profile_id))
        .one(&app.db)
        .await
        .unwrap()
}

#[tokio::test]
async fn upload_stores_the_object_and_records_its_url() {
    let app = TestApp::spawn().await;
    let alice = app.signup("alice").await;

    let res = app
        .upload_photo(&alice.client, alice.profile_id, "me.png", PNG_BYTES.to_vec())
        .await;

    assert_eq!(res.status, 303);
    assert_eq!(
        res.location.as_deref(),
        Some(routes::profile(alice.profile_id).as_str())
    );

    let row = stored_photo(&app, alice.profile_id).await.unwrap();
    let prefix = format!("{BASE_URL}{BUCKET}/profile_photos/");
    assert!(row.url.starts_with(&prefix), "unexpected url {}", row.url);
    assert!(row.url.ends_with(".png"));
    let suffix = &row.object_key["profile_photos/".len()..row.object_key.len() - ".png".len()];
    assert_eq!(suffix.len(), 6);
    assert!(suffix.chars().all(|c| c.is_ascii_hexdigit()));

    let on_disk = std::fs::read(app.object_path(&row.url)).unwrap();
    assert_eq!(on_disk, PNG_BYTES);

    let page = app
        .get(&app.client(), &routes::profile(alice.profile_id))
        .await;
    assert_eq!(page.body["photo_url"], row.url.as_str());
}

#[tokio::test]
async fn replacing_a_photo_keeps_one_row_and_removes_the_old_object() {
    let app = TestApp::spawn().await;
    let alice = app.signup("alice").await;

    app.upload_photo(&alice.client, alice.profile_id, "one.png", PNG_BYTES.to_vec())
        .await;
    let first = stored_photo(&app, alice.profile_id).await.unwrap();

    let res = app
        .upload_photo(&alice.client, alice.profile_id, "two.jpg", b"jpeg".to_vec())
        .await;
    assert_eq!(res.status, 303);

    let second = stored_photo(&app, alice.profile_id).await.unwrap();
    assert_eq!(photo::Entity::find().count(&app.db).await.unwrap(), 1);
    assert_eq!(second.id, first.id);
    assert_ne!(second.url, first.url);
    assert!(second.url.ends_with(".jpg"));

    assert!(!app.object_path(&first.url).exists());
    assert!(app.object_path(&second.url).exists());
}

#[tokio::test]
async fn file_without_extension_gets_a_bare_key() {
    let app = TestApp::spawn().await;
    let alice = app.signup("alice").await;

    app.upload_photo(&alice.client, alice.profile_id, "avatar", PNG_BYTES.to_vec())
        .await;

    let row = stored_photo(&app, alice.profile_id).await.unwrap();
    assert_eq!(row.object_key.len(), "profile_photos/".len() + 6);
}

#[tokio::test]
async fn missing_file_redirects_without_storing() {
    let app = TestApp::spawn().await;
    let alice = app.signup("alice").await;

    let res = app.upload_nothing(&alice.client, alice.profile_id).await;

    assert_eq!(res.status, 303);
    assert!(stored_photo(&app, alice.profile_id).await.is_none());
}

#[tokio::test]
async fn empty_file_name_is_treated_as_no_file() {
    let app = TestApp::spawn().await;
    let alice = app.signup("alice").await;

    let res = app
        .upload_photo(&alice.client, alice.profile_id, "", Vec::new())
        .await;

    assert_eq!(res.status, 303);
    assert!(stored_photo(&app, alice.profile_id).await.is_none());
}

#[tokio::test]
async fn only_the_owner_can_upload() {
    let app = TestApp::spawn().await;
    let alice = app.signup("alice").await;
    let bob = app.signup("bob").await;

    let res = app
        .upload_photo(&bob.client, alice.profile_id, "me.png", PNG_BYTES.to_vec())
        .await;

    assert_eq!(res.status, 403);
    assert!(stored_photo(&app, alice.profile_id).await.is_none());
}

#[tokio::test]
async fn upload_to_unknown_profile_is_not_found() {
    let app = TestApp::spawn().await;
    let alice = app.signup("alice").await;

    let res = app
        .upload_photo(&alice.client, 9999, "me.png", PNG_BYTES.to_vec())
        .await;

    assert_eq!(res.status, 404);
}

#[tokio::test]
async fn oversized_photo_is_rejected() {
    let app = TestApp::spawn().await;
    let alice = app.signup("alice").await;

    let res = app
        .upload_photo(&alice.client, alice.profile_id, "big.png", vec![0u8; 80 * 1024])
        .await;

    assert_eq!(res.status, 400);
    assert_eq!(res.body["code"], "VALIDATION_ERROR");
    assert!(stored_photo(&app, alice.profile_id).await.is_none());
}

#[tokio::test]
async fn storage_failure_is_reported_and_nothing_is_recorded() {
    let app = TestApp::spawn_with_store(Some(Arc::new(BrokenPhotoStore))).await;
    let alice = app.signup("alice").await;

    let res = app
        .upload_photo(&alice.client, alice.profile_id, "me.png", PNG_BYTES.to_vec())
        .await;

    assert_eq!(res.status, 502);
    assert_eq!(res.body["code"], "STORAGE_ERROR");
    assert!(stored_photo(&app, alice.profile_id).await.is_none());
}
