use axum::{
    Router,
    routing::{get, post},
};

use crate::config::AppConfig;
use crate::handlers;
use crate::state::AppState;

/// Every route of the site. Mutating endpoints are registered for POST only,
/// so any other method gets 405.
pub fn routes(config: &AppConfig) -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::feed::feed).post(handlers::feed::create_post))
        .route("/following", get(handlers::feed::following_feed))
        .merge(auth_routes())
        .nest("/profile", profile_routes(config))
        .nest("/post", post_routes())
}

fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/signup", get(handlers::auth::signup_form).post(handlers::auth::signup))
        .route("/login", post(handlers::auth::login))
        .route("/logout", post(handlers::auth::logout))
}

fn profile_routes(config: &AppConfig) -> Router<AppState> {
    let upload = Router::new()
        .route("/{id}/photo", post(handlers::profile::upload_photo))
        .layer(handlers::profile::photo_upload_body_limit(
            config.storage.max_photo_size,
        ));

    Router::new()
        .route("/{id}", get(handlers::profile::profile_detail))
        .route("/{id}/follow", post(handlers::profile::follow_profile))
        .route("/{id}/unfollow", post(handlers::profile::unfollow_profile))
        .merge(upload)
}

fn post_routes() -> Router<AppState> {
    Router::new()
        .route("/{id}/like", post(handlers::post::like_post))
        .route("/{id}/unlike", post(handlers::post::unlike_post))
        .route(
            "/{id}/edit",
            get(handlers::post::edit_post_form).post(handlers::post::edit_post),
        )
        .route(
            "/{id}/delete",
            get(handlers::post::delete_post_form).post(handlers::post::delete_post),
        )
}
