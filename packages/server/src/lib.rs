pub mod config;
pub mod database;
pub mod entity;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod state;
pub mod utils;

use std::time::Duration;

use axum::http::{HeaderValue, Method, header};
use tower_http::cors::{AllowOrigin, CorsLayer};
use tracing::warn;
use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};
use utoipa_scalar::{Scalar, Servable as ScalarServable};
use utoipa_swagger_ui::SwaggerUi;

use crate::config::CorsConfig;
use crate::extractors::auth::SESSION_COOKIE;
use crate::handlers::{auth, feed, post, profile};
use crate::state::AppState;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Flock API",
        version = "1.0.0",
        description = "Profiles, posts, follows, likes and profile photos"
    ),
    paths(
        feed::feed,
        feed::create_post,
        feed::following_feed,
        auth::signup_form,
        auth::signup,
        auth::login,
        auth::logout,
        profile::profile_detail,
        profile::follow_profile,
        profile::unfollow_profile,
        profile::upload_photo,
        post::like_post,
        post::unlike_post,
        post::edit_post_form,
        post::edit_post,
        post::delete_post_form,
        post::delete_post,
    ),
    tags(
        (name = "Feed", description = "Global and following feeds, posting"),
        (name = "Auth", description = "Signup, login and logout"),
        (name = "Profiles", description = "Profile pages, follows and photos"),
        (name = "Posts", description = "Likes, editing and deleting posts"),
    ),
    modifiers(&SecurityAddon),
)]
struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_default();
        components.add_security_scheme(
            "session",
            SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::new(SESSION_COOKIE))),
        );
    }
}

/// Build the application router.
pub fn build_router(state: AppState) -> axum::Router {
    let cors = cors_layer(&state.config.server.cors);

    routes::routes(&state.config)
        .with_state(state)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .merge(Scalar::with_url("/scalar", ApiDoc::openapi()))
        .layer(cors)
}

fn cors_layer(config: &CorsConfig) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
        .max_age(Duration::from_secs(config.max_age));

    // Credentials cannot be combined with a wildcard origin.
    if config.allow_origins.iter().any(|origin| origin == "*") {
        return layer.allow_origin(AllowOrigin::any());
    }

    let origins: Vec<HeaderValue> = config
        .allow_origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    layer
        .allow_origin(AllowOrigin::list(origins))
        .allow_credentials(true)
}
