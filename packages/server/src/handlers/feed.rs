use std::collections::{HashMap, HashSet};

use axum::Json;
use axum::extract::State;
use axum::response::Redirect;
use sea_orm::*;
use tracing::instrument;

use crate::entity::{post, post_like, profile, profile_follow};
use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::{AuthUser, Session};
use crate::extractors::form::AppForm;
use crate::models::post::{FeedResponse, PostForm, PostResponse, ProfileSummary};
use crate::models::shared::validate_post_content;
use crate::state::AppState;

#[utoipa::path(
    get,
    path = "/",
    tag = "Feed",
    operation_id = "getFeed",
    summary = "List all posts, newest first",
    description = "Returns every post ordered by descending ID. With a session, each post \
        reports whether the caller likes it and the caller's profile is included for the \
        new-post form.",
    responses(
        (status = 200, description = "Feed", body = FeedResponse),
    ),
)]
#[instrument(skip(state, session))]
pub async fn feed(
    session: Session,
    State(state): State<AppState>,
) -> Result<Json<FeedResponse>, AppError> {
    let rows = post::Entity::find()
        .find_also_related(profile::Entity)
        .order_by_desc(post::Column::Id)
        .all(&state.db)
        .await?;

    let posts = post_views(&state.db, rows, session.profile_id()).await?;

    let profile = match session.profile_id() {
        Some(profile_id) => profile::Entity::find_by_id(profile_id)
            .one(&state.db)
            .await?
            .map(ProfileSummary::from),
        None => None,
    };

    Ok(Json(FeedResponse { posts, profile }))
}

#[utoipa::path(
    post,
    path = "/",
    tag = "Feed",
    operation_id = "createPost",
    summary = "Publish a new post",
    description = "Creates a post owned by the caller's profile and redirects back to the feed.",
    request_body(content = PostForm, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 303, description = "Post created, redirect to `/`"),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
    ),
    security(("session" = [])),
)]
#[instrument(skip(state, auth_user, form), fields(profile_id = auth_user.profile_id))]
pub async fn create_post(
    auth_user: AuthUser,
    State(state): State<AppState>,
    AppForm(form): AppForm<PostForm>,
) -> Result<Redirect, AppError> {
    let content = validate_post_content(&form.content)?;

    let new_post = post::ActiveModel {
        content: Set(content),
        profile_id: Set(auth_user.profile_id),
        created_at: Set(chrono::Utc::now()),
        ..Default::default()
    };
    let model = new_post.insert(&state.db).await?;
    tracing::info!(post_id = model.id, "Post created");

    Ok(Redirect::to("/"))
}

#[utoipa::path(
    get,
    path = "/following",
    tag = "Feed",
    operation_id = "getFollowingFeed",
    summary = "List posts from followed profiles",
    description = "Returns posts authored by profiles the caller follows, newest first.",
    responses(
        (status = 200, description = "Following feed", body = FeedResponse),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
    ),
    security(("session" = [])),
)]
#[instrument(skip(state, auth_user), fields(profile_id = auth_user.profile_id))]
pub async fn following_feed(
    auth_user: AuthUser,
    State(state): State<AppState>,
) -> Result<Json<FeedResponse>, AppError> {
    let followed: Vec<i32> = profile_follow::Entity::find()
        .filter(profile_follow::Column::FollowerId.eq(auth_user.profile_id))
        .all(&state.db)
        .await?
        .into_iter()
        .map(|f| f.followed_id)
        .collect();

    let rows = if followed.is_empty() {
        Vec::new()
    } else {
        post::Entity::find()
            .filter(post::Column::ProfileId.is_in(followed))
            .find_also_related(profile::Entity)
            .order_by_desc(post::Column::Id)
            .all(&state.db)
            .await?
    };

    let posts = post_views(&state.db, rows, Some(auth_user.profile_id)).await?;
    let profile = profile::Entity::find_by_id(auth_user.profile_id)
        .one(&state.db)
        .await?
        .map(ProfileSummary::from);

    Ok(Json(FeedResponse { posts, profile }))
}

/// Attach author names and like counts to posts, preserving their order.
///
/// `viewer` is the caller's profile ID; when set, each post also reports
/// whether the viewer likes it.
pub(crate) async fn post_views<C: ConnectionTrait>(
    db: &C,
    rows: Vec<(post::Model, Option<profile::Model>)>,
    viewer: Option<i32>,
) -> Result<Vec<PostResponse>, AppError> {
    if rows.is_empty() {
        return Ok(Vec::new());
    }

    let ids: Vec<i32> = rows.iter().map(|(p, _)| p.id).collect();
    let likes = post_like::Entity::find()
        .filter(post_like::Column::PostId.is_in(ids))
        .all(db)
        .await?;

    let mut counts: HashMap<i32, u64> = HashMap::new();
    let mut liked_by_viewer: HashSet<i32> = HashSet::new();
    for like in likes {
        *counts.entry(like.post_id).or_default() += 1;
        if viewer == Some(like.profile_id) {
            liked_by_viewer.insert(like.post_id);
        }
    }

    Ok(rows
        .into_iter()
        .map(|(p, author)| PostResponse {
            id: p.id,
            content: p.content,
            profile_id: p.profile_id,
            profile_name: author.map(|a| a.name).unwrap_or_default(),
            created_at: p.created_at,
            likes_count: counts.get(&p.id).copied().unwrap_or(0),
            liked: viewer.map(|_| liked_by_viewer.contains(&p.id)),
        })
        .collect())
}
