use axum::Json;
use axum::extract::{Path, State};
use axum::http::HeaderMap;
use axum::response::Redirect;
use sea_orm::sea_query::OnConflict;
use sea_orm::*;
use tracing::instrument;

use crate::entity::{post, post_like, profile};
use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::AuthUser;
use crate::extractors::form::AppForm;
use crate::handlers::feed::post_views;
use crate::models::post::{PostForm, PostResponse};
use crate::models::shared::validate_post_content;
use crate::state::AppState;
use crate::utils::redirect::back_to_referrer;

#[utoipa::path(
    post,
    path = "/post/{id}/like",
    tag = "Posts",
    operation_id = "likePost",
    summary = "Like a post",
    description = "Adds the caller to the post's likes. Liking an already-liked post is a no-op. \
        Redirects to the referring page, or the feed when there is none.",
    params(("id" = i32, Path, description = "Post ID")),
    responses(
        (status = 303, description = "Liked, redirect to referrer"),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 404, description = "Post not found (NOT_FOUND)", body = ErrorBody),
        (status = 405, description = "Method not allowed"),
    ),
    security(("session" = [])),
)]
#[instrument(skip(state, auth_user, headers), fields(profile_id = auth_user.profile_id))]
pub async fn like_post(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
    headers: HeaderMap,
) -> Result<Redirect, AppError> {
    find_post(&state.db, id).await?;

    let like = post_like::ActiveModel {
        post_id: Set(id),
        profile_id: Set(auth_user.profile_id),
        created_at: Set(chrono::Utc::now()),
    };
    post_like::Entity::insert(like)
        .on_conflict(
            OnConflict::columns([post_like::Column::PostId, post_like::Column::ProfileId])
                .do_nothing()
                .to_owned(),
        )
        .exec_without_returning(&state.db)
        .await?;

    Ok(Redirect::to(&back_to_referrer(&headers, "/")))
}

#[utoipa::path(
    post,
    path = "/post/{id}/unlike",
    tag = "Posts",
    operation_id = "unlikePost",
    summary = "Remove a like",
    description = "Removes the caller from the post's likes. Unliking a post the caller does not \
        like is a no-op. Redirects to the referring page, or the feed when there is none.",
    params(("id" = i32, Path, description = "Post ID")),
    responses(
        (status = 303, description = "Unliked, redirect to referrer"),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 404, description = "Post not found (NOT_FOUND)", body = ErrorBody),
        (status = 405, description = "Method not allowed"),
    ),
    security(("session" = [])),
)]
#[instrument(skip(state, auth_user, headers), fields(profile_id = auth_user.profile_id))]
pub async fn unlike_post(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
    headers: HeaderMap,
) -> Result<Redirect, AppError> {
    find_post(&state.db, id).await?;

    post_like::Entity::delete_many()
        .filter(post_like::Column::PostId.eq(id))
        .filter(post_like::Column::ProfileId.eq(auth_user.profile_id))
        .exec(&state.db)
        .await?;

    Ok(Redirect::to(&back_to_referrer(&headers, "/")))
}

#[utoipa::path(
    get,
    path = "/post/{id}/edit",
    tag = "Posts",
    operation_id = "getPostForEdit",
    summary = "Post edit form",
    description = "Returns the post to prefill the edit form. Only the author may edit.",
    params(("id" = i32, Path, description = "Post ID")),
    responses(
        (status = 200, description = "Post", body = PostResponse),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Not the author (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Post not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("session" = [])),
)]
#[instrument(skip(state, auth_user), fields(profile_id = auth_user.profile_id))]
pub async fn edit_post_form(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<PostResponse>, AppError> {
    owned_post_view(&state.db, &auth_user, id).await.map(Json)
}

#[utoipa::path(
    post,
    path = "/post/{id}/edit",
    tag = "Posts",
    operation_id = "editPost",
    summary = "Edit a post",
    description = "Replaces the post's content. The creation time is unchanged. Only the author \
        may edit.",
    params(("id" = i32, Path, description = "Post ID")),
    request_body(content = PostForm, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 303, description = "Updated, redirect to `/`"),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Not the author (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Post not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("session" = [])),
)]
#[instrument(skip(state, auth_user, form), fields(profile_id = auth_user.profile_id))]
pub async fn edit_post(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
    AppForm(form): AppForm<PostForm>,
) -> Result<Redirect, AppError> {
    let content = validate_post_content(&form.content)?;

    let existing = find_post(&state.db, id).await?;
    auth_user.require_owner(existing.profile_id)?;

    let mut active: post::ActiveModel = existing.into();
    active.content = Set(content);
    active.update(&state.db).await?;

    Ok(Redirect::to("/"))
}

#[utoipa::path(
    get,
    path = "/post/{id}/delete",
    tag = "Posts",
    operation_id = "getPostForDelete",
    summary = "Post delete confirmation",
    description = "Returns the post to confirm deletion. Only the author may delete.",
    params(("id" = i32, Path, description = "Post ID")),
    responses(
        (status = 200, description = "Post", body = PostResponse),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Not the author (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Post not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("session" = [])),
)]
#[instrument(skip(state, auth_user), fields(profile_id = auth_user.profile_id))]
pub async fn delete_post_form(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<PostResponse>, AppError> {
    owned_post_view(&state.db, &auth_user, id).await.map(Json)
}

#[utoipa::path(
    post,
    path = "/post/{id}/delete",
    tag = "Posts",
    operation_id = "deletePost",
    summary = "Delete a post",
    description = "Deletes the post and its likes. Only the author may delete.",
    params(("id" = i32, Path, description = "Post ID")),
    responses(
        (status = 303, description = "Deleted, redirect to `/`"),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Not the author (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Post not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("session" = [])),
)]
#[instrument(skip(state, auth_user), fields(profile_id = auth_user.profile_id))]
pub async fn delete_post(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Redirect, AppError> {
    let txn = state.db.begin().await?;

    let existing = find_post(&txn, id).await?;
    auth_user.require_owner(existing.profile_id)?;

    post_like::Entity::delete_many()
        .filter(post_like::Column::PostId.eq(id))
        .exec(&txn)
        .await?;
    post::Entity::delete_by_id(id).exec(&txn).await?;

    txn.commit().await?;
    tracing::info!(post_id = id, "Post deleted");

    Ok(Redirect::to("/"))
}

async fn find_post<C: ConnectionTrait>(db: &C, id: i32) -> Result<post::Model, AppError> {
    post::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| AppError::NotFound("Post not found".into()))
}

async fn owned_post_view<C: ConnectionTrait>(
    db: &C,
    auth_user: &AuthUser,
    id: i32,
) -> Result<PostResponse, AppError> {
    let (existing, author) = post::Entity::find_by_id(id)
        .find_also_related(profile::Entity)
        .one(db)
        .await?
        .ok_or_else(|| AppError::NotFound("Post not found".into()))?;
    auth_user.require_owner(existing.profile_id)?;

    post_views(db, vec![(existing, author)], Some(auth_user.profile_id))
        .await?
        .pop()
        .ok_or_else(|| AppError::Internal(format!("post {id} vanished while rendering")))
}
