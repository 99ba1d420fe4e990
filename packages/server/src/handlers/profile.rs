use axum::Json;
use axum::extract::{DefaultBodyLimit, Multipart, Path, State};
use axum::response::Redirect;
use common::storage::photo_key;
use sea_orm::sea_query::OnConflict;
use sea_orm::*;
use tracing::{debug, error, info, instrument, warn};

use crate::entity::{photo, post, profile, profile_follow};
use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::{AuthUser, Session};
use crate::handlers::feed::post_views;
use crate::models::profile::ProfileDetailResponse;
use crate::state::AppState;

/// Multipart field carrying the photo file.
pub const PHOTO_FIELD: &str = "photo-file";

/// Body limit for the upload route: the photo plus room for multipart framing.
pub fn photo_upload_body_limit(max_photo_size: u64) -> DefaultBodyLimit {
    let limit = max_photo_size.saturating_add(64 * 1024);
    DefaultBodyLimit::max(usize::try_from(limit).unwrap_or(usize::MAX))
}

#[utoipa::path(
    get,
    path = "/profile/{id}",
    tag = "Profiles",
    operation_id = "getProfile",
    summary = "Profile page",
    description = "Returns the profile, its photo, its posts (newest first) and follower / \
        following counts. With a session, also reports whether the caller follows it.",
    params(("id" = i32, Path, description = "Profile ID")),
    responses(
        (status = 200, description = "Profile", body = ProfileDetailResponse),
        (status = 404, description = "Profile not found (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, session))]
pub async fn profile_detail(
    session: Session,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<ProfileDetailResponse>, AppError> {
    let profile = find_profile(&state.db, id).await?;

    let photo_url = photo::Entity::find()
        .filter(photo::Column::ProfileId.eq(id))
        .one(&state.db)
        .await?
        .map(|p| p.url);

    let rows = post::Entity::find()
        .filter(post::Column::ProfileId.eq(id))
        .order_by_desc(post::Column::Id)
        .all(&state.db)
        .await?
        .into_iter()
        .map(|p| (p, Some(profile.clone())))
        .collect();
    let posts = post_views(&state.db, rows, session.profile_id()).await?;

    let followers_count = profile_follow::Entity::find()
        .filter(profile_follow::Column::FollowedId.eq(id))
        .count(&state.db)
        .await?;
    let following_count = profile_follow::Entity::find()
        .filter(profile_follow::Column::FollowerId.eq(id))
        .count(&state.db)
        .await?;

    let is_following = match session.profile_id() {
        Some(viewer) => Some(
            profile_follow::Entity::find_by_id((viewer, id))
                .one(&state.db)
                .await?
                .is_some(),
        ),
        None => None,
    };

    Ok(Json(ProfileDetailResponse {
        id: profile.id,
        name: profile.name,
        bio: profile.bio,
        photo_url,
        created_at: profile.created_at,
        posts,
        followers_count,
        following_count,
        is_following,
    }))
}

#[utoipa::path(
    post,
    path = "/profile/{id}/follow",
    tag = "Profiles",
    operation_id = "followProfile",
    summary = "Follow a profile",
    description = "Adds the profile to the caller's following set. Following an already-followed \
        profile is a no-op. A profile cannot follow itself.",
    params(("id" = i32, Path, description = "Profile ID")),
    responses(
        (status = 303, description = "Followed, redirect to the profile"),
        (status = 400, description = "Self-follow (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 404, description = "Profile not found (NOT_FOUND)", body = ErrorBody),
        (status = 405, description = "Method not allowed"),
    ),
    security(("session" = [])),
)]
#[instrument(skip(state, auth_user), fields(follower_id = auth_user.profile_id))]
pub async fn follow_profile(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Redirect, AppError> {
    find_profile(&state.db, id).await?;
    if id == auth_user.profile_id {
        return Err(AppError::Validation("You cannot follow yourself".into()));
    }

    let edge = profile_follow::ActiveModel {
        follower_id: Set(auth_user.profile_id),
        followed_id: Set(id),
        created_at: Set(chrono::Utc::now()),
    };
    profile_follow::Entity::insert(edge)
        .on_conflict(
            OnConflict::columns([
                profile_follow::Column::FollowerId,
                profile_follow::Column::FollowedId,
            ])
            .do_nothing()
            .to_owned(),
        )
        .exec_without_returning(&state.db)
        .await?;

    Ok(Redirect::to(&format!("/profile/{id}")))
}

#[utoipa::path(
    post,
    path = "/profile/{id}/unfollow",
    tag = "Profiles",
    operation_id = "unfollowProfile",
    summary = "Unfollow a profile",
    description = "Removes the profile from the caller's following set. Unfollowing a profile \
        that is not followed is a no-op.",
    params(("id" = i32, Path, description = "Profile ID")),
    responses(
        (status = 303, description = "Unfollowed, redirect to the profile"),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 404, description = "Profile not found (NOT_FOUND)", body = ErrorBody),
        (status = 405, description = "Method not allowed"),
    ),
    security(("session" = [])),
)]
#[instrument(skip(state, auth_user), fields(follower_id = auth_user.profile_id))]
pub async fn unfollow_profile(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Redirect, AppError> {
    find_profile(&state.db, id).await?;

    profile_follow::Entity::delete_by_id((auth_user.profile_id, id))
        .exec(&state.db)
        .await?;

    Ok(Redirect::to(&format!("/profile/{id}")))
}

#[utoipa::path(
    post,
    path = "/profile/{id}/photo",
    tag = "Profiles",
    operation_id = "uploadProfilePhoto",
    summary = "Upload or replace the profile photo",
    description = "Stores the `photo-file` multipart field in the object store under a random \
        key and records its public URL, replacing any previous photo (whose object is then \
        deleted). A request without a file is a no-op. Only the profile's owner may upload.",
    params(("id" = i32, Path, description = "Profile ID")),
    request_body(content_type = "multipart/form-data", description = "Photo upload in field `photo-file`"),
    responses(
        (status = 303, description = "Stored (or nothing to store), redirect to the profile"),
        (status = 400, description = "Malformed or oversized upload (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Not the owner (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Profile not found (NOT_FOUND)", body = ErrorBody),
        (status = 502, description = "Object store failed (STORAGE_ERROR)", body = ErrorBody),
    ),
    security(("session" = [])),
)]
#[instrument(skip(state, auth_user, multipart), fields(profile_id = id))]
pub async fn upload_photo(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
    mut multipart: Multipart,
) -> Result<Redirect, AppError> {
    find_profile(&state.db, id).await?;
    auth_user.require_owner(id)?;

    let back = Redirect::to(&format!("/profile/{id}"));
    let max_size = state.config.storage.max_photo_size;

    let mut upload: Option<(String, Vec<u8>)> = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Multipart error: {e}")))?
    {
        if field.name() != Some(PHOTO_FIELD) {
            continue; // Ignore unknown fields.
        }
        let file_name = field.file_name().unwrap_or_default().to_string();
        let data = read_field_limited(field, max_size).await?;
        // Browsers send an empty, unnamed part when no file was chosen.
        if !file_name.is_empty() {
            upload = Some((file_name, data));
        }
    }

    let Some((file_name, data)) = upload else {
        debug!("No photo in request, nothing to store");
        return Ok(back);
    };

    let key = photo_key(&state.config.storage.key_prefix, &file_name);
    let content_type = mime_guess::from_path(&file_name)
        .first_or_octet_stream()
        .to_string();

    if let Err(e) = state.photos.put(&key, &data, &content_type).await {
        error!(key = %key, error = %e, "Failed to upload photo to object store");
        return Err(e.into());
    }
    let url = state.photos.public_url(&key);

    let previous = photo::Entity::find()
        .filter(photo::Column::ProfileId.eq(id))
        .one(&state.db)
        .await?;

    let new_photo = photo::ActiveModel {
        url: Set(url.clone()),
        object_key: Set(key.clone()),
        profile_id: Set(id),
        updated_at: Set(chrono::Utc::now()),
        ..Default::default()
    };
    let saved = photo::Entity::insert(new_photo)
        .on_conflict(
            OnConflict::column(photo::Column::ProfileId)
                .update_columns([
                    photo::Column::Url,
                    photo::Column::ObjectKey,
                    photo::Column::UpdatedAt,
                ])
                .to_owned(),
        )
        .exec_without_returning(&state.db)
        .await;

    if let Err(e) = saved {
        if let Err(cleanup) = state.photos.delete(&key).await {
            warn!(key = %key, error = %cleanup, "Failed to remove unrecorded photo object");
        }
        return Err(e.into());
    }

    if let Some(previous) = previous
        && previous.object_key != key
        && let Err(e) = state.photos.delete(&previous.object_key).await
    {
        warn!(key = %previous.object_key, error = %e, "Failed to delete replaced photo object");
    }

    info!(key = %key, url = %url, size = data.len(), "Profile photo stored");
    Ok(back)
}

/// Read a multipart field into memory, rejecting it once it exceeds `max_size` bytes.
async fn read_field_limited(
    mut field: axum::extract::multipart::Field<'_>,
    max_size: u64,
) -> Result<Vec<u8>, AppError> {
    let mut data = Vec::new();
    while let Some(chunk) = field
        .chunk()
        .await
        .map_err(|e| AppError::Validation(format!("Upload read error: {e}")))?
    {
        if (data.len() + chunk.len()) as u64 > max_size {
            return Err(AppError::Validation(format!(
                "Photo exceeds maximum size of {max_size} bytes"
            )));
        }
        data.extend_from_slice(&chunk);
    }
    Ok(data)
}

async fn find_profile<C: ConnectionTrait>(db: &C, id: i32) -> Result<profile::Model, AppError> {
    profile::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| AppError::NotFound("Profile not found".into()))
}
