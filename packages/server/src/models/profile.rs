use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::models::post::PostResponse;

/// Profile page.
#[derive(Serialize, utoipa::ToSchema)]
pub struct ProfileDetailResponse {
    #[schema(example = 7)]
    pub id: i32,
    #[schema(example = "alice")]
    pub name: String,
    #[schema(example = "Birdwatcher. Coffee first.")]
    pub bio: String,
    /// Public URL of the profile photo, if one was uploaded.
    #[schema(example = "https://s3.amazonaws.com/flock-photos/profile_photos/a1b2c3.jpg")]
    pub photo_url: Option<String>,
    pub created_at: DateTime<Utc>,
    /// The profile's posts, newest first.
    pub posts: Vec<PostResponse>,
    /// Number of profiles following this one.
    #[schema(example = 12)]
    pub followers_count: u64,
    /// Number of profiles this one follows.
    #[schema(example = 5)]
    pub following_count: u64,
    /// Whether the caller follows this profile. Absent for anonymous requests.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_following: Option<bool>,
}
