use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Form body for creating or editing a post.
#[derive(Deserialize, utoipa::ToSchema)]
pub struct PostForm {
    /// Post text, 1-256 characters.
    #[schema(example = "Hello, flock!")]
    pub content: String,
}

/// A post as shown in feeds and on profile pages.
#[derive(Serialize, utoipa::ToSchema)]
pub struct PostResponse {
    #[schema(example = 42)]
    pub id: i32,
    #[schema(example = "Hello, flock!")]
    pub content: String,
    /// Author profile ID.
    #[schema(example = 7)]
    pub profile_id: i32,
    /// Author display name.
    #[schema(example = "alice")]
    pub profile_name: String,
    pub created_at: DateTime<Utc>,
    #[schema(example = 3)]
    pub likes_count: u64,
    /// Whether the caller likes this post. Absent for anonymous requests.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub liked: Option<bool>,
}

/// The caller's own profile, shown above the new-post form.
#[derive(Serialize, utoipa::ToSchema)]
pub struct ProfileSummary {
    #[schema(example = 7)]
    pub id: i32,
    #[schema(example = "alice")]
    pub name: String,
}

impl From<crate::entity::profile::Model> for ProfileSummary {
    fn from(profile: crate::entity::profile::Model) -> Self {
        Self {
            id: profile.id,
            name: profile.name,
        }
    }
}

/// Feed page: every post, newest first.
#[derive(Serialize, utoipa::ToSchema)]
pub struct FeedResponse {
    pub posts: Vec<PostResponse>,
    /// Present when the request carries a session.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile: Option<ProfileSummary>,
}
