pub mod account;
pub mod photo;
pub mod post;
pub mod post_like;
pub mod profile;
pub mod profile_follow;
