pub mod auth;
pub mod feed;
pub mod post;
pub mod profile;
