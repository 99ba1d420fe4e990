use std::convert::Infallible;

use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts},
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};

use crate::config::AuthConfig;
use crate::error::AppError;
use crate::state::AppState;
use crate::utils::jwt;

/// Name of the cookie carrying the session token.
pub const SESSION_COOKIE: &str = "flock_session";

/// Authenticated caller, resolved from the session token.
///
/// The token is read from `Authorization: Bearer <token>` when present,
/// otherwise from the session cookie. Add this as a handler parameter to
/// require a session.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub account_id: i32,
    pub profile_id: i32,
    pub username: String,
}

impl AuthUser {
    /// Returns `Ok(())` if the caller owns `profile_id`, `Err(PermissionDenied)` otherwise.
    pub fn require_owner(&self, profile_id: i32) -> Result<(), AppError> {
        if self.profile_id == profile_id {
            Ok(())
        } else {
            Err(AppError::PermissionDenied)
        }
    }
}

fn session_token(parts: &Parts) -> Result<Option<String>, AppError> {
    if let Some(value) = parts.headers.get(header::AUTHORIZATION) {
        let value = value.to_str().map_err(|_| AppError::TokenInvalid)?;
        let token = value
            .strip_prefix("Bearer ")
            .ok_or(AppError::TokenInvalid)?;
        return Ok(Some(token.to_string()));
    }

    let jar = CookieJar::from_headers(&parts.headers);
    Ok(jar.get(SESSION_COOKIE).map(|c| c.value().to_string()))
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = session_token(parts)?.ok_or(AppError::TokenMissing)?;

        let claims = jwt::verify(&token, &state.config.auth.jwt_secret)
            .map_err(|_| AppError::TokenInvalid)?;

        Ok(AuthUser {
            account_id: claims.uid,
            profile_id: claims.pid,
            username: claims.sub,
        })
    }
}

/// The caller's session, if any. Never rejects: a missing or invalid
/// token is treated as an anonymous request.
#[derive(Debug, Clone, Default)]
pub struct Session(pub Option<AuthUser>);

impl Session {
    pub fn user(&self) -> Option<&AuthUser> {
        self.0.as_ref()
    }

    pub fn profile_id(&self) -> Option<i32> {
        self.0.as_ref().map(|u| u.profile_id)
    }
}

impl FromRequestParts<AppState> for Session {
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        Ok(Session(AuthUser::from_request_parts(parts, state).await.ok()))
    }
}

/// Build the session cookie for a freshly signed token.
pub fn session_cookie(token: String, config: &AuthConfig) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, token))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(config.secure_cookie)
        .max_age(time::Duration::days(config.session_days))
        .build()
}

/// Cookie that, when removed from a jar, clears the session.
pub fn expired_session_cookie() -> Cookie<'static> {
    Cookie::build(SESSION_COOKIE).path("/").build()
}
