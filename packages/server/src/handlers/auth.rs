use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Redirect, Response};
use axum_extra::extract::cookie::CookieJar;
use sea_orm::*;
use tracing::instrument;

use crate::entity::{account, profile};
use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::{expired_session_cookie, session_cookie};
use crate::extractors::form::AppForm;
use crate::models::auth::{
    LoginForm, SignupErrorResponse, SignupForm, SignupPageResponse, validate_signup,
};
use crate::state::AppState;
use crate::utils::password::PasswordPolicy;
use crate::utils::redirect::is_local_path;
use crate::utils::{hash, jwt};

const USERNAME_TAKEN: &str = "A user with that username already exists.";

#[utoipa::path(
    get,
    path = "/signup",
    tag = "Auth",
    operation_id = "getSignupForm",
    summary = "Signup form context",
    description = "Returns the help texts of the configured password rules.",
    responses(
        (status = 200, description = "Signup form context", body = SignupPageResponse),
    ),
)]
pub async fn signup_form(State(state): State<AppState>) -> Json<SignupPageResponse> {
    let policy = PasswordPolicy::from_config(&state.config.auth);
    Json(SignupPageResponse {
        help_texts: policy.help_texts(),
    })
}

#[utoipa::path(
    post,
    path = "/signup",
    tag = "Auth",
    operation_id = "signup",
    summary = "Create an account and profile",
    description = "Creates the account and its profile in one transaction, starts a session \
        and redirects to the feed. A rejected submission returns the form errors together \
        with the password rules.",
    request_body(content = SignupForm, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 303, description = "Signed up; session cookie set, redirect to `/`"),
        (status = 400, description = "Invalid signup", body = SignupErrorResponse),
    ),
)]
#[instrument(skip(state, jar, form), fields(username = %form.username))]
pub async fn signup(
    State(state): State<AppState>,
    jar: CookieJar,
    AppForm(form): AppForm<SignupForm>,
) -> Result<Response, AppError> {
    let policy = PasswordPolicy::from_config(&state.config.auth);
    let valid = match validate_signup(&form, &policy) {
        Ok(valid) => valid,
        Err(errors) => return Ok(signup_rejected(errors, &policy)),
    };

    let taken = account::Entity::find()
        .filter(account::Column::Username.eq(valid.username.as_str()))
        .one(&state.db)
        .await?
        .is_some();
    if taken {
        return Ok(signup_rejected(vec![USERNAME_TAKEN.into()], &policy));
    }

    let password_hash = hash::hash_password(&valid.password)
        .map_err(|e| AppError::Internal(format!("Password hash error: {}", e)))?;

    let now = chrono::Utc::now();
    let txn = state.db.begin().await?;

    let new_account = account::ActiveModel {
        username: Set(valid.username.clone()),
        password: Set(password_hash),
        created_at: Set(now),
        ..Default::default()
    };
    let account = match new_account.insert(&txn).await {
        Ok(account) => account,
        Err(e) => match e.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(_)) => {
                tracing::debug!("Signup race condition: unique constraint caught on insert");
                return Ok(signup_rejected(vec![USERNAME_TAKEN.into()], &policy));
            }
            _ => return Err(AppError::from(e)),
        },
    };

    let new_profile = profile::ActiveModel {
        name: Set(valid.name),
        bio: Set(valid.bio),
        account_id: Set(account.id),
        created_at: Set(now),
        ..Default::default()
    };
    let profile = new_profile.insert(&txn).await?;
    txn.commit().await?;

    tracing::info!(account_id = account.id, profile_id = profile.id, "Signed up");

    let token = sign_session(&state, account.id, profile.id, &account.username)?;
    let jar = jar.add(session_cookie(token, &state.config.auth));

    Ok((jar, Redirect::to("/")).into_response())
}

fn signup_rejected(errors: Vec<String>, policy: &PasswordPolicy) -> Response {
    (
        StatusCode::BAD_REQUEST,
        Json(SignupErrorResponse::new(errors, policy)),
    )
        .into_response()
}

#[utoipa::path(
    post,
    path = "/login",
    tag = "Auth",
    operation_id = "login",
    summary = "Start a session",
    description = "Verifies the credentials, sets the session cookie and redirects to `next` \
        (a local path) or the feed.",
    request_body(content = LoginForm, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 303, description = "Logged in; session cookie set"),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Bad credentials (INVALID_CREDENTIALS)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, jar, form), fields(username = %form.username))]
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    AppForm(form): AppForm<LoginForm>,
) -> Result<(CookieJar, Redirect), AppError> {
    let username = form.username.trim();
    if username.is_empty() || form.password.is_empty() {
        return Err(AppError::Validation(
            "Username and password must not be empty".into(),
        ));
    }

    let account = account::Entity::find()
        .filter(account::Column::Username.eq(username))
        .one(&state.db)
        .await?
        .ok_or(AppError::InvalidCredentials)?;

    let is_valid = hash::verify_password(&form.password, &account.password)
        .map_err(|e| AppError::Internal(format!("Password verify error: {}", e)))?;
    if !is_valid {
        return Err(AppError::InvalidCredentials);
    }

    let profile = profile::Entity::find()
        .filter(profile::Column::AccountId.eq(account.id))
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::Internal(format!("Account {} has no profile", account.id)))?;

    let token = sign_session(&state, account.id, profile.id, &account.username)?;
    let next = form
        .next
        .as_deref()
        .filter(|next| is_local_path(next))
        .unwrap_or("/");

    Ok((
        jar.add(session_cookie(token, &state.config.auth)),
        Redirect::to(next),
    ))
}

#[utoipa::path(
    post,
    path = "/logout",
    tag = "Auth",
    operation_id = "logout",
    summary = "End the session",
    responses(
        (status = 303, description = "Session cookie cleared, redirect to `/`"),
    ),
)]
pub async fn logout(jar: CookieJar) -> (CookieJar, Redirect) {
    (jar.remove(expired_session_cookie()), Redirect::to("/"))
}

fn sign_session(
    state: &AppState,
    account_id: i32,
    profile_id: i32,
    username: &str,
) -> Result<String, AppError> {
    jwt::sign(
        account_id,
        profile_id,
        username,
        &state.config.auth.jwt_secret,
        state.config.auth.session_days,
    )
    .map_err(|e| AppError::Internal(format!("JWT sign error: {}", e)))
}
