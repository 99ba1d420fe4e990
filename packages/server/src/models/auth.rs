use serde::{Deserialize, Serialize};

use crate::models::shared::{MAX_BIO_CHARS, MAX_PROFILE_NAME_CHARS, bounded_text};
use crate::utils::password::PasswordPolicy;

pub const MAX_USERNAME_CHARS: usize = 150;

/// Shown above the signup form whenever a submission is rejected.
pub const SIGNUP_FAILED_MESSAGE: &str =
    "Invalid sign up. Please check your information and try again.";

/// Form body for signup: account credentials plus the new profile.
#[derive(Deserialize, utoipa::ToSchema)]
pub struct SignupForm {
    /// 1-150 characters: letters, digits and `@ . + - _`.
    #[schema(example = "alice_wonder")]
    pub username: String,
    #[schema(example = "t4ngerine-Skies")]
    pub password1: String,
    /// Must repeat `password1`.
    #[schema(example = "t4ngerine-Skies")]
    pub password2: String,
    /// Profile display name, 1-15 characters.
    #[schema(example = "Alice")]
    pub name: String,
    /// Profile bio, 1-250 characters.
    #[schema(example = "Birdwatcher. Coffee first.")]
    pub bio: String,
}

/// Trimmed, validated signup fields.
pub struct ValidSignup {
    pub username: String,
    pub password: String,
    pub name: String,
    pub bio: String,
}

/// Check every signup field, collecting all problems rather than stopping at the first.
pub fn validate_signup(
    form: &SignupForm,
    policy: &PasswordPolicy,
) -> Result<ValidSignup, Vec<String>> {
    let mut errors = Vec::new();

    let username = form.username.trim();
    if username.is_empty() || username.chars().count() > MAX_USERNAME_CHARS {
        errors.push(format!("Username must be 1-{MAX_USERNAME_CHARS} characters"));
    } else if !username
        .chars()
        .all(|c| c.is_alphanumeric() || matches!(c, '@' | '.' | '+' | '-' | '_'))
    {
        errors.push("Username may contain only letters, digits and @/./+/-/_".into());
    }

    if form.password1 != form.password2 {
        errors.push("The two password fields didn't match.".into());
    } else {
        errors.extend(policy.check(&form.password1, username));
    }

    let mut field = |result: Result<String, String>| match result {
        Ok(value) => Some(value),
        Err(e) => {
            errors.push(e);
            None
        }
    };
    let name = field(bounded_text(&form.name, "Name", MAX_PROFILE_NAME_CHARS));
    let bio = field(bounded_text(&form.bio, "Bio", MAX_BIO_CHARS));

    match (name, bio) {
        (Some(name), Some(bio)) if errors.is_empty() => Ok(ValidSignup {
            username: username.to_string(),
            password: form.password1.clone(),
            name,
            bio,
        }),
        _ => Err(errors),
    }
}

/// Signup form context: the password rules to display.
#[derive(Serialize, utoipa::ToSchema)]
pub struct SignupPageResponse {
    #[schema(example = json!(["Your password must contain at least 8 characters."]))]
    pub help_texts: Vec<String>,
}

/// Rejected signup: the generic message, what went wrong, and the password rules.
#[derive(Serialize, utoipa::ToSchema)]
pub struct SignupErrorResponse {
    #[schema(example = "Invalid sign up. Please check your information and try again.")]
    pub error_message: String,
    #[schema(example = json!(["The two password fields didn't match."]))]
    pub errors: Vec<String>,
    #[schema(example = json!(["Your password must contain at least 8 characters."]))]
    pub help_texts: Vec<String>,
}

impl SignupErrorResponse {
    pub fn new(errors: Vec<String>, policy: &PasswordPolicy) -> Self {
        Self {
            error_message: SIGNUP_FAILED_MESSAGE.into(),
            errors,
            help_texts: policy.help_texts(),
        }
    }
}

/// Form body for login.
#[derive(Deserialize, utoipa::ToSchema)]
pub struct LoginForm {
    #[schema(example = "alice_wonder")]
    pub username: String,
    #[schema(example = "t4ngerine-Skies")]
    pub password: String,
    /// Local path to continue to after login. Defaults to `/`.
    #[schema(example = "/following")]
    #[serde(default)]
    pub next: Option<String>,
}
