//! Password rules applied at signup.
//!
//! Each rule can check a candidate password and describe itself; the
//! descriptions are shown next to the signup form so users can self-correct.

use crate::config::AuthConfig;

/// Hard upper bound, independent of configuration.
pub const MAX_PASSWORD_LENGTH: usize = 128;

/// Frequently used passwords that are always rejected.
const COMMON_PASSWORDS: &[&str] = &[
    "123456", "12345678", "123456789", "1234567890", "password", "password1", "password123",
    "qwerty", "qwerty123", "qwertyuiop", "abc123", "111111", "123123", "iloveyou", "admin",
    "admin123", "welcome", "welcome1", "letmein", "monkey", "dragon", "football", "baseball",
    "sunshine", "princess", "trustno1", "passw0rd", "master", "superman", "starwars",
    "whatever", "1q2w3e4r", "zaq12wsx", "changeme", "secret", "login",
];

pub trait PasswordRule: Send + Sync {
    /// `Err` carries a user-facing message.
    fn check(&self, password: &str, username: &str) -> Result<(), String>;

    fn help_text(&self) -> String;
}

pub struct MinimumLength(pub usize);

impl PasswordRule for MinimumLength {
    fn check(&self, password: &str, _username: &str) -> Result<(), String> {
        if password.chars().count() < self.0 {
            return Err(format!(
                "This password is too short. It must contain at least {} characters.",
                self.0
            ));
        }
        Ok(())
    }

    fn help_text(&self) -> String {
        format!("Your password must contain at least {} characters.", self.0)
    }
}

pub struct MaximumLength(pub usize);

impl PasswordRule for MaximumLength {
    fn check(&self, password: &str, _username: &str) -> Result<(), String> {
        if password.chars().count() > self.0 {
            return Err(format!(
                "This password is too long. It must contain at most {} characters.",
                self.0
            ));
        }
        Ok(())
    }

    fn help_text(&self) -> String {
        format!("Your password must contain at most {} characters.", self.0)
    }
}

/// Rejects passwords that contain the username or are contained in it.
pub struct NotSimilarToUsername;

impl PasswordRule for NotSimilarToUsername {
    fn check(&self, password: &str, username: &str) -> Result<(), String> {
        let password = password.to_lowercase();
        let username = username.trim().to_lowercase();
        if username.chars().count() < 3 {
            return Ok(());
        }
        if password.contains(&username) || username.contains(&password) {
            return Err("The password is too similar to the username.".into());
        }
        Ok(())
    }

    fn help_text(&self) -> String {
        "Your password can't be too similar to your other personal information.".into()
    }
}

pub struct NotCommon;

impl PasswordRule for NotCommon {
    fn check(&self, password: &str, _username: &str) -> Result<(), String> {
        let lowered = password.trim().to_lowercase();
        if COMMON_PASSWORDS.contains(&lowered.as_str()) {
            return Err("This password is too common.".into());
        }
        Ok(())
    }

    fn help_text(&self) -> String {
        "Your password can't be a commonly used password.".into()
    }
}

pub struct NotEntirelyNumeric;

impl PasswordRule for NotEntirelyNumeric {
    fn check(&self, password: &str, _username: &str) -> Result<(), String> {
        if !password.is_empty() && password.chars().all(|c| c.is_ascii_digit()) {
            return Err("This password is entirely numeric.".into());
        }
        Ok(())
    }

    fn help_text(&self) -> String {
        "Your password can't be entirely numeric.".into()
    }
}

/// The configured set of password rules.
pub struct PasswordPolicy {
    rules: Vec<Box<dyn PasswordRule>>,
}

impl PasswordPolicy {
    pub fn from_config(config: &AuthConfig) -> Self {
        Self {
            rules: vec![
                Box::new(NotSimilarToUsername),
                Box::new(MinimumLength(config.min_password_length)),
                Box::new(MaximumLength(MAX_PASSWORD_LENGTH)),
                Box::new(NotCommon),
                Box::new(NotEntirelyNumeric),
            ],
        }
    }

    /// Every failed rule's message, in rule order. Empty means acceptable.
    pub fn check(&self, password: &str, username: &str) -> Vec<String> {
        self.rules
            .iter()
            .filter_map(|rule| rule.check(password, username).err())
            .collect()
    }

    pub fn help_texts(&self) -> Vec<String> {
        self.rules.iter().map(|rule| rule.help_text()).collect()
    }
}
