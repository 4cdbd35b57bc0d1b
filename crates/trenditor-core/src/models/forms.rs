//! Form payloads and the checks applied before submitting them.
//!
//! Each `validate` returns the first problem found as a message suitable
//! for display next to the form.

use serde::Serialize;

use super::{TootDraft, Visibility};

/// Minimum password length accepted at sign-up.
pub const MIN_PASSWORD_LENGTH: usize = 6;

/// Maximum toot length in characters.
pub const MAX_TOOT_LENGTH: usize = 500;

/// Default number of posts requested by keyword search.
pub const DEFAULT_SEARCH_LIMIT: u32 = 20;

/// Mirrors `^\S+@\S+$`: non-empty, no whitespace, an `@` with text on both sides.
pub fn is_valid_email(email: &str) -> bool {
    if email.is_empty() || email.chars().any(char::is_whitespace) {
        return false;
    }
    email
        .match_indices('@')
        .any(|(at, _)| at > 0 && at + 1 < email.len())
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

impl LoginForm {
    pub fn validate(&self) -> Result<(), String> {
        if !is_valid_email(&self.email) {
            return Err("Invalid email".to_string());
        }
        if self.password.is_empty() {
            return Err("Password is required".to_string());
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct SignUpForm {
    pub name: String,
    pub email: String,
    pub password: String,
}

impl SignUpForm {
    pub fn validate(&self) -> Result<(), String> {
        if self.name.trim().is_empty() {
            return Err("Name is required".to_string());
        }
        if !is_valid_email(&self.email) {
            return Err("Invalid email".to_string());
        }
        if self.password.chars().count() < MIN_PASSWORD_LENGTH {
            return Err(format!(
                "Password must be at least {} characters",
                MIN_PASSWORD_LENGTH
            ));
        }
        Ok(())
    }
}

/// Email plus the new password.
#[derive(Debug, Clone, Default, Serialize)]
pub struct PasswordResetForm {
    pub email: String,
    pub password: String,
}

impl PasswordResetForm {
    pub fn validate(&self) -> Result<(), String> {
        if !is_valid_email(&self.email) {
            return Err("Invalid email".to_string());
        }
        if self.password.is_empty() {
            return Err("Password is required".to_string());
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrendsForm {
    pub num_trends: u32,
    pub num_posts: u32,
}

impl Default for TrendsForm {
    fn default() -> Self {
        Self {
            num_trends: 1,
            num_posts: 1,
        }
    }
}

impl TrendsForm {
    pub fn validate(&self) -> Result<(), String> {
        if self.num_trends < 1 {
            return Err("Number of trends must be at least 1".to_string());
        }
        if self.num_posts < 1 {
            return Err("Posts per trend must be at least 1".to_string());
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchForm {
    pub keyword: String,
    pub instance: String,
    pub limit: u32,
}

impl Default for SearchForm {
    fn default() -> Self {
        Self {
            keyword: String::new(),
            instance: "mastodon.social".to_string(),
            limit: DEFAULT_SEARCH_LIMIT,
        }
    }
}

impl SearchForm {
    pub fn validate(&self) -> Result<(), String> {
        if self.keyword.trim().is_empty() {
            return Err("Keyword is required".to_string());
        }
        if self.instance.trim().is_empty() || self.instance.chars().any(char::is_whitespace) {
            return Err("Instance must be a host name".to_string());
        }
        if self.limit < 1 {
            return Err("Limit must be at least 1".to_string());
        }
        Ok(())
    }
}

impl TootDraft {
    pub fn new(content: impl Into<String>, visibility: Visibility) -> Self {
        Self {
            content: content.into(),
            visibility,
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        validate_toot_content(&self.content)
    }
}

/// Shared by new toots and edits.
pub fn validate_toot_content(content: &str) -> Result<(), String> {
    if content.trim().is_empty() {
        return Err("Content is required".to_string());
    }
    if content.chars().count() > MAX_TOOT_LENGTH {
        return Err(format!("Maximum {} characters allowed", MAX_TOOT_LENGTH));
    }
    Ok(())
}
