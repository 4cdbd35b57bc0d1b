use async_trait::async_trait;

use crate::api::ApiError;
use crate::models::{LoginForm, User};

/// The two backend calls the session lifecycle needs.
///
/// `ApiClient` is the production implementation.
#[async_trait]
pub trait AuthBackend: Send + Sync {
    /// Check a bearer token and return the identity it belongs to
    async fn verify(&self, token: &str) -> Result<User, ApiError>;

    /// Exchange credentials for a freshly issued bearer token
    async fn login(&self, form: &LoginForm) -> Result<String, ApiError>;
}
