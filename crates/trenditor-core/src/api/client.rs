//! API client for communicating with the Trenditor REST API.
//!
//! This module provides the `ApiClient` struct for authentication, account
//! management and the data pages (search, trends, toots, history).

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{header, Client, Method, RequestBuilder};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use tracing::{debug, warn};

use crate::auth::AuthBackend;
use crate::config::DEFAULT_REQUEST_TIMEOUT_SECS;
use crate::models::{
    EditedToot, HistoryItem, LoginForm, PasswordResetForm, SearchForm, SearchResult, SignUpForm,
    Toot, TootDraft, TrendsForm, TrendsResponse, User, UserId,
};

use super::ApiError;

// ============================================================================
// Constants
// ============================================================================

/// Maximum number of retries for rate-limited (429) requests.
const MAX_RATE_LIMIT_RETRIES: u32 = 3;

/// Initial backoff delay in milliseconds for rate limiting.
const INITIAL_BACKOFF_MS: u64 = 1000;

#[derive(Debug, Deserialize)]
struct LoginResponse {
    #[serde(rename = "authToken")]
    auth_token: String,
}

#[derive(Debug, Serialize)]
struct EditTootBody<'a> {
    status: &'a str,
}

/// API client for the Trenditor backend.
/// Clone is cheap - reqwest::Client uses Arc internally for connection pooling.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    token: Option<String>,
}

impl ApiClient {
    /// Create a new API client with the default request timeout
    pub fn new(base_url: impl Into<String>) -> Result<Self, ApiError> {
        Self::with_timeout(base_url, Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS))
    }

    pub fn with_timeout(base_url: impl Into<String>, timeout: Duration) -> Result<Self, ApiError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: None,
        })
    }

    /// Create a new ApiClient with the given token, sharing the connection pool.
    pub fn with_token(&self, token: String) -> Self {
        Self {
            client: self.client.clone(),
            base_url: self.base_url.clone(),
            token: Some(token),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn require_token(&self) -> Result<&str, ApiError> {
        self.token
            .as_deref()
            .ok_or_else(|| ApiError::Unauthorized("Authentication required".to_string()))
    }

    fn request(&self, method: Method, path: &str, authenticated: bool) -> Result<RequestBuilder, ApiError> {
        let mut builder = self
            .client
            .request(method, self.url(path))
            .header(header::ACCEPT, "application/json");
        if authenticated {
            builder = builder.bearer_auth(self.require_token()?);
        }
        Ok(builder)
    }

    /// Check if response is successful, returning an error with body if not.
    /// Returns Ok(Some(response)) for success, Ok(None) for rate limit (should retry),
    /// or Err for other errors.
    async fn check_response_for_retry(
        response: reqwest::Response,
    ) -> Result<Option<reqwest::Response>, ApiError> {
        if response.status().is_success() {
            Ok(Some(response))
        } else if response.status().as_u16() == 429 {
            Ok(None)
        } else {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            Err(ApiError::from_status(status, &body))
        }
    }

    /// Send a request, retrying with exponential backoff while rate limited.
    async fn send<B: Serialize + ?Sized>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
        authenticated: bool,
    ) -> Result<reqwest::Response, ApiError> {
        let mut retries = 0;
        let mut backoff_ms = INITIAL_BACKOFF_MS;

        loop {
            let mut builder = self.request(method.clone(), path, authenticated)?;
            if let Some(body) = body {
                builder = builder.json(body);
            }

            debug!(%method, path, "Sending request");
            let response = builder.send().await?;

            match Self::check_response_for_retry(response).await? {
                Some(response) => return Ok(response),
                None => {
                    retries += 1;
                    if retries > MAX_RATE_LIMIT_RETRIES {
                        return Err(ApiError::RateLimited);
                    }
                    warn!(path, retry = retries, backoff_ms, "Rate limited, backing off");
                    tokio::time::sleep(Duration::from_millis(backoff_ms)).await;
                    backoff_ms *= 2;
                }
            }
        }
    }

    async fn json<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ApiError> {
        let text = response.text().await?;
        serde_json::from_str(&text).map_err(|e| ApiError::InvalidResponse(e.to_string()))
    }

    /// Parse a list endpoint. Anything other than a JSON array is treated as empty.
    async fn json_list<T: DeserializeOwned>(response: reqwest::Response) -> Result<Vec<T>, ApiError> {
        let value: serde_json::Value = Self::json(response).await?;
        if value.is_array() {
            serde_json::from_value(value).map_err(|e| ApiError::InvalidResponse(e.to_string()))
        } else {
            debug!("List endpoint returned a non-array body, treating as empty");
            Ok(Vec::new())
        }
    }

    // ===== Authentication =====

    /// Check a bearer token and return the identity it belongs to
    pub async fn verify_token(&self, token: &str) -> Result<User, ApiError> {
        let response = self
            .with_token(token.to_string())
            .send::<()>(Method::GET, "/api/auth/verify", None, true)
            .await?;
        Self::json(response).await
    }

    /// Exchange email and password for a bearer token
    pub async fn login(&self, form: &LoginForm) -> Result<String, ApiError> {
        let response = self
            .send(Method::POST, "/api/auth/login", Some(form), false)
            .await?;
        let login: LoginResponse = Self::json(response).await?;
        Ok(login.auth_token)
    }

    pub async fn sign_up(&self, form: &SignUpForm) -> Result<(), ApiError> {
        self.send(Method::POST, "/api/auth/signup", Some(form), false)
            .await?;
        Ok(())
    }

    /// Set a new password for the account with the given email
    pub async fn reset_password(&self, form: &PasswordResetForm) -> Result<(), ApiError> {
        self.send(Method::PUT, "/api/auth/password", Some(form), false)
            .await?;
        Ok(())
    }

    pub async fn delete_account(&self, user_id: &UserId) -> Result<(), ApiError> {
        let path = format!("/api/auth/users/{}", user_id);
        self.send::<()>(Method::DELETE, &path, None, true).await?;
        Ok(())
    }

    // ===== Data Methods =====

    pub async fn search(&self, form: &SearchForm) -> Result<SearchResult, ApiError> {
        let response = self
            .send(Method::POST, "/api/search", Some(form), true)
            .await?;
        Self::json(response).await
    }

    pub async fn analyze_trends(&self, form: &TrendsForm) -> Result<TrendsResponse, ApiError> {
        let response = self
            .send(Method::POST, "/api/trends", Some(form), true)
            .await?;
        Self::json(response).await
    }

    pub async fn post_toot(&self, draft: &TootDraft) -> Result<(), ApiError> {
        self.send(Method::POST, "/api/toot", Some(draft), true).await?;
        Ok(())
    }

    pub async fn fetch_toots(&self, user_id: &UserId) -> Result<Vec<Toot>, ApiError> {
        let path = format!("/api/auth/users/toots/{}", user_id);
        let response = self.send::<()>(Method::GET, &path, None, true).await?;
        Self::json_list(response).await
    }

    pub async fn edit_toot(&self, toot_id: &str, content: &str) -> Result<EditedToot, ApiError> {
        let path = format!("/api/auth/edit-toots/{}", toot_id);
        let body = EditTootBody { status: content };
        let response = self.send(Method::PATCH, &path, Some(&body), true).await?;
        Self::json(response).await
    }

    pub async fn delete_toot(&self, toot_id: &str) -> Result<(), ApiError> {
        let path = format!("/api/auth/toots/{}", toot_id);
        self.send::<()>(Method::DELETE, &path, None, true).await?;
        Ok(())
    }

    pub async fn fetch_history(&self, user_id: &UserId) -> Result<Vec<HistoryItem>, ApiError> {
        let path = format!("/api/auth/users/history/{}", user_id);
        let response = self.send::<()>(Method::GET, &path, None, true).await?;
        Self::json_list(response).await
    }

    pub async fn clear_history(&self, user_id: &UserId) -> Result<(), ApiError> {
        let path = format!("/api/auth/users/history/{}", user_id);
        self.send::<()>(Method::DELETE, &path, None, true).await?;
        Ok(())
    }
}

#[async_trait]
impl AuthBackend for ApiClient {
    async fn verify(&self, token: &str) -> Result<User, ApiError> {
        self.verify_token(token).await
    }

    async fn login(&self, form: &LoginForm) -> Result<String, ApiError> {
        ApiClient::login(self, form).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let client = ApiClient::new("http://localhost:5005/").expect("client should build");
        assert_eq!(client.base_url(), "http://localhost:5005");
        assert_eq!(client.url("/api/toot"), "http://localhost:5005/api/toot");
    }

    #[test]
    fn test_with_token_shares_base_url() {
        let client = ApiClient::new("http://api.test").expect("client should build");
        assert!(client.require_token().is_err());
        let authed = client.with_token("abc".to_string());
        assert_eq!(authed.require_token().ok(), Some("abc"));
        assert_eq!(authed.base_url(), "http://api.test");
    }

    #[test]
    fn test_parse_login_response() {
        let resp: LoginResponse =
            serde_json::from_str(r#"{"authToken":"jwt.token.here"}"#).expect("login response");
        assert_eq!(resp.auth_token, "jwt.token.here");
    }

    #[tokio::test]
    async fn test_authenticated_call_without_token_fails_fast() {
        let client = ApiClient::new("http://127.0.0.1:9").expect("client should build");
        let err = client
            .fetch_history(&UserId::from(1))
            .await
            .expect_err("no token should fail before any request");
        assert!(err.is_auth_failure());
    }

    #[test]
    fn test_edit_body_uses_status_field() {
        let json = serde_json::to_value(EditTootBody { status: "new text" }).expect("serialize");
        assert_eq!(json["status"], "new text");
    }
}
