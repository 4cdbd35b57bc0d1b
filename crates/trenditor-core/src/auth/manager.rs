//! The session manager: single source of truth for "who is logged in".
//!
//! `SessionManager` is a cheap-to-clone handle. It is built once at startup
//! and passed to everything that needs session state; there is no global.
//!
//! State only changes through three paths:
//! - `store_token` persists a token (no state change by itself)
//! - `verify` re-derives state from the persisted token
//! - `log_out` clears the token, then verifies
//!
//! Verification is serialized: calls queue on a FIFO lock and each one reads
//! the token after acquiring it, so the call that settles last is the call
//! that started last and always reflects the freshest stored token. `log_out`
//! takes the same lock before clearing, so an in-flight check can never
//! publish `Authenticated` after the token is gone.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use thiserror::Error;
use tokio::sync::{watch, Mutex};
use tracing::{debug, error, info, warn};

use crate::api::ApiError;
use crate::models::LoginForm;

use super::{AuthBackend, AuthState, Session, TokenStore};

/// Shown when verification fails without a backend message.
pub const GENERIC_VERIFY_ERROR: &str = "Your session could not be verified. Please sign in again.";

/// Shown when login fails without a backend message.
pub const GENERIC_LOGIN_ERROR: &str = "Invalid credentials";

#[derive(Debug, Error)]
pub enum LoginError {
    #[error(transparent)]
    Api(#[from] ApiError),

    #[error("Failed to store token: {0:#}")]
    Storage(anyhow::Error),
}

impl LoginError {
    pub fn user_message(&self) -> String {
        match self {
            LoginError::Api(e) => e.user_message(GENERIC_LOGIN_ERROR),
            LoginError::Storage(_) => "Signed in, but the session could not be saved.".to_string(),
        }
    }
}

struct Inner {
    store: Box<dyn TokenStore>,
    backend: Arc<dyn AuthBackend>,
    state: watch::Sender<Session>,
    verify_lock: Mutex<()>,
    verify_timeout: Duration,
}

#[derive(Clone)]
pub struct SessionManager {
    inner: Arc<Inner>,
}

impl SessionManager {
    /// Build the manager. The initial status is `Verifying` when a token is
    /// persisted, `Unauthenticated` when none is, and `Unknown` when the store
    /// cannot be read. Call `verify` to settle it.
    ///
    /// `verify_timeout` bounds each backend credential check.
    pub fn new(
        store: Box<dyn TokenStore>,
        backend: Arc<dyn AuthBackend>,
        verify_timeout: Duration,
    ) -> Self {
        let initial = match store.load() {
            Ok(Some(_)) => AuthState::Verifying,
            Ok(None) => AuthState::Unauthenticated,
            Err(e) => {
                warn!(error = %e, "Failed to read stored token");
                AuthState::Unknown
            }
        };
        debug!(?initial, "Session created");

        let (state, _) = watch::channel(Session {
            state: initial,
            last_error: None,
        });

        Self {
            inner: Arc::new(Inner {
                store,
                backend,
                state,
                verify_lock: Mutex::new(()),
                verify_timeout,
            }),
        }
    }

    /// Current session state
    pub fn snapshot(&self) -> Session {
        self.inner.state.borrow().clone()
    }

    /// Receiver that observes every session change
    pub fn subscribe(&self) -> watch::Receiver<Session> {
        self.inner.state.subscribe()
    }

    /// The persisted token, for data calls that need a bearer credential
    pub fn bearer_token(&self) -> Option<String> {
        match self.inner.store.load() {
            Ok(token) => token,
            Err(e) => {
                warn!(error = %e, "Failed to read stored token");
                None
            }
        }
    }

    /// Persist a token, replacing any previous one. Does not change status.
    pub fn store_token(&self, token: &str) -> Result<()> {
        self.inner.store.save(token)
    }

    /// Re-derive the session from the persisted token.
    ///
    /// Never fails: rejected, expired or missing tokens and network errors
    /// all settle to `Unauthenticated`, with `last_error` set for failures.
    pub async fn verify(&self) -> Session {
        let _guard = self.inner.verify_lock.lock().await;
        self.verify_locked().await
    }

    /// Body of `verify`. The caller must hold `verify_lock`.
    async fn verify_locked(&self) -> Session {
        let token = match self.inner.store.load() {
            Ok(token) => token,
            Err(e) => {
                error!(error = %e, "Failed to read stored token");
                self.settle_failure("Could not read the stored session.".to_string());
                return self.snapshot();
            }
        };

        let Some(token) = token else {
            debug!("No stored token");
            self.inner.state.send_modify(|s| s.state = AuthState::Unauthenticated);
            return self.snapshot();
        };

        // An authenticated session stays visible while it is re-checked
        self.inner.state.send_modify(|s| {
            if !matches!(s.state, AuthState::Authenticated(_)) {
                s.state = AuthState::Verifying;
            }
        });

        let outcome = tokio::time::timeout(self.inner.verify_timeout, self.inner.backend.verify(&token)).await;

        match outcome {
            Ok(Ok(user)) => {
                info!(user_id = %user.id, "Session verified");
                self.inner.state.send_modify(|s| {
                    s.state = AuthState::Authenticated(user);
                    s.last_error = None;
                });
            }
            Ok(Err(e)) => {
                warn!(error = %e, "Token verification failed");
                let message = e
                    .backend_message()
                    .map(str::to_string)
                    .unwrap_or_else(|| GENERIC_VERIFY_ERROR.to_string());
                self.settle_failure(message);
            }
            Err(_) => {
                warn!(timeout = ?self.inner.verify_timeout, "Token verification timed out");
                self.settle_failure("Verification timed out. Please try again.".to_string());
            }
        }

        self.snapshot()
    }

    /// Exchange credentials for a token, store it, then verify.
    ///
    /// A failed login leaves the session untouched.
    pub async fn log_in(&self, form: &LoginForm) -> Result<Session, LoginError> {
        let token = self.inner.backend.login(form).await?;
        self.store_token(&token).map_err(LoginError::Storage)?;
        Ok(self.verify().await)
    }

    /// Remove the persisted token and settle to `Unauthenticated`.
    ///
    /// Waits for any in-flight verification before clearing.
    pub async fn log_out(&self) -> Session {
        let _guard = self.inner.verify_lock.lock().await;
        match self.inner.store.clear() {
            Ok(()) => {
                info!("Logged out");
                self.verify_locked().await
            }
            Err(e) => {
                // The token could not be removed; do not let verify resurrect it
                error!(error = %e, "Failed to remove stored token");
                self.settle_failure("Signed out, but the stored session could not be removed.".to_string());
                self.snapshot()
            }
        }
    }

    fn settle_failure(&self, message: String) {
        self.inner.state.send_modify(|s| {
            s.state = AuthState::Unauthenticated;
            s.last_error = Some(message);
        });
    }
}
