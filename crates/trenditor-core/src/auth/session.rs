//! Session state as seen by the rest of the application.

use crate::models::User;

/// Fieldless view of the session status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionStatus {
    Unknown,
    Verifying,
    Authenticated,
    Unauthenticated,
}

impl SessionStatus {
    /// True while the outcome of verification is not yet known.
    pub fn is_pending(&self) -> bool {
        matches!(self, SessionStatus::Unknown | SessionStatus::Verifying)
    }
}

/// Authentication state. The user lives inside `Authenticated`, so a user
/// can only be present when the session is authenticated.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum AuthState {
    #[default]
    Unknown,
    Verifying,
    Authenticated(User),
    Unauthenticated,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Session {
    pub state: AuthState,
    /// Last verification failure, cleared by the next successful verification
    pub last_error: Option<String>,
}

impl Session {
    pub fn status(&self) -> SessionStatus {
        match self.state {
            AuthState::Unknown => SessionStatus::Unknown,
            AuthState::Verifying => SessionStatus::Verifying,
            AuthState::Authenticated(_) => SessionStatus::Authenticated,
            AuthState::Unauthenticated => SessionStatus::Unauthenticated,
        }
    }

    pub fn user(&self) -> Option<&User> {
        match &self.state {
            AuthState::Authenticated(user) => Some(user),
            _ => None,
        }
    }

    pub fn is_logged_in(&self) -> bool {
        self.status() == SessionStatus::Authenticated
    }

    pub fn is_loading(&self) -> bool {
        self.status().is_pending()
    }
}
