//! Authentication module: token persistence, session state and route gating.
//!
//! This module provides:
//! - `TokenStore`: durable storage for the single bearer token (`authToken`),
//!   file-backed or in the OS keychain via keyring
//! - `AuthBackend`: the credential check and login calls the session depends on
//! - `SessionManager`: the single source of truth for who is logged in
//! - `guard`: decides whether a route may be rendered for the current session
//!
//! Login is always "store token, then verify"; logout is "clear token, then
//! verify". Status is never set by hand.

pub mod backend;
pub mod guard;
pub mod manager;
pub mod session;
pub mod token_store;

pub use backend::AuthBackend;
pub use guard::{guard, GuardDecision, Route};
pub use manager::SessionManager;
pub use session::{AuthState, Session, SessionStatus};
pub use token_store::{open_token_store, FileTokenStore, KeyringTokenStore, TokenStore, TOKEN_KEY};
