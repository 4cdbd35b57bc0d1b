//! Core library for Trenditor.
//!
//! Everything the terminal client needs that is not rendering:
//!
//! - `api`: REST client for the Trenditor backend
//! - `auth`: token storage, the session manager and the route guard
//! - `cache`: per-user snapshots of last-fetched data
//! - `config`: persisted application configuration
//! - `models`: domain types and form validation
//! - `utils`: formatting helpers

pub mod api;
pub mod auth;
pub mod cache;
pub mod config;
pub mod models;
pub mod utils;

pub use api::{ApiClient, ApiError};
pub use auth::{
    guard, AuthBackend, AuthState, GuardDecision, Route, Session, SessionManager, SessionStatus,
    TokenStore,
};
pub use cache::CacheManager;
pub use config::Config;
