//! REST API client module for the Trenditor backend.
//!
//! This module provides the `ApiClient` for authentication, keyword search,
//! trend analysis, toot management and search history.
//!
//! Authenticated endpoints take the token issued by `/api/auth/login`
//! as a bearer credential.

pub mod client;
pub mod error;

pub use client::ApiClient;
pub use error::ApiError;
