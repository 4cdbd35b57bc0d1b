//! Data models for Trenditor entities.
//!
//! - `User`, `UserId`: the verified identity behind a session
//! - `Toot`, `TootDraft`, `Visibility`: the user's own posts
//! - `TrendAnalysis`, `TrendsResponse`: trend sentiment analysis results
//! - `SearchResult`, `HistoryItem`, `AnalyzedPost`: keyword search and history
//! - `Sentiment`: backend classification attached to posts
//! - `forms`: the validation rules applied before anything is submitted

pub mod forms;
pub mod history;
pub mod sentiment;
pub mod toot;
pub mod trend;
pub mod user;

pub use forms::{LoginForm, PasswordResetForm, SearchForm, SignUpForm, TrendsForm};
pub use history::{AnalyzedPost, HistoryItem, SearchResult};
pub use sentiment::{Sentiment, SentimentDistribution};
pub use toot::{EditedToot, Toot, TootDraft, Visibility};
pub use trend::{TrendAnalysis, TrendPost, TrendsMeta, TrendsResponse};
pub use user::{User, UserId};
