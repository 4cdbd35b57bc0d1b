use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use tracing::debug;

use crate::models::{HistoryItem, Toot, TrendsResponse, UserId};

/// Consider cache stale after 15 minutes.
const CACHE_STALE_MINUTES: i64 = 15;

/// Directory under the cache root holding per-user snapshots
const USERS_DIR: &str = "users";

const TOOTS: &str = "toots";
const HISTORY: &str = "history";
const TRENDS: &str = "trends";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CachedData<T> {
    pub data: T,
    pub cached_at: DateTime<Utc>,
}

impl<T> CachedData<T> {
    pub fn new(data: T) -> Self {
        Self {
            data,
            cached_at: Utc::now(),
        }
    }

    pub fn age_minutes(&self) -> i64 {
        (Utc::now() - self.cached_at).num_minutes()
    }

    pub fn age_display(&self) -> String {
        let minutes = self.age_minutes();
        if minutes < 1 {
            // Also covers clock skew
            "just now".to_string()
        } else if minutes < 60 {
            format!("{}m ago", minutes)
        } else if minutes < 1440 {
            let hours = minutes / 60;
            if minutes % 60 >= 30 {
                format!("{}h ago", hours + 1)
            } else {
                format!("{}h ago", hours)
            }
        } else {
            let days = minutes / 1440;
            if (minutes % 1440) / 60 >= 12 {
                format!("{}d ago", days + 1)
            } else {
                format!("{}d ago", days)
            }
        }
    }

    pub fn is_stale(&self) -> bool {
        self.age_minutes() > CACHE_STALE_MINUTES
    }
}

/// Age of each cached snapshot, for the status bar.
#[derive(Debug, Clone, Default)]
pub struct CacheAges {
    pub toots: Option<String>,
    pub history: Option<String>,
    pub trends: Option<String>,
}

pub struct CacheManager {
    cache_dir: PathBuf,
}

impl CacheManager {
    pub fn new(cache_dir: PathBuf) -> Result<Self> {
        std::fs::create_dir_all(&cache_dir)?;
        Ok(Self { cache_dir })
    }

    fn user_dir(&self, user_id: &UserId) -> PathBuf {
        // Ids come from the backend; keep them from escaping the cache dir
        let safe: String = user_id
            .as_str()
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
            .collect();
        self.cache_dir.join(USERS_DIR).join(safe)
    }

    fn cache_path(&self, user_id: &UserId, name: &str) -> PathBuf {
        self.user_dir(user_id).join(format!("{}.json", name))
    }

    fn load<T: DeserializeOwned>(&self, user_id: &UserId, name: &str) -> Result<Option<CachedData<T>>> {
        let path = self.cache_path(user_id, name);
        if !path.exists() {
            return Ok(None);
        }

        let contents = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read cache file: {}", name))?;

        let cached: CachedData<T> = serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse cache file: {}", name))?;

        Ok(Some(cached))
    }

    fn save<T: Serialize>(&self, user_id: &UserId, name: &str, data: &T) -> Result<()> {
        let path = self.cache_path(user_id, name);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string_pretty(&CachedData::new(data))?;
        std::fs::write(&path, contents)
            .with_context(|| format!("Failed to write cache file: {}", name))?;
        debug!(name, "Cache saved");
        Ok(())
    }

    // ===== Toots =====

    pub fn load_toots(&self, user_id: &UserId) -> Result<Option<CachedData<Vec<Toot>>>> {
        self.load(user_id, TOOTS)
    }

    pub fn save_toots(&self, user_id: &UserId, toots: &[Toot]) -> Result<()> {
        self.save(user_id, TOOTS, &toots)
    }

    // ===== History =====

    pub fn load_history(&self, user_id: &UserId) -> Result<Option<CachedData<Vec<HistoryItem>>>> {
        self.load(user_id, HISTORY)
    }

    pub fn save_history(&self, user_id: &UserId, history: &[HistoryItem]) -> Result<()> {
        self.save(user_id, HISTORY, &history)
    }

    // ===== Trends =====

    pub fn load_trends(&self, user_id: &UserId) -> Result<Option<CachedData<TrendsResponse>>> {
        self.load(user_id, TRENDS)
    }

    pub fn save_trends(&self, user_id: &UserId, trends: &TrendsResponse) -> Result<()> {
        self.save(user_id, TRENDS, trends)
    }

    pub fn get_cache_ages(&self, user_id: &UserId) -> CacheAges {
        CacheAges {
            toots: self.load_toots(user_id).ok().flatten().map(|c| c.age_display()),
            history: self.load_history(user_id).ok().flatten().map(|c| c.age_display()),
            trends: self.load_trends(user_id).ok().flatten().map(|c| c.age_display()),
        }
    }

    /// Remove every snapshot belonging to one user
    pub fn clear_user(&self, user_id: &UserId) -> Result<()> {
        let dir = self.user_dir(user_id);
        if dir.exists() {
            std::fs::remove_dir_all(&dir).context("Failed to clear user cache")?;
        }
        Ok(())
    }

    /// Remove every user's snapshots
    pub fn clear_all(&self) -> Result<()> {
        let dir = self.cache_dir.join(USERS_DIR);
        if dir.exists() {
            std::fs::remove_dir_all(&dir).context("Failed to clear cache")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn toot(id: &str) -> Toot {
        Toot {
            id: id.to_string(),
            content: "hello".to_string(),
            created_at: None,
            sentiment: None,
        }
    }

    #[test]
    fn test_cached_data_age_display_just_now() {
        let cached = CachedData::new(());
        assert_eq!(cached.age_display(), "just now");
        assert!(!cached.is_stale());
    }

    #[test]
    fn test_cached_data_age_display_rounding() {
        let mut cached = CachedData::new(());
        cached.cached_at = Utc::now() - Duration::minutes(95);
        assert_eq!(cached.age_display(), "2h ago");
        assert!(cached.is_stale());

        cached.cached_at = Utc::now() - Duration::minutes(5);
        assert_eq!(cached.age_display(), "5m ago");

        cached.cached_at = Utc::now() - Duration::hours(30);
        assert_eq!(cached.age_display(), "1d ago");
    }

    #[test]
    fn test_save_and_load_per_user() {
        let dir = tempfile::tempdir().expect("tempdir");
        let cache = CacheManager::new(dir.path().to_path_buf()).expect("cache");
        let ann = UserId::from(1);
        let bob = UserId::from(2);

        cache.save_toots(&ann, &[toot("a")]).expect("save");
        let loaded = cache.load_toots(&ann).expect("load").expect("present");
        assert_eq!(loaded.data.len(), 1);
        assert!(cache.load_toots(&bob).expect("load").is_none());

        let ages = cache.get_cache_ages(&ann);
        assert_eq!(ages.toots.as_deref(), Some("just now"));
        assert!(ages.history.is_none());
    }

    #[test]
    fn test_clear_user_only_removes_that_user() {
        let dir = tempfile::tempdir().expect("tempdir");
        let cache = CacheManager::new(dir.path().to_path_buf()).expect("cache");
        let ann = UserId::from(1);
        let bob = UserId::from(2);
        cache.save_toots(&ann, &[toot("a")]).expect("save");
        cache.save_history(&bob, &[]).expect("save");

        cache.clear_user(&ann).expect("clear");
        assert!(cache.load_toots(&ann).expect("load").is_none());
        assert!(cache.load_history(&bob).expect("load").is_some());

        cache.clear_all().expect("clear all");
        assert!(cache.load_history(&bob).expect("load").is_none());
    }

    #[test]
    fn test_user_dir_is_sanitized() {
        let dir = tempfile::tempdir().expect("tempdir");
        let cache = CacheManager::new(dir.path().to_path_buf()).expect("cache");
        let path = cache.user_dir(&UserId::new("../../etc"));
        assert!(path.starts_with(dir.path().join(USERS_DIR)));
        assert!(path.ends_with("______etc"));
    }
}
