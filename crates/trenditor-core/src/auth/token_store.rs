//! Durable storage for the bearer token.
//!
//! Exactly one item is persisted client-side: the token, under the
//! well-known name [`TOKEN_KEY`].

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use keyring::Entry;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::{TokenStorage, APP_NAME};

/// Well-known name of the persisted token
pub const TOKEN_KEY: &str = "authToken";

/// Token file name in cache directory
const TOKEN_FILE: &str = "session.json";

/// Storage for the one persisted token. Only `SessionManager` writes to it.
pub trait TokenStore: Send + Sync {
    fn load(&self) -> Result<Option<String>>;
    fn save(&self, token: &str) -> Result<()>;
    fn clear(&self) -> Result<()>;
}

/// Pick the store named by the config.
pub fn open_token_store(storage: TokenStorage, cache_dir: &Path) -> Box<dyn TokenStore> {
    match storage {
        TokenStorage::File => Box::new(FileTokenStore::new(cache_dir.to_path_buf())),
        TokenStorage::Keyring => Box::new(KeyringTokenStore),
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct TokenFile {
    #[serde(rename = "authToken")]
    auth_token: String,
}

/// Token kept as JSON in the cache directory.
pub struct FileTokenStore {
    cache_dir: PathBuf,
}

impl FileTokenStore {
    pub fn new(cache_dir: PathBuf) -> Self {
        Self { cache_dir }
    }

    fn token_path(&self) -> PathBuf {
        self.cache_dir.join(TOKEN_FILE)
    }
}

impl TokenStore for FileTokenStore {
    fn load(&self) -> Result<Option<String>> {
        let path = self.token_path();
        if !path.exists() {
            return Ok(None);
        }
        let contents = std::fs::read_to_string(&path).context("Failed to read token file")?;
        let file: TokenFile =
            serde_json::from_str(&contents).context("Failed to parse token file")?;
        Ok(Some(file.auth_token).filter(|t| !t.is_empty()))
    }

    fn save(&self, token: &str) -> Result<()> {
        let path = self.token_path();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string_pretty(&TokenFile {
            auth_token: token.to_string(),
        })?;
        std::fs::write(&path, contents).context("Failed to write token file")?;
        debug!(path = %path.display(), "Token saved");
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        let path = self.token_path();
        if path.exists() {
            std::fs::remove_file(&path).context("Failed to remove token file")?;
        }
        Ok(())
    }
}

/// Token kept in the OS keychain.
pub struct KeyringTokenStore;

impl KeyringTokenStore {
    fn entry() -> Result<Entry> {
        Entry::new(APP_NAME, TOKEN_KEY).context("Failed to create keyring entry")
    }
}

impl TokenStore for KeyringTokenStore {
    fn load(&self) -> Result<Option<String>> {
        match Self::entry()?.get_password() {
            Ok(token) => Ok(Some(token).filter(|t| !t.is_empty())),
            Err(keyring::Error::NoEntry) => Ok(None),
            Err(e) => Err(e).context("Failed to retrieve token from keychain"),
        }
    }

    fn save(&self, token: &str) -> Result<()> {
        Self::entry()?
            .set_password(token)
            .context("Failed to store token in keychain")
    }

    fn clear(&self) -> Result<()> {
        match Self::entry()?.delete_credential() {
            Ok(()) | Err(keyring::Error::NoEntry) => Ok(()),
            Err(e) => Err(e).context("Failed to delete token from keychain"),
        }
    }
}

#[cfg(test)]
pub(crate) mod memory {
    use std::sync::Mutex;

    use super::*;

    /// In-memory store for tests.
    #[derive(Default)]
    pub struct MemoryTokenStore {
        token: Mutex<Option<String>>,
    }

    impl MemoryTokenStore {
        pub fn with_token(token: &str) -> Self {
            Self {
                token: Mutex::new(Some(token.to_string())),
            }
        }
    }

    impl TokenStore for MemoryTokenStore {
        fn load(&self) -> Result<Option<String>> {
            Ok(self.token.lock().map_err(|_| anyhow::anyhow!("poisoned"))?.clone())
        }

        fn save(&self, token: &str) -> Result<()> {
            *self.token.lock().map_err(|_| anyhow::anyhow!("poisoned"))? = Some(token.to_string());
            Ok(())
        }

        fn clear(&self) -> Result<()> {
            *self.token.lock().map_err(|_| anyhow::anyhow!("poisoned"))? = None;
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_store_round_trip_and_clear() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = FileTokenStore::new(dir.path().join("nested"));

        assert_eq!(store.load().expect("load empty"), None);

        store.save("abc").expect("save");
        assert_eq!(store.load().expect("load").as_deref(), Some("abc"));

        store.save("def").expect("overwrite");
        assert_eq!(store.load().expect("load").as_deref(), Some("def"));

        store.clear().expect("clear");
        assert_eq!(store.load().expect("load after clear"), None);
        // Clearing twice is fine
        store.clear().expect("clear again");
    }

    #[test]
    fn test_file_store_uses_well_known_key() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = FileTokenStore::new(dir.path().to_path_buf());
        store.save("tok").expect("save");

        let raw = std::fs::read_to_string(dir.path().join(TOKEN_FILE)).expect("read raw");
        let value: serde_json::Value = serde_json::from_str(&raw).expect("json");
        assert_eq!(value[TOKEN_KEY], "tok");
    }

    #[test]
    fn test_file_store_corrupt_file_is_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        std::fs::write(dir.path().join(TOKEN_FILE), "not json").expect("write");
        let store = FileTokenStore::new(dir.path().to_path_buf());
        assert!(store.load().is_err());
    }
}
