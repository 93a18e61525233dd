//! # Token Persistence
//!
//! Keeps the auth token across process restarts.
//!
//! The file store writes `{"token": ..., "expires_at": ...}` and treats an
//! expired file as absent, deleting it on the next load. The default lifetime
//! is seven days.

use std::path::{Path, PathBuf};
use std::sync::Mutex;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{SessionError, SessionResult};

/// Where the session token lives between runs.
pub trait TokenStore: Send + Sync {
    /// Returns the stored token, or `None` when absent or expired.
    fn load(&self) -> SessionResult<Option<String>>;

    fn save(&self, token: &str) -> SessionResult<()>;

    /// Removes the stored token. Clearing an empty store is not an error.
    fn clear(&self) -> SessionResult<()>;
}

// =============================================================================
// File Store
// =============================================================================

#[derive(Debug, Serialize, Deserialize)]
struct StoredToken {
    token: String,
    expires_at: DateTime<Utc>,
}

/// JSON file with an expiry timestamp.
#[derive(Debug, Clone)]
pub struct FileTokenStore {
    path: PathBuf,
    max_age: Duration,
}

impl FileTokenStore {
    pub fn new(path: impl Into<PathBuf>, max_age: Duration) -> Self {
        FileTokenStore {
            path: path.into(),
            max_age,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl TokenStore for FileTokenStore {
    fn load(&self) -> SessionResult<Option<String>> {
        if !self.path.exists() {
            return Ok(None);
        }

        let contents = std::fs::read_to_string(&self.path)?;
        let stored: StoredToken = serde_json::from_str(&contents)
            .map_err(|e| SessionError::TokenStore(format!("corrupt token file: {e}")))?;

        if stored.expires_at <= Utc::now() {
            debug!(path = ?self.path, "Stored token expired");
            self.clear()?;
            return Ok(None);
        }

        Ok(Some(stored.token))
    }

    fn save(&self, token: &str) -> SessionResult<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let stored = StoredToken {
            token: token.to_string(),
            expires_at: Utc::now() + self.max_age,
        };
        std::fs::write(&self.path, serde_json::to_string(&stored)?)?;

        debug!(path = ?self.path, "Token saved");
        Ok(())
    }

    fn clear(&self) -> SessionResult<()> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

// =============================================================================
// Memory Store
// =============================================================================

/// Process-local store for tests and throwaway sessions.
#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    slot: Mutex<Option<String>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(token: impl Into<String>) -> Self {
        MemoryTokenStore {
            slot: Mutex::new(Some(token.into())),
        }
    }
}

impl TokenStore for MemoryTokenStore {
    fn load(&self) -> SessionResult<Option<String>> {
        Ok(self.slot.lock().expect("Token mutex poisoned").clone())
    }

    fn save(&self, token: &str) -> SessionResult<()> {
        *self.slot.lock().expect("Token mutex poisoned") = Some(token.to_string());
        Ok(())
    }

    fn clear(&self) -> SessionResult<()> {
        *self.slot.lock().expect("Token mutex poisoned") = None;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path() -> PathBuf {
        std::env::temp_dir()
            .join(format!("storefront-token-{}", uuid::Uuid::new_v4()))
            .join("auth-token.json")
    }

    #[test]
    fn test_file_store_round_trip() {
        let store = FileTokenStore::new(temp_path(), Duration::days(7));
        assert_eq!(store.load().unwrap(), None);

        store.save("abc.def").unwrap();
        assert_eq!(store.load().unwrap().as_deref(), Some("abc.def"));

        store.clear().unwrap();
        assert_eq!(store.load().unwrap(), None);
        // Clearing twice is fine
        store.clear().unwrap();

        if let Some(dir) = store.path().parent() {
            std::fs::remove_dir_all(dir).ok();
        }
    }

    #[test]
    fn test_expired_token_is_absent() {
        let store = FileTokenStore::new(temp_path(), Duration::seconds(-1));
        store.save("stale").unwrap();

        assert_eq!(store.load().unwrap(), None);
        assert!(!store.path().exists());

        if let Some(dir) = store.path().parent() {
            std::fs::remove_dir_all(dir).ok();
        }
    }

    #[test]
    fn test_corrupt_file_is_an_error() {
        let store = FileTokenStore::new(temp_path(), Duration::days(7));
        if let Some(dir) = store.path().parent() {
            std::fs::create_dir_all(dir).unwrap();
        }
        std::fs::write(store.path(), "not json").unwrap();

        assert!(matches!(store.load(), Err(SessionError::TokenStore(_))));

        if let Some(dir) = store.path().parent() {
            std::fs::remove_dir_all(dir).ok();
        }
    }

    #[test]
    fn test_memory_store() {
        let store = MemoryTokenStore::with_token("t");
        assert_eq!(store.load().unwrap().as_deref(), Some("t"));
        store.clear().unwrap();
        assert_eq!(store.load().unwrap(), None);
    }
}
