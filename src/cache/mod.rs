//! Key/Value Cache
//!
//! Generic key/value persistence used for session state and for cached GET
//! responses. Entries without a TTL live until overwritten or deleted.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use crate::error::{BullhornError, StorageError};

/// Key/value cache interface (for dependency injection).
#[async_trait]
pub trait KeyValueCache: Send + Sync {
    /// Get a value by key. Absence is not an error.
    async fn get(&self, key: &str) -> Result<Option<String>, BullhornError>;

    /// Set a value, optionally expiring after `ttl`.
    async fn set(&self, key: &str, value: &str, ttl: Option<Duration>)
        -> Result<(), BullhornError>;

    /// Delete a value. Returns whether the key existed.
    async fn delete(&self, key: &str) -> Result<bool, BullhornError>;
}

#[derive(Clone, Debug)]
struct CacheEntry {
    value: String,
    expires_at: Option<DateTime<Utc>>,
}

impl CacheEntry {
    fn is_expired(&self) -> bool {
        self.expires_at.map(|exp| exp <= Utc::now()).unwrap_or(false)
    }
}

/// In-memory cache implementation.
pub struct InMemoryCache {
    entries: Mutex<HashMap<String, CacheEntry>>,
}

impl InMemoryCache {
    /// Create new in-memory cache.
    pub fn new() -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
        }
    }
}

impl Default for InMemoryCache {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl KeyValueCache for InMemoryCache {
    async fn get(&self, key: &str) -> Result<Option<String>, BullhornError> {
        let mut entries = self.entries.lock().unwrap();
        match entries.get(key) {
            Some(entry) if entry.is_expired() => {
                entries.remove(key);
                Ok(None)
            }
            Some(entry) => Ok(Some(entry.value.clone())),
            None => Ok(None),
        }
    }

    async fn set(
        &self,
        key: &str,
        value: &str,
        ttl: Option<Duration>,
    ) -> Result<(), BullhornError> {
        let expires_at = ttl
            .and_then(|ttl| chrono::Duration::from_std(ttl).ok())
            .and_then(|ttl| Utc::now().checked_add_signed(ttl));

        self.entries.lock().unwrap().insert(
            key.to_string(),
            CacheEntry {
                value: value.to_string(),
                expires_at,
            },
        );
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<bool, BullhornError> {
        Ok(self.entries.lock().unwrap().remove(key).is_some())
    }
}

/// Mock cache for testing.
#[derive(Default)]
pub struct MockCache {
    entries: Mutex<HashMap<String, String>>,
    set_history: Mutex<Vec<(String, String, Option<Duration>)>>,
    get_history: Mutex<Vec<String>>,
    should_fail: Mutex<bool>,
}

impl MockCache {
    /// Create new mock cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-populate an entry.
    pub fn add_entry(&self, key: &str, value: &str) -> &Self {
        self.entries
            .lock()
            .unwrap()
            .insert(key.to_string(), value.to_string());
        self
    }

    /// Make all operations fail.
    pub fn set_should_fail(&self, should_fail: bool) -> &Self {
        *self.should_fail.lock().unwrap() = should_fail;
        self
    }

    /// Get set history.
    pub fn get_set_history(&self) -> Vec<(String, String, Option<Duration>)> {
        self.set_history.lock().unwrap().clone()
    }

    /// Get read history.
    pub fn get_get_history(&self) -> Vec<String> {
        self.get_history.lock().unwrap().clone()
    }

    fn check_error(&self) -> Result<(), BullhornError> {
        if *self.should_fail.lock().unwrap() {
            return Err(BullhornError::Storage(StorageError::WriteFailed {
                message: "Mock cache failure".to_string(),
            }));
        }
        Ok(())
    }
}

#[async_trait]
impl KeyValueCache for MockCache {
    async fn get(&self, key: &str) -> Result<Option<String>, BullhornError> {
        self.check_error()?;
        self.get_history.lock().unwrap().push(key.to_string());
        Ok(self.entries.lock().unwrap().get(key).cloned())
    }

    async fn set(
        &self,
        key: &str,
        value: &str,
        ttl: Option<Duration>,
    ) -> Result<(), BullhornError> {
        self.check_error()?;
        self.set_history
            .lock()
            .unwrap()
            .push((key.to_string(), value.to_string(), ttl));
        self.entries
            .lock()
            .unwrap()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<bool, BullhornError> {
        self.check_error()?;
        Ok(self.entries.lock().unwrap().remove(key).is_some())
    }
}
