//! Session Store
//!
//! Keys the three session fields off the client id and passes through to
//! the injected key/value cache. Getters return `None` when no session has
//! been established yet.

use std::sync::Arc;

use crate::cache::KeyValueCache;
use crate::error::BullhornResult;
use crate::types::Session;

const REST_TOKEN_SUFFIX: &str = "-restToken";
const REST_URL_SUFFIX: &str = "-restUrl";
const REFRESH_TOKEN_SUFFIX: &str = "-refreshToken";

/// Persistent session state for one client id.
pub struct SessionStore<C: KeyValueCache> {
    client_id: String,
    cache: Arc<C>,
}

impl<C: KeyValueCache> SessionStore<C> {
    /// Create a store keyed by `client_id`.
    pub fn new(client_id: impl Into<String>, cache: Arc<C>) -> Self {
        Self {
            client_id: client_id.into(),
            cache,
        }
    }

    fn rest_token_key(&self) -> String {
        format!("{}{}", self.client_id, REST_TOKEN_SUFFIX)
    }

    fn rest_url_key(&self) -> String {
        format!("{}{}", self.client_id, REST_URL_SUFFIX)
    }

    fn refresh_token_key(&self) -> String {
        format!("{}{}", self.client_id, REFRESH_TOKEN_SUFFIX)
    }

    /// Current REST token, if a session exists.
    pub async fn rest_token(&self) -> BullhornResult<Option<String>> {
        self.cache.get(&self.rest_token_key()).await
    }

    /// Current REST base URL, if a session exists.
    pub async fn rest_url(&self) -> BullhornResult<Option<String>> {
        self.cache.get(&self.rest_url_key()).await
    }

    /// Stored refresh token, if a session was ever established.
    pub async fn refresh_token(&self) -> BullhornResult<Option<String>> {
        self.cache.get(&self.refresh_token_key()).await
    }

    /// Overwrite all three session fields.
    ///
    /// The writes happen sequentially within this one call so a reader on
    /// the same task never observes fields from two session generations.
    /// Concurrent writers racing on the same client id must be serialized
    /// by the caller.
    pub async fn store_session(&self, session: &Session) -> BullhornResult<()> {
        self.cache
            .set(&self.rest_token_key(), &session.rest_token, None)
            .await?;
        self.cache
            .set(&self.rest_url_key(), &session.rest_url, None)
            .await?;
        self.cache
            .set(&self.refresh_token_key(), &session.refresh_token, None)
            .await?;
        Ok(())
    }

    /// Delete all three session fields.
    pub async fn clear(&self) -> BullhornResult<()> {
        self.cache.delete(&self.rest_token_key()).await?;
        self.cache.delete(&self.rest_url_key()).await?;
        self.cache.delete(&self.refresh_token_key()).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::{InMemoryCache, MockCache};

    fn session() -> Session {
        Session {
            rest_token: "rest-token-1".to_string(),
            rest_url: "https://rest.example.com/rest-services/abc/".to_string(),
            refresh_token: "refresh-token-1".to_string(),
        }
    }

    #[tokio::test]
    async fn test_store_and_read_back() {
        let cache = Arc::new(InMemoryCache::new());
        let store = SessionStore::new("client-1", cache);

        store.store_session(&session()).await.unwrap();

        assert_eq!(
            store.rest_token().await.unwrap(),
            Some("rest-token-1".to_string())
        );
        assert_eq!(
            store.rest_url().await.unwrap(),
            Some("https://rest.example.com/rest-services/abc/".to_string())
        );
        assert_eq!(
            store.refresh_token().await.unwrap(),
            Some("refresh-token-1".to_string())
        );
    }

    #[tokio::test]
    async fn test_absent_session_reads_none() {
        let cache = Arc::new(InMemoryCache::new());
        let store = SessionStore::new("client-1", cache);

        assert_eq!(store.rest_token().await.unwrap(), None);
        assert_eq!(store.rest_url().await.unwrap(), None);
        assert_eq!(store.refresh_token().await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_key_derivation() {
        let cache = Arc::new(MockCache::new());
        let store = SessionStore::new("client-1", cache.clone());

        store.store_session(&session()).await.unwrap();

        let keys: Vec<String> = cache
            .get_set_history()
            .into_iter()
            .map(|(key, _, _)| key)
            .collect();
        assert_eq!(
            keys,
            vec![
                "client-1-restToken".to_string(),
                "client-1-restUrl".to_string(),
                "client-1-refreshToken".to_string(),
            ]
        );
    }

    #[tokio::test]
    async fn test_store_overwrites_whole_generation() {
        let cache = Arc::new(InMemoryCache::new());
        let store = SessionStore::new("client-1", cache);

        store.store_session(&session()).await.unwrap();

        let replacement = Session {
            rest_token: "rest-token-2".to_string(),
            rest_url: "https://rest.example.com/rest-services/def/".to_string(),
            refresh_token: "refresh-token-2".to_string(),
        };
        store.store_session(&replacement).await.unwrap();

        assert_eq!(
            store.rest_token().await.unwrap(),
            Some("rest-token-2".to_string())
        );
        assert_eq!(
            store.refresh_token().await.unwrap(),
            Some("refresh-token-2".to_string())
        );
    }

    #[tokio::test]
    async fn test_clear_removes_all_fields() {
        let cache = Arc::new(InMemoryCache::new());
        let store = SessionStore::new("client-1", cache);

        store.store_session(&session()).await.unwrap();
        store.clear().await.unwrap();

        assert_eq!(store.rest_token().await.unwrap(), None);
        assert_eq!(store.rest_url().await.unwrap(), None);
        assert_eq!(store.refresh_token().await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_sessions_isolated_per_client_id() {
        let cache = Arc::new(InMemoryCache::new());
        let first = SessionStore::new("client-1", cache.clone());
        let second = SessionStore::new("client-2", cache);

        first.store_session(&session()).await.unwrap();

        assert!(first.rest_token().await.unwrap().is_some());
        assert_eq!(second.rest_token().await.unwrap(), None);
    }
}
