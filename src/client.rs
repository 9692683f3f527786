//! Bullhorn Client
//!
//! Ties the authorization, token-exchange, and login flows together behind
//! one facade and executes REST requests against the session's REST base
//! URL, recovering from expired sessions along the way.

use std::collections::HashMap;
use std::sync::Arc;

use secrecy::ExposeSecret;
use sha2::{Digest, Sha256};
use url::Url;

use crate::cache::{InMemoryCache, KeyValueCache};
use crate::core::{
    HttpMethod, HttpRequest, HttpResponse, HttpTransport, ReqwestHttpTransport,
};
use crate::error::{
    BullhornError, BullhornResult, ConfigurationError, HttpError, ProtocolError, StorageError,
    TokenError,
};
use crate::flows::{AuthorizationCodeAcquirer, SessionEstablisher, TokenExchanger};
use crate::session::SessionStore;
use crate::types::{BullhornConfig, RequestOptions, Session, SessionOptions};

/// Bullhorn REST client.
///
/// Holds one session per configured client id. Session establishment and
/// refresh are serialized through an internal guard so concurrent callers
/// never run the login flow twice for the same client.
pub struct BullhornClient<T: HttpTransport = ReqwestHttpTransport, C: KeyValueCache = InMemoryCache>
{
    config: BullhornConfig,
    transport: Arc<T>,
    store: SessionStore<C>,
    cache: Arc<C>,
    session_guard: tokio::sync::Mutex<()>,
}

impl BullhornClient<ReqwestHttpTransport, InMemoryCache> {
    /// Create a client with the default HTTP transport and an in-memory
    /// session cache.
    pub fn new(config: BullhornConfig) -> Result<Self, BullhornError> {
        let transport = Arc::new(ReqwestHttpTransport::with_timeout(config.timeout)?);
        let cache = Arc::new(InMemoryCache::new());
        Ok(Self::with_components(config, transport, cache))
    }
}

impl<T: HttpTransport, C: KeyValueCache> BullhornClient<T, C> {
    /// Create a client from injected transport and cache implementations.
    pub fn with_components(config: BullhornConfig, transport: Arc<T>, cache: Arc<C>) -> Self {
        let store = SessionStore::new(config.credentials.client_id.clone(), cache.clone());
        Self {
            config,
            transport,
            store,
            cache,
            session_guard: tokio::sync::Mutex::new(()),
        }
    }

    /// Establish a fresh session for the given account.
    ///
    /// Runs the full authorize -> token -> login chain, retrying up to the
    /// configured attempt limit with a fixed delay between attempts. Only
    /// one establishment or refresh runs at a time per client.
    pub async fn initiate_session(
        &self,
        username: &str,
        password: &str,
        options: &SessionOptions,
    ) -> BullhornResult<Session> {
        let _guard = self.session_guard.lock().await;

        let mut attempt: u32 = 1;
        loop {
            match self.establish_session(username, password, options).await {
                Ok(session) => {
                    tracing::info!(
                        client_id = %self.config.credentials.client_id,
                        attempt,
                        "session established"
                    );
                    return Ok(session);
                }
                Err(error) if attempt >= self.config.max_session_retry => {
                    tracing::error!(
                        client_id = %self.config.credentials.client_id,
                        attempt,
                        error = %error,
                        "session establishment failed, attempts exhausted"
                    );
                    return Err(error);
                }
                Err(error) => {
                    tracing::warn!(
                        client_id = %self.config.credentials.client_id,
                        attempt,
                        error = %error,
                        "session establishment failed, retrying"
                    );
                    attempt += 1;
                    tokio::time::sleep(self.config.retry_interval).await;
                }
            }
        }
    }

    async fn establish_session(
        &self,
        username: &str,
        password: &str,
        options: &SessionOptions,
    ) -> BullhornResult<Session> {
        let acquirer =
            AuthorizationCodeAcquirer::new(self.config.clone(), self.transport.clone());
        let code = acquirer.acquire_code(username, password).await?;

        let exchanger = TokenExchanger::new(self.config.clone(), self.transport.clone());
        let token = exchanger.exchange_code(&code).await?;

        let establisher = SessionEstablisher::new(self.config.clone(), self.transport.clone());
        let session = establisher.login(&token, options).await?;

        self.store.store_session(&session).await?;
        Ok(session)
    }

    /// Refresh the current session using the stored refresh token.
    ///
    /// Fails without touching the network when no refresh token is stored.
    pub async fn refresh_session(&self, options: &SessionOptions) -> BullhornResult<Session> {
        let _guard = self.session_guard.lock().await;

        let refresh_token = self
            .store
            .refresh_token()
            .await?
            .ok_or(BullhornError::Token(TokenError::InvalidRefreshToken))?;

        let exchanger = TokenExchanger::new(self.config.clone(), self.transport.clone());
        let token = exchanger.exchange_refresh_token(&refresh_token).await?;

        let establisher = SessionEstablisher::new(self.config.clone(), self.transport.clone());
        let session = establisher.login(&token, options).await?;

        self.store.store_session(&session).await?;
        tracing::info!(
            client_id = %self.config.credentials.client_id,
            "session refreshed"
        );
        Ok(session)
    }

    /// Execute a REST request against the session's REST base URL.
    ///
    /// Bootstraps a session from the configured credentials when none
    /// exists. A 401 triggers at most one refresh-and-retry cycle when
    /// auto-refresh is enabled; a second 401 surfaces as an error.
    pub async fn request(
        &self,
        method: HttpMethod,
        path: &str,
        options: &RequestOptions,
        headers: &HashMap<String, String>,
    ) -> BullhornResult<serde_json::Value> {
        self.ensure_session().await?;

        let mut refreshed = false;
        loop {
            let response = self.execute(method, path, options, headers).await?;

            if response.status == 401 && self.config.auto_refresh && !refreshed {
                tracing::debug!(path, "REST token rejected, refreshing session");
                self.refresh_session(&SessionOptions::default()).await?;
                refreshed = true;
                continue;
            }

            if !response.is_success() {
                return Err(BullhornError::Http(HttpError {
                    status: response.status,
                    body: response.body,
                }));
            }

            if response.body.is_empty() {
                return Ok(serde_json::Value::Null);
            }
            return serde_json::from_str(&response.body).map_err(|e| {
                BullhornError::Protocol(ProtocolError::InvalidJson {
                    message: e.to_string(),
                })
            });
        }
    }

    /// GET an entity path, serving repeat reads from the response cache.
    ///
    /// Cache entries are keyed by a digest of the path and expire after the
    /// configured cache TTL. With `use_cache` false the cache is bypassed
    /// and not written.
    pub async fn get_cached(
        &self,
        path: &str,
        use_cache: bool,
    ) -> BullhornResult<serde_json::Value> {
        if !use_cache {
            return self
                .request(
                    HttpMethod::Get,
                    path,
                    &RequestOptions::default(),
                    &HashMap::new(),
                )
                .await;
        }

        let key = response_cache_key(path);
        if let Some(cached) = self.cache.get(&key).await? {
            tracing::debug!(path, "serving GET from response cache");
            return serde_json::from_str(&cached).map_err(|e| {
                BullhornError::Storage(StorageError::CorruptedData {
                    message: e.to_string(),
                })
            });
        }

        let value = self
            .request(
                HttpMethod::Get,
                path,
                &RequestOptions::default(),
                &HashMap::new(),
            )
            .await?;
        self.cache
            .set(&key, &value.to_string(), Some(self.config.cache_ttl))
            .await?;
        Ok(value)
    }

    async fn ensure_session(&self) -> BullhornResult<()> {
        if self.store.rest_token().await?.is_some() {
            return Ok(());
        }
        let username = self.config.credentials.username.clone();
        let password = self.config.credentials.password.expose_secret().clone();
        self.initiate_session(&username, &password, &SessionOptions::default())
            .await?;
        Ok(())
    }

    async fn execute(
        &self,
        method: HttpMethod,
        path: &str,
        options: &RequestOptions,
        caller_headers: &HashMap<String, String>,
    ) -> BullhornResult<HttpResponse> {
        let rest_token = self
            .store
            .rest_token()
            .await?
            .ok_or(BullhornError::Token(TokenError::NoActiveSession))?;
        let rest_url = self
            .store
            .rest_url()
            .await?
            .ok_or(BullhornError::Token(TokenError::NoActiveSession))?;

        let url = resolve_url(&rest_url, path, &options.query)?;

        let mut headers = HashMap::new();
        headers.insert("accept".to_string(), "application/json".to_string());
        let body = match &options.body {
            Some(value) => {
                headers.insert("content-type".to_string(), "application/json".to_string());
                Some(value.to_string())
            }
            None => None,
        };
        for (name, value) in caller_headers {
            headers.insert(name.clone(), value.clone());
        }
        // The session header always wins over caller-supplied headers.
        headers.insert("BhRestToken".to_string(), rest_token);

        self.transport
            .send(HttpRequest {
                method,
                url,
                headers,
                body,
                timeout: Some(self.config.timeout),
                follow_redirects: true,
            })
            .await
    }
}

/// Resolve a request path against the session's REST base URL.
///
/// Absolute `http(s)` paths pass through untouched, everything else joins
/// onto the base. Query pairs are appended after resolution.
fn resolve_url(base: &str, path: &str, query: &[(String, String)]) -> BullhornResult<String> {
    let mut url = if path.starts_with("http://") || path.starts_with("https://") {
        Url::parse(path).map_err(|_| {
            BullhornError::Configuration(ConfigurationError::InvalidEndpoint {
                url: path.to_string(),
            })
        })?
    } else {
        let base = if base.ends_with('/') {
            base.to_string()
        } else {
            format!("{}/", base)
        };
        let base = Url::parse(&base).map_err(|_| {
            BullhornError::Configuration(ConfigurationError::InvalidEndpoint {
                url: base.clone(),
            })
        })?;
        base.join(path.trim_start_matches('/')).map_err(|_| {
            BullhornError::Configuration(ConfigurationError::InvalidEndpoint {
                url: path.to_string(),
            })
        })?
    };

    if !query.is_empty() {
        let mut pairs = url.query_pairs_mut();
        for (name, value) in query {
            pairs.append_pair(name, value);
        }
    }

    Ok(url.to_string())
}

/// Cache key for a GET response, derived from the request path.
fn response_cache_key(path: &str) -> String {
    format!("{:x}", Sha256::digest(path.as_bytes()))
}
