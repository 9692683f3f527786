//! Configuration Builder
//!
//! Fluent builder for [`BullhornConfig`].

use secrecy::SecretString;
use std::time::Duration;
use url::Url;

use crate::error::{BullhornError, ConfigurationError};
use crate::types::{
    BullhornConfig, Credentials, EndpointConfig, DEFAULT_CACHE_TTL_SECS,
    DEFAULT_MAX_SESSION_RETRY, DEFAULT_RETRY_INTERVAL_MS, DEFAULT_SESSION_TTL,
    DEFAULT_SESSION_VERSION,
};

/// Bullhorn configuration builder.
#[derive(Default)]
pub struct BullhornConfigBuilder {
    client_id: Option<String>,
    client_secret: Option<SecretString>,
    username: Option<String>,
    password: Option<SecretString>,
    authorize_endpoint: Option<String>,
    token_endpoint: Option<String>,
    login_endpoint: Option<String>,
    auto_refresh: Option<bool>,
    max_session_retry: Option<u32>,
    retry_interval: Option<Duration>,
    timeout: Option<Duration>,
    cache_ttl: Option<Duration>,
    session_version: Option<String>,
    session_ttl: Option<u32>,
}

impl BullhornConfigBuilder {
    /// Create new configuration builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set OAuth2 client id.
    pub fn client_id(mut self, client_id: impl Into<String>) -> Self {
        self.client_id = Some(client_id.into());
        self
    }

    /// Set OAuth2 client secret.
    pub fn client_secret(mut self, client_secret: impl Into<String>) -> Self {
        self.client_secret = Some(SecretString::new(client_secret.into()));
        self
    }

    /// Set account username.
    pub fn username(mut self, username: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self
    }

    /// Set account password.
    pub fn password(mut self, password: impl Into<String>) -> Self {
        self.password = Some(SecretString::new(password.into()));
        self
    }

    /// Set authorize endpoint.
    pub fn authorize_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.authorize_endpoint = Some(endpoint.into());
        self
    }

    /// Set token endpoint.
    pub fn token_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.token_endpoint = Some(endpoint.into());
        self
    }

    /// Set REST login endpoint.
    pub fn login_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.login_endpoint = Some(endpoint.into());
        self
    }

    /// Enable or disable 401-driven session refresh.
    pub fn auto_refresh(mut self, enable: bool) -> Self {
        self.auto_refresh = Some(enable);
        self
    }

    /// Set maximum session-establishment attempts.
    pub fn max_session_retry(mut self, attempts: u32) -> Self {
        self.max_session_retry = Some(attempts);
        self
    }

    /// Set delay between failed session-establishment attempts.
    pub fn retry_interval(mut self, interval: Duration) -> Self {
        self.retry_interval = Some(interval);
        self
    }

    /// Set HTTP timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Set TTL for cached GET responses.
    pub fn cache_ttl(mut self, ttl: Duration) -> Self {
        self.cache_ttl = Some(ttl);
        self
    }

    /// Set default API version requested at login.
    pub fn session_version(mut self, version: impl Into<String>) -> Self {
        self.session_version = Some(version.into());
        self
    }

    /// Set default session TTL requested at login.
    pub fn session_ttl(mut self, ttl: u32) -> Self {
        self.session_ttl = Some(ttl);
        self
    }

    /// Build the configuration.
    pub fn build(self) -> Result<BullhornConfig, BullhornError> {
        let client_id = require(self.client_id, "client_id")?;
        let client_secret = require(self.client_secret, "client_secret")?;
        let username = require(self.username, "username")?;
        let password = require(self.password, "password")?;
        let authorize_endpoint = require(self.authorize_endpoint, "authorize_endpoint")?;
        let token_endpoint = require(self.token_endpoint, "token_endpoint")?;
        let login_endpoint = require(self.login_endpoint, "login_endpoint")?;

        for endpoint in [&authorize_endpoint, &token_endpoint, &login_endpoint] {
            Url::parse(endpoint).map_err(|_| {
                BullhornError::Configuration(ConfigurationError::InvalidEndpoint {
                    url: endpoint.clone(),
                })
            })?;
        }

        Ok(BullhornConfig {
            endpoints: EndpointConfig {
                authorize_endpoint,
                token_endpoint,
                login_endpoint,
            },
            credentials: Credentials {
                client_id,
                client_secret,
                username,
                password,
            },
            auto_refresh: self.auto_refresh.unwrap_or(true),
            max_session_retry: self.max_session_retry.unwrap_or(DEFAULT_MAX_SESSION_RETRY),
            retry_interval: self
                .retry_interval
                .unwrap_or(Duration::from_millis(DEFAULT_RETRY_INTERVAL_MS)),
            timeout: self.timeout.unwrap_or(Duration::from_secs(30)),
            cache_ttl: self
                .cache_ttl
                .unwrap_or(Duration::from_secs(DEFAULT_CACHE_TTL_SECS)),
            default_session_version: self
                .session_version
                .unwrap_or_else(|| DEFAULT_SESSION_VERSION.to_string()),
            default_session_ttl: self.session_ttl.unwrap_or(DEFAULT_SESSION_TTL),
        })
    }
}

fn require<T>(value: Option<T>, field: &str) -> Result<T, BullhornError> {
    value.ok_or_else(|| {
        BullhornError::Configuration(ConfigurationError::MissingField {
            field: field.to_string(),
        })
    })
}

/// Create a new Bullhorn configuration builder.
pub fn bullhorn_config() -> BullhornConfigBuilder {
    BullhornConfigBuilder::new()
}
