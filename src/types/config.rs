//! Configuration Types
//!
//! Bullhorn client configuration.

use secrecy::SecretString;
use std::time::Duration;

/// Bullhorn client configuration.
#[derive(Clone)]
pub struct BullhornConfig {
    /// Endpoint configuration.
    pub endpoints: EndpointConfig,
    /// Client registration and account credentials.
    pub credentials: Credentials,
    /// Refresh the session and retry once when a REST call returns 401.
    pub auto_refresh: bool,
    /// Maximum attempts for session establishment.
    pub max_session_retry: u32,
    /// Fixed delay between failed session-establishment attempts.
    pub retry_interval: Duration,
    /// HTTP timeout per request.
    pub timeout: Duration,
    /// TTL for cached GET responses.
    pub cache_ttl: Duration,
    /// API version requested at login when the caller supplies none.
    pub default_session_version: String,
    /// Session TTL requested at login when the caller supplies none.
    pub default_session_ttl: u32,
}

impl Default for BullhornConfig {
    fn default() -> Self {
        Self {
            endpoints: EndpointConfig::default(),
            credentials: Credentials::default(),
            auto_refresh: true,
            max_session_retry: DEFAULT_MAX_SESSION_RETRY,
            retry_interval: Duration::from_millis(DEFAULT_RETRY_INTERVAL_MS),
            timeout: Duration::from_secs(30),
            cache_ttl: Duration::from_secs(DEFAULT_CACHE_TTL_SECS),
            default_session_version: DEFAULT_SESSION_VERSION.to_string(),
            default_session_ttl: DEFAULT_SESSION_TTL,
        }
    }
}

/// Bullhorn endpoint configuration.
///
/// The authorize and token endpoints speak the OAuth2 wire protocol; the
/// login endpoint is the vendor-specific call that mints the REST session.
#[derive(Clone, Debug, Default)]
pub struct EndpointConfig {
    /// Authorize endpoint URL.
    pub authorize_endpoint: String,
    /// Token endpoint URL.
    pub token_endpoint: String,
    /// REST login endpoint URL.
    pub login_endpoint: String,
}

/// Credentials for the OAuth2 client registration and the impersonated
/// end-user account.
#[derive(Clone)]
pub struct Credentials {
    /// OAuth2 client identifier. Also keys the persisted session state.
    pub client_id: String,
    /// OAuth2 client secret.
    pub client_secret: SecretString,
    /// Account username.
    pub username: String,
    /// Account password. Travels in the authorize query string, a vendor
    /// deviation from standard OAuth2 that is preserved for compatibility.
    pub password: SecretString,
}

impl Default for Credentials {
    fn default() -> Self {
        Self {
            client_id: String::new(),
            client_secret: SecretString::new(String::new()),
            username: String::new(),
            password: SecretString::new(String::new()),
        }
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("client_id", &self.client_id)
            .field("client_secret", &"[REDACTED]")
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

/// Caller-supplied overrides for the login call. Unset fields fall back to
/// the configured defaults.
#[derive(Clone, Debug, Default)]
pub struct SessionOptions {
    /// API version, e.g. `"*"` or `"2.0"`.
    pub version: Option<String>,
    /// Requested session TTL in minutes.
    pub ttl: Option<u32>,
}

/// Default configuration values.
pub const DEFAULT_SESSION_VERSION: &str = "*";
pub const DEFAULT_SESSION_TTL: u32 = 60;
pub const DEFAULT_MAX_SESSION_RETRY: u32 = 5;
pub const DEFAULT_RETRY_INTERVAL_MS: u64 = 1500;
pub const DEFAULT_CACHE_TTL_SECS: u64 = 300;
