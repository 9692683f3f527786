//! Bullhorn Error Types
//!
//! Error hierarchy for the Bullhorn session and REST protocol.

use std::collections::HashMap;
use std::time::Duration;
use thiserror::Error;

/// Root error type for the Bullhorn integration.
#[derive(Error, Debug)]
pub enum BullhornError {
    #[error("Configuration error: {0}")]
    Configuration(#[from] ConfigurationError),

    #[error("Authorization flow error: {0}")]
    AuthFlow(#[from] AuthFlowError),

    #[error("Token error: {0}")]
    Token(#[from] TokenError),

    #[error("Login error: {0}")]
    Login(#[from] LoginError),

    #[error("Network error: {0}")]
    Network(#[from] NetworkError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Protocol error: {0}")]
    Protocol(#[from] ProtocolError),

    #[error("HTTP error: {0}")]
    Http(#[from] HttpError),
}

impl BullhornError {
    /// Get error code for telemetry.
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Configuration(_) => "BULLHORN_CONFIG",
            Self::AuthFlow(_) => "BULLHORN_AUTH",
            Self::Token(_) => "BULLHORN_TOKEN",
            Self::Login(_) => "BULLHORN_LOGIN",
            Self::Network(_) => "BULLHORN_NETWORK",
            Self::Storage(_) => "BULLHORN_STORAGE",
            Self::Protocol(_) => "BULLHORN_PROTOCOL",
            Self::Http(_) => "BULLHORN_HTTP",
        }
    }

    /// Check if the error indicates rejected credentials rather than a
    /// transient failure. Callers can use this to stop retrying and
    /// re-prompt for credentials instead.
    pub fn is_credential_error(&self) -> bool {
        matches!(
            self,
            Self::AuthFlow(AuthFlowError::InvalidClientId)
                | Self::AuthFlow(AuthFlowError::InvalidCredentials)
        )
    }

    /// Check if the error is a 401 from the REST endpoint, i.e. the
    /// session token is no longer accepted.
    pub fn is_session_expired(&self) -> bool {
        matches!(self, Self::Http(e) if e.status == 401)
    }
}

/// Configuration error.
#[derive(Error, Debug)]
pub enum ConfigurationError {
    #[error("Missing required field: {field}")]
    MissingField { field: String },

    #[error("Invalid endpoint URL: {url}")]
    InvalidEndpoint { url: String },
}

/// Authorization-code acquisition error.
///
/// The authorize endpoint reports failures inside an HTML login form, so
/// `InvalidClientId` and `InvalidCredentials` are detected by body markers.
#[derive(Error, Debug)]
pub enum AuthFlowError {
    #[error("Authorize endpoint rejected the client id")]
    InvalidClientId,

    #[error("Authorize endpoint rejected the account credentials")]
    InvalidCredentials,

    #[error("Authorize response carried no Location header")]
    MissingRedirect,

    #[error("Cannot parse authorization code from: {location}")]
    CodeParse { location: String },

    #[error("Authorization flow failed for {authorize_url}: {message}")]
    Failed {
        /// Authorize URL with the password parameter redacted.
        authorize_url: String,
        message: String,
    },
}

/// Token-endpoint and session-state errors.
#[derive(Error, Debug)]
pub enum TokenError {
    #[error("Failed to exchange authorization code for an access token: {message}")]
    AccessTokenCreation { message: String },

    #[error("Token endpoint rejected the stored refresh token: {message}")]
    SessionRefresh { message: String },

    #[error("Attempted session refresh without a stored refresh token")]
    InvalidRefreshToken,

    #[error("No active session; call initiate_session first")]
    NoActiveSession,
}

/// Login endpoint returned a non-200 response.
#[derive(Error, Debug)]
#[error("Login returned HTTP {status}: {body}")]
pub struct LoginError {
    pub status: u16,
    pub body: String,
    pub headers: HashMap<String, String>,
}

/// Network/transport error.
#[derive(Error, Debug)]
pub enum NetworkError {
    #[error("Connection failed: {message}")]
    ConnectionFailed { message: String },

    #[error("Request timed out after {timeout:?}")]
    Timeout { timeout: Duration },

    #[error("Failed to build HTTP client: {message}")]
    ClientBuild { message: String },
}

/// Key/value store error.
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Read failed: {message}")]
    ReadFailed { message: String },

    #[error("Write failed: {message}")]
    WriteFailed { message: String },

    #[error("Corrupted cache entry: {message}")]
    CorruptedData { message: String },
}

/// Response parsing error.
#[derive(Error, Debug)]
pub enum ProtocolError {
    #[error("Invalid JSON in response: {message}")]
    InvalidJson { message: String },

    #[error("Missing field in response: {field}")]
    MissingField { field: String },
}

/// Unclassified HTTP failure from the REST endpoint.
#[derive(Error, Debug)]
#[error("HTTP {status}: {body}")]
pub struct HttpError {
    pub status: u16,
    pub body: String,
}

/// Result type for Bullhorn operations.
pub type BullhornResult<T> = Result<T, BullhornError>;

/// OAuth2 error body returned by the token endpoint.
#[derive(Debug, Clone, serde::Deserialize)]
pub struct OAuth2ErrorResponse {
    pub error: String,
    #[serde(default)]
    pub error_description: Option<String>,
}

/// Parse a token-endpoint error body, if it is one.
pub fn parse_error_response(body: &str) -> Option<OAuth2ErrorResponse> {
    serde_json::from_str(body).ok()
}

/// Extract a human-readable message from a failed token-endpoint response,
/// preferring the structured `error_description` field over the raw body.
pub fn token_error_message(status: u16, body: &str) -> String {
    match parse_error_response(body) {
        Some(response) => response.error_description.unwrap_or(response.error),
        None => format!("HTTP {}: {}", status, body),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_credential_error() {
        assert!(BullhornError::AuthFlow(AuthFlowError::InvalidClientId).is_credential_error());
        assert!(BullhornError::AuthFlow(AuthFlowError::InvalidCredentials).is_credential_error());
        assert!(!BullhornError::Token(TokenError::InvalidRefreshToken).is_credential_error());
        assert!(!BullhornError::AuthFlow(AuthFlowError::MissingRedirect).is_credential_error());
    }

    #[test]
    fn test_is_session_expired() {
        let unauthorized = BullhornError::Http(HttpError {
            status: 401,
            body: String::new(),
        });
        assert!(unauthorized.is_session_expired());

        let server_error = BullhornError::Http(HttpError {
            status: 500,
            body: String::new(),
        });
        assert!(!server_error.is_session_expired());
    }

    #[test]
    fn test_token_error_message_structured() {
        let body = r#"{"error":"invalid_grant","error_description":"The refresh token is expired"}"#;
        assert_eq!(
            token_error_message(400, body),
            "The refresh token is expired"
        );

        let body = r#"{"error":"invalid_client"}"#;
        assert_eq!(token_error_message(401, body), "invalid_client");
    }

    #[test]
    fn test_token_error_message_unstructured() {
        assert_eq!(
            token_error_message(502, "Bad Gateway"),
            "HTTP 502: Bad Gateway"
        );
    }

    #[test]
    fn test_login_error_display() {
        let error = LoginError {
            status: 500,
            body: "Internal Server Error".to_string(),
            headers: HashMap::new(),
        };
        assert_eq!(
            error.to_string(),
            "Login returned HTTP 500: Internal Server Error"
        );
    }
}
