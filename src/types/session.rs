//! Session Types
//!
//! Wire and state types for the Bullhorn session lifecycle.

use serde::Deserialize;
use std::collections::HashMap;

/// Token response from the OAuth2 token endpoint.
#[derive(Clone, Deserialize)]
pub struct TokenResponse {
    /// Access token.
    pub access_token: String,
    /// Token type (usually "Bearer").
    #[serde(default = "default_token_type")]
    pub token_type: String,
    /// Expires in seconds.
    #[serde(default)]
    pub expires_in: Option<u64>,
    /// Refresh token. Outlives the access token and is persisted with the
    /// session so it can be refreshed without re-submitting credentials.
    #[serde(default)]
    pub refresh_token: Option<String>,
    /// Additional fields.
    #[serde(flatten)]
    pub extra: HashMap<String, serde_json::Value>,
}

fn default_token_type() -> String {
    "Bearer".to_string()
}

impl std::fmt::Debug for TokenResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenResponse")
            .field("access_token", &"[REDACTED]")
            .field("token_type", &self.token_type)
            .field("expires_in", &self.expires_in)
            .field("refresh_token", &self.refresh_token.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

/// Body of a successful REST login response.
#[derive(Clone, Debug, Deserialize)]
pub struct LoginResponse {
    /// Session token attached to every subsequent REST call.
    #[serde(rename = "BhRestToken")]
    pub rest_token: String,
    /// Per-tenant base URL for subsequent REST calls.
    #[serde(rename = "restUrl")]
    pub rest_url: String,
}

/// An active authenticated context against the CRM.
///
/// Replaced wholesale on every (re-)establishment; expiry of the REST token
/// is discovered reactively through a 401 response, never by a timer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Session {
    /// Short-lived REST bearer token.
    pub rest_token: String,
    /// Base URL for REST calls.
    pub rest_url: String,
    /// Long-lived refresh token minted alongside the access token.
    pub refresh_token: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_response_parsing() {
        let json = r#"{
            "access_token": "at-123",
            "token_type": "Bearer",
            "expires_in": 600,
            "refresh_token": "rt-456"
        }"#;

        let response: TokenResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.access_token, "at-123");
        assert_eq!(response.token_type, "Bearer");
        assert_eq!(response.expires_in, Some(600));
        assert_eq!(response.refresh_token, Some("rt-456".to_string()));
    }

    #[test]
    fn test_token_response_defaults() {
        let response: TokenResponse = serde_json::from_str(r#"{"access_token":"at"}"#).unwrap();
        assert_eq!(response.token_type, "Bearer");
        assert!(response.refresh_token.is_none());
    }

    #[test]
    fn test_token_response_debug_redacts() {
        let response: TokenResponse =
            serde_json::from_str(r#"{"access_token":"at-secret","refresh_token":"rt-secret"}"#)
                .unwrap();
        let formatted = format!("{:?}", response);
        assert!(!formatted.contains("at-secret"));
        assert!(!formatted.contains("rt-secret"));
    }

    #[test]
    fn test_login_response_field_names() {
        let json = r#"{"BhRestToken":"session-token","restUrl":"https://rest.example.com/rest-services/abc/"}"#;
        let response: LoginResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.rest_token, "session-token");
        assert_eq!(
            response.rest_url,
            "https://rest.example.com/rest-services/abc/"
        );
    }
}
