//! Token Exchange
//!
//! Exchanges an authorization code or a refresh token for an access/refresh
//! token pair at the standard OAuth2 token endpoint.

use std::collections::HashMap;
use std::sync::Arc;

use secrecy::ExposeSecret;

use crate::core::{HttpMethod, HttpRequest, HttpTransport};
use crate::error::{
    token_error_message, BullhornError, BullhornResult, HttpError, ProtocolError, TokenError,
};
use crate::types::{BullhornConfig, TokenResponse};

/// Exchanges grants for access tokens.
pub struct TokenExchanger<T: HttpTransport> {
    config: BullhornConfig,
    transport: Arc<T>,
}

impl<T: HttpTransport> TokenExchanger<T> {
    /// Create a new exchanger.
    pub fn new(config: BullhornConfig, transport: Arc<T>) -> Self {
        Self { config, transport }
    }

    /// Exchange a one-time authorization code.
    pub async fn exchange_code(&self, code: &str) -> BullhornResult<TokenResponse> {
        self.request_token(&[("grant_type", "authorization_code"), ("code", code)])
            .await
            .map_err(|error| match error {
                BullhornError::Http(HttpError { status, body }) => {
                    BullhornError::Token(TokenError::AccessTokenCreation {
                        message: token_error_message(status, &body),
                    })
                }
                other => other,
            })
    }

    /// Exchange a stored refresh token.
    pub async fn exchange_refresh_token(
        &self,
        refresh_token: &str,
    ) -> BullhornResult<TokenResponse> {
        self.request_token(&[
            ("grant_type", "refresh_token"),
            ("refresh_token", refresh_token),
        ])
        .await
        .map_err(|error| match error {
            BullhornError::Http(HttpError { status, body }) => {
                BullhornError::Token(TokenError::SessionRefresh {
                    message: token_error_message(status, &body),
                })
            }
            other => other,
        })
    }

    async fn request_token(&self, grant_params: &[(&str, &str)]) -> BullhornResult<TokenResponse> {
        let mut params: Vec<(&str, &str)> = grant_params.to_vec();
        params.push(("client_id", &self.config.credentials.client_id));
        let secret = self.config.credentials.client_secret.expose_secret();
        params.push(("client_secret", secret));

        let body = params
            .into_iter()
            .map(|(k, v)| format!("{}={}", urlencoding::encode(k), urlencoding::encode(v)))
            .collect::<Vec<_>>()
            .join("&");

        let mut headers = HashMap::new();
        headers.insert(
            "content-type".to_string(),
            "application/x-www-form-urlencoded".to_string(),
        );
        headers.insert("accept".to_string(), "application/json".to_string());

        let response = self
            .transport
            .send(HttpRequest {
                method: HttpMethod::Post,
                url: self.config.endpoints.token_endpoint.clone(),
                headers,
                body: Some(body),
                timeout: Some(self.config.timeout),
                follow_redirects: false,
            })
            .await?;

        if response.status != 200 {
            return Err(BullhornError::Http(HttpError {
                status: response.status,
                body: response.body,
            }));
        }

        serde_json::from_str(&response.body).map_err(|e| {
            BullhornError::Protocol(ProtocolError::InvalidJson {
                message: e.to_string(),
            })
        })
    }
}
