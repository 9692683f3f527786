//! REST Login
//!
//! Establishes a REST session from an access token via the vendor's login
//! endpoint.

use std::collections::HashMap;
use std::sync::Arc;
use url::Url;

use crate::core::{HttpMethod, HttpRequest, HttpTransport};
use crate::error::{
    BullhornError, BullhornResult, ConfigurationError, LoginError, ProtocolError,
};
use crate::types::{BullhornConfig, LoginResponse, Session, SessionOptions, TokenResponse};

/// Establishes sessions at the login endpoint.
pub struct SessionEstablisher<T: HttpTransport> {
    config: BullhornConfig,
    transport: Arc<T>,
}

impl<T: HttpTransport> SessionEstablisher<T> {
    /// Create a new establisher.
    pub fn new(config: BullhornConfig, transport: Arc<T>) -> Self {
        Self { config, transport }
    }

    /// Trade an access token for a REST session.
    ///
    /// Caller options are merged over the configured defaults. The access
    /// token travels both as a query parameter and as a Bearer header, the
    /// way the vendor expects it.
    pub async fn login(
        &self,
        token: &TokenResponse,
        options: &SessionOptions,
    ) -> BullhornResult<Session> {
        let version = options
            .version
            .clone()
            .unwrap_or_else(|| self.config.default_session_version.clone());
        let ttl = options.ttl.unwrap_or(self.config.default_session_ttl);

        let url = Url::parse_with_params(
            &self.config.endpoints.login_endpoint,
            &[
                ("version", version.as_str()),
                ("ttl", ttl.to_string().as_str()),
                ("access_token", token.access_token.as_str()),
            ],
        )
        .map_err(|_| {
            BullhornError::Configuration(ConfigurationError::InvalidEndpoint {
                url: self.config.endpoints.login_endpoint.clone(),
            })
        })?;

        let mut headers = HashMap::new();
        headers.insert(
            "authorization".to_string(),
            format!("Bearer {}", token.access_token),
        );
        headers.insert("accept".to_string(), "application/json".to_string());

        let response = self
            .transport
            .send(HttpRequest {
                method: HttpMethod::Get,
                url: url.to_string(),
                headers,
                body: None,
                timeout: Some(self.config.timeout),
                follow_redirects: false,
            })
            .await?;

        if response.status != 200 {
            return Err(BullhornError::Login(LoginError {
                status: response.status,
                body: response.body,
                headers: response.headers,
            }));
        }

        let login: LoginResponse = serde_json::from_str(&response.body).map_err(|e| {
            BullhornError::Protocol(ProtocolError::InvalidJson {
                message: e.to_string(),
            })
        })?;

        let refresh_token = token.refresh_token.clone().ok_or_else(|| {
            BullhornError::Protocol(ProtocolError::MissingField {
                field: "refresh_token".to_string(),
            })
        })?;

        tracing::debug!(rest_url = %login.rest_url, "REST session established");

        Ok(Session {
            rest_token: login.rest_token,
            rest_url: login.rest_url,
            refresh_token,
        })
    }
}
