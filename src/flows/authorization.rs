//! Authorization Code Acquisition
//!
//! Turns (username, password) into a one-time authorization code by
//! simulating the vendor's login redirect.

use std::collections::HashMap;
use std::sync::Arc;

use crate::core::{
    build_authorize_url, parse_authorization_code, redact_password, HttpMethod, HttpRequest,
    HttpResponse, HttpTransport,
};
use crate::error::{AuthFlowError, BullhornResult};
use crate::types::BullhornConfig;

const INVALID_CLIENT_MARKER: &str = "Invalid Client Id";
const INVALID_CREDENTIALS_MARKER: &str = r#"<p class="error">"#;

/// Acquires authorization codes from the authorize endpoint.
pub struct AuthorizationCodeAcquirer<T: HttpTransport> {
    config: BullhornConfig,
    transport: Arc<T>,
}

impl<T: HttpTransport> AuthorizationCodeAcquirer<T> {
    /// Create a new acquirer.
    pub fn new(config: BullhornConfig, transport: Arc<T>) -> Self {
        Self { config, transport }
    }

    /// Acquire an authorization code for the given account.
    ///
    /// Issues a non-redirect-following GET and reads the code out of the
    /// `Location` header. When that extraction fails, retries once with
    /// redirect-following enabled and extracts the code from the final
    /// effective URL or the raw body.
    pub async fn acquire_code(&self, username: &str, password: &str) -> BullhornResult<String> {
        let authorize_url = build_authorize_url(
            &self.config.endpoints.authorize_endpoint,
            &self.config.credentials.client_id,
            username,
            password,
        )?;

        let response = self.send_authorize(&authorize_url, false).await?;
        check_authorization_errors(&response.body)?;

        match code_from_redirect(&response) {
            Ok(code) => {
                tracing::debug!(
                    authorize_url = %redact_password(&authorize_url),
                    "authorization code acquired from redirect"
                );
                Ok(code)
            }
            Err(primary) => {
                tracing::debug!(
                    error = %primary,
                    "header-based code extraction failed, retrying with redirects enabled"
                );
                self.acquire_code_following_redirects(&authorize_url, primary)
                    .await
            }
        }
    }

    /// Fallback path: follow the redirect chain and extract the code from
    /// wherever it ends up.
    async fn acquire_code_following_redirects(
        &self,
        authorize_url: &str,
        primary: AuthFlowError,
    ) -> BullhornResult<String> {
        let response = self.send_authorize(authorize_url, true).await?;

        if let Some(final_url) = &response.final_url {
            if let Ok(code) = parse_authorization_code(final_url) {
                return Ok(code);
            }
        }
        if let Ok(code) = parse_authorization_code(&response.body) {
            return Ok(code);
        }

        Err(AuthFlowError::Failed {
            authorize_url: redact_password(authorize_url),
            message: primary.to_string(),
        }
        .into())
    }

    async fn send_authorize(
        &self,
        authorize_url: &str,
        follow_redirects: bool,
    ) -> BullhornResult<HttpResponse> {
        self.transport
            .send(HttpRequest {
                method: HttpMethod::Get,
                url: authorize_url.to_string(),
                headers: HashMap::new(),
                body: None,
                timeout: Some(self.config.timeout),
                follow_redirects,
            })
            .await
    }
}

/// Scan the authorize response body for the known failure markers.
///
/// Legacy heuristic: the endpoint reports failures inside an HTML form,
/// there are no structured fields to inspect.
pub fn check_authorization_errors(body: &str) -> Result<(), AuthFlowError> {
    if body.contains(INVALID_CLIENT_MARKER) {
        return Err(AuthFlowError::InvalidClientId);
    }
    if body.contains(INVALID_CREDENTIALS_MARKER) {
        return Err(AuthFlowError::InvalidCredentials);
    }
    Ok(())
}

fn code_from_redirect(response: &HttpResponse) -> Result<String, AuthFlowError> {
    let location = response
        .header("location")
        .ok_or(AuthFlowError::MissingRedirect)?;
    parse_authorization_code(location)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::MockHttpTransport;
    use crate::error::BullhornError;
    use crate::types::{Credentials, EndpointConfig};
    use secrecy::SecretString;

    fn config() -> BullhornConfig {
        BullhornConfig {
            endpoints: EndpointConfig {
                authorize_endpoint: "https://auth.example.com/oauth/authorize".to_string(),
                token_endpoint: "https://auth.example.com/oauth/token".to_string(),
                login_endpoint: "https://rest.example.com/rest-services/login".to_string(),
            },
            credentials: Credentials {
                client_id: "client-1".to_string(),
                client_secret: SecretString::new("secret".to_string()),
                username: "jdoe".to_string(),
                password: SecretString::new("hunter2".to_string()),
            },
            ..BullhornConfig::default()
        }
    }

    fn html_response(body: &str) -> HttpResponse {
        HttpResponse {
            status: 200,
            headers: HashMap::new(),
            body: body.to_string(),
            final_url: None,
        }
    }

    #[tokio::test]
    async fn test_acquire_code_from_location_header() {
        let transport = Arc::new(MockHttpTransport::new());
        transport.queue_redirect("https://x/cb?code=AB%2F12&state=xyz");

        let acquirer = AuthorizationCodeAcquirer::new(config(), transport.clone());
        let code = acquirer.acquire_code("jdoe", "hunter2").await.unwrap();

        assert_eq!(code, "AB/12");

        let request = transport.get_last_request().unwrap();
        assert!(!request.follow_redirects);
        assert!(request.url.contains("response_type=code"));
        assert!(request.url.contains("action=Login"));
        assert!(request.url.contains("username=jdoe"));
    }

    #[tokio::test]
    async fn test_invalid_client_id_marker_fails_fast() {
        let transport = Arc::new(MockHttpTransport::new());
        transport.queue_response(html_response("<html>Invalid Client Id</html>"));

        let acquirer = AuthorizationCodeAcquirer::new(config(), transport.clone());
        let result = acquirer.acquire_code("jdoe", "hunter2").await;

        assert!(matches!(
            result,
            Err(BullhornError::AuthFlow(AuthFlowError::InvalidClientId))
        ));
        // No fallback request after a body-marker failure.
        assert_eq!(transport.request_count(), 1);
    }

    #[tokio::test]
    async fn test_invalid_credentials_marker_fails_fast() {
        let transport = Arc::new(MockHttpTransport::new());
        transport.queue_response(html_response(
            r#"<html><p class="error">Invalid username or password</p></html>"#,
        ));

        let acquirer = AuthorizationCodeAcquirer::new(config(), transport);
        let result = acquirer.acquire_code("jdoe", "wrong").await;

        assert!(matches!(
            result,
            Err(BullhornError::AuthFlow(AuthFlowError::InvalidCredentials))
        ));
    }

    #[tokio::test]
    async fn test_fallback_extracts_code_from_final_url() {
        let transport = Arc::new(MockHttpTransport::new());
        // Primary response: no Location header.
        transport.queue_response(html_response("<html>login form</html>"));
        // Fallback response: redirect chain ended on the callback URL.
        transport.queue_response(HttpResponse {
            status: 200,
            headers: HashMap::new(),
            body: String::new(),
            final_url: Some("https://x/cb?code=fallback-code&state=1".to_string()),
        });

        let acquirer = AuthorizationCodeAcquirer::new(config(), transport.clone());
        let code = acquirer.acquire_code("jdoe", "hunter2").await.unwrap();

        assert_eq!(code, "fallback-code");

        let requests = transport.get_requests();
        assert_eq!(requests.len(), 2);
        assert!(!requests[0].follow_redirects);
        assert!(requests[1].follow_redirects);
    }

    #[tokio::test]
    async fn test_fallback_extracts_code_from_body() {
        let transport = Arc::new(MockHttpTransport::new());
        transport.queue_redirect("https://x/cb?state=no-code-here");
        transport.queue_response(html_response("redirecting to ?code=body-code"));

        let acquirer = AuthorizationCodeAcquirer::new(config(), transport);
        let code = acquirer.acquire_code("jdoe", "hunter2").await.unwrap();

        assert_eq!(code, "body-code");
    }

    #[tokio::test]
    async fn test_both_paths_failing_reports_redacted_url() {
        let transport = Arc::new(MockHttpTransport::new());
        transport.queue_response(html_response("<html>login form</html>"));
        transport.queue_response(html_response("<html>still a login form</html>"));

        let acquirer = AuthorizationCodeAcquirer::new(config(), transport.clone());
        let result = acquirer.acquire_code("jdoe", "hunter2").await;

        match result {
            Err(BullhornError::AuthFlow(AuthFlowError::Failed {
                authorize_url,
                message,
            })) => {
                assert!(authorize_url.contains("[REDACTED]"));
                assert!(!authorize_url.contains("hunter2"));
                assert!(!message.contains("hunter2"));
            }
            other => panic!("expected Failed error, got {:?}", other),
        }
        assert_eq!(transport.request_count(), 2);
    }
}
