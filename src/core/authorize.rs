//! Authorize URL Handling
//!
//! Construction of the credential-bearing authorize URL and extraction of
//! the authorization code from a redirect target.
//!
//! Bullhorn's authorize endpoint accepts the account credentials as query
//! parameters and answers with a redirect whose `code` parameter carries
//! the one-time authorization code. The parameter set and the parsing
//! behavior (take everything between `code=` and the next `&`, then
//! URL-decode) must be preserved exactly.

use url::Url;

use crate::error::{AuthFlowError, BullhornError, ConfigurationError};

const PASSWORD_PARAM: &str = "password=";

/// Build the authorize URL with the credential query parameters.
///
/// The returned URL contains the plaintext password and must never be
/// logged as-is; pass it through [`redact_password`] first.
pub fn build_authorize_url(
    endpoint: &str,
    client_id: &str,
    username: &str,
    password: &str,
) -> Result<String, BullhornError> {
    let url = Url::parse_with_params(
        endpoint,
        &[
            ("response_type", "code"),
            ("action", "Login"),
            ("client_id", client_id),
            ("username", username),
            ("password", password),
        ],
    )
    .map_err(|_| {
        BullhornError::Configuration(ConfigurationError::InvalidEndpoint {
            url: endpoint.to_string(),
        })
    })?;

    Ok(url.to_string())
}

/// Replace the value of the `password` query parameter with a placeholder.
pub fn redact_password(url: &str) -> String {
    match url.find(PASSWORD_PARAM) {
        Some(index) => {
            let value_start = index + PASSWORD_PARAM.len();
            let value_end = url[value_start..]
                .find('&')
                .map(|offset| value_start + offset)
                .unwrap_or(url.len());
            format!("{}[REDACTED]{}", &url[..value_start], &url[value_end..])
        }
        None => url.to_string(),
    }
}

/// Extract the authorization code from a redirect target or raw text.
///
/// Takes the substring between `code=` and the next `&` and URL-decodes it.
pub fn parse_authorization_code(input: &str) -> Result<String, AuthFlowError> {
    let code_parse = || AuthFlowError::CodeParse {
        location: redact_password(input),
    };

    let after_marker = input
        .split_once("code=")
        .map(|(_, rest)| rest)
        .ok_or_else(code_parse)?;

    let raw = after_marker.split('&').next().unwrap_or(after_marker);
    let decoded = urlencoding::decode(raw).map_err(|_| code_parse())?;

    Ok(decoded.into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_authorize_url_parameter_set() {
        let url = build_authorize_url(
            "https://auth.example.com/oauth/authorize",
            "client-1",
            "jdoe",
            "hunter2",
        )
        .unwrap();

        assert!(url.starts_with("https://auth.example.com/oauth/authorize?"));
        assert!(url.contains("response_type=code"));
        assert!(url.contains("action=Login"));
        assert!(url.contains("client_id=client-1"));
        assert!(url.contains("username=jdoe"));
        assert!(url.contains("password=hunter2"));
    }

    #[test]
    fn test_build_authorize_url_encodes_values() {
        let url = build_authorize_url(
            "https://auth.example.com/oauth/authorize",
            "client-1",
            "j doe",
            "p&ss=word",
        )
        .unwrap();

        assert!(url.contains("username=j+doe") || url.contains("username=j%20doe"));
        assert!(!url.contains("p&ss=word"));
    }

    #[test]
    fn test_build_authorize_url_invalid_endpoint() {
        let result = build_authorize_url("not a url", "client-1", "jdoe", "pw");
        assert!(matches!(
            result,
            Err(BullhornError::Configuration(
                ConfigurationError::InvalidEndpoint { .. }
            ))
        ));
    }

    #[test]
    fn test_redact_password_middle_and_end() {
        assert_eq!(
            redact_password("https://x/a?password=secret&state=1"),
            "https://x/a?password=[REDACTED]&state=1"
        );
        assert_eq!(
            redact_password("https://x/a?user=jdoe&password=secret"),
            "https://x/a?user=jdoe&password=[REDACTED]"
        );
        assert_eq!(redact_password("https://x/a?user=jdoe"), "https://x/a?user=jdoe");
    }

    #[test]
    fn test_parse_code_decodes_and_truncates() {
        let code = parse_authorization_code("https://x/cb?code=AB%2F12&state=xyz").unwrap();
        assert_eq!(code, "AB/12");
    }

    #[test]
    fn test_parse_code_without_trailing_params() {
        let code = parse_authorization_code("https://x/cb?code=plain-code").unwrap();
        assert_eq!(code, "plain-code");
    }

    #[test]
    fn test_parse_code_missing_marker() {
        let result = parse_authorization_code("https://x/cb?state=xyz");
        assert!(matches!(result, Err(AuthFlowError::CodeParse { .. })));
    }

    #[test]
    fn test_parse_code_error_redacts_password() {
        let result = parse_authorization_code("https://x/authorize?password=secret&state=1");
        match result {
            Err(AuthFlowError::CodeParse { location }) => {
                assert!(!location.contains("secret"));
                assert!(location.contains("[REDACTED]"));
            }
            other => panic!("expected CodeParse error, got {:?}", other),
        }
    }
}
