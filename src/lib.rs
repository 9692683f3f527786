//! Bullhorn Integration
//!
//! Client for the Bullhorn CRM REST API and its OAuth2-flavoured session
//! protocol. Establishing a session takes three network steps: a simulated
//! login against the authorize endpoint that yields a one-time authorization
//! code, an exchange of that code for an access/refresh token pair, and a
//! REST login that trades the access token for a `BhRestToken` plus the
//! account-specific REST base URL. The client drives that chain, persists
//! the resulting session triple in a pluggable key/value cache, and replays
//! it on every REST call, refreshing once when the server reports the token
//! expired.
//!
//! # Example
//!
//! ```no_run
//! use bullhorn_integration::{bullhorn_config, BullhornClient};
//! use bullhorn_integration::core::HttpMethod;
//! use bullhorn_integration::types::RequestOptions;
//! use std::collections::HashMap;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = bullhorn_config()
//!     .client_id("my-client-id")
//!     .client_secret("my-client-secret")
//!     .username("api.user")
//!     .password("api.password")
//!     .authorize_endpoint("https://auth.bullhornstaffing.com/oauth/authorize")
//!     .token_endpoint("https://auth.bullhornstaffing.com/oauth/token")
//!     .login_endpoint("https://rest.bullhornstaffing.com/rest-services/login")
//!     .build()?;
//!
//! let client = BullhornClient::new(config)?;
//! let candidate = client
//!     .request(
//!         HttpMethod::Get,
//!         "entity/Candidate/42",
//!         &RequestOptions::default().with_query("fields", "id,firstName"),
//!         &HashMap::new(),
//!     )
//!     .await?;
//! println!("{candidate}");
//! # Ok(())
//! # }
//! ```

pub mod builders;
pub mod cache;
pub mod client;
pub mod core;
pub mod error;
pub mod flows;
pub mod session;
pub mod types;

pub use builders::{bullhorn_config, BullhornConfigBuilder};
pub use cache::{InMemoryCache, KeyValueCache, MockCache};
pub use client::BullhornClient;
pub use crate::core::{
    HttpMethod, HttpRequest, HttpResponse, HttpTransport, MockHttpTransport, ReqwestHttpTransport,
};
pub use error::{BullhornError, BullhornResult};
pub use flows::{AuthorizationCodeAcquirer, SessionEstablisher, TokenExchanger};
pub use session::SessionStore;
pub use types::{
    BullhornConfig, RequestOptions, Session, SessionOptions, TokenResponse,
};
