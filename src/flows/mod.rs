//! Session Flows
//!
//! The three steps that turn account credentials into an active REST
//! session:
//!
//! - **Authorization code acquisition**: simulated login redirect with
//!   credentials in the authorize query string
//! - **Token exchange**: authorization code or refresh token for an
//!   access/refresh token pair
//! - **Login**: access token for a REST session (token + base URL)

pub mod authorization;
pub mod login;
pub mod token_exchange;

pub use authorization::*;
pub use login::*;
pub use token_exchange::*;
