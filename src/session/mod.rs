//! Session State
//!
//! Persistence of the session triple (REST token, REST URL, refresh token).

pub mod store;

pub use store::*;
