//! Bullhorn Types
//!
//! Core type definitions for the session lifecycle and REST calls.

pub mod config;
pub mod request;
pub mod session;

pub use config::*;
pub use request::*;
pub use session::*;
