//! Core Components
//!
//! HTTP transport and authorize-URL handling.

pub mod authorize;
pub mod transport;

pub use authorize::*;
pub use transport::*;
