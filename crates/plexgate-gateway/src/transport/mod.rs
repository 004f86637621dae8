//! Transport layer (HTTP).
//!
//! Thin axum handlers around the bridge plus the CORS middleware. No bridge
//! logic lives here: handlers read the body, call `Bridge::respond`, and
//! encode whatever envelope comes back.

pub mod cors;
pub mod http;
