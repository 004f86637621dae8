//! plexgate core: transport-agnostic envelope contracts and error types.
//!
//! This crate defines the wire format exchanged with backend workers and the
//! bridge rules applied at the HTTP boundary (scheme check, heartbeat
//! filter, error envelopes). It carries no runtime or HTTP dependencies so
//! worker-side tooling can reuse it.
//!
//! # Defensive guarantees
//! Panics, `unwrap`, and `expect` are compile-denied here. Every fallible path
//! surfaces as `PlexError`/`Result`; the gateway turns those into error
//! envelopes instead of failing the request.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

pub mod error;
pub mod protocol;

/// Shared result type.
pub use error::{ClientCode, PlexError, Result};
