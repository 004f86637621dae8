//! plexgate gateway library entry.
//!
//! This crate wires the HTTP transport, the request/response bridge, the
//! routing substrate contract and its in-process implementation into a
//! gateway stack. It is consumed by the binary (`main.rs`) and by
//! integration tests.

pub mod app_state;
pub mod bridge;
pub mod config;
pub mod obs;
pub mod ops;
pub mod router;
pub mod services;
pub mod substrate;
pub mod transport;
