//! Top-level facade crate for plexgate.
//!
//! Re-exports the wire contracts and the gateway library so users can depend on a single crate.

pub mod core {
    pub use plexgate_core::*;
}

pub mod gateway {
    pub use plexgate_gateway::*;
}
