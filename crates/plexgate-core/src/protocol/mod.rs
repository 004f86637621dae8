//! Wire protocol: the platform envelope and the rules applied to it at the
//! HTTP boundary.
//!
//! - `envelope`: protobuf message types shared with backend workers.
//! - `codec`: hex transport wrapping and raw protobuf marshalling.
//! - `scheme`: ingress normalization and destination scheme check.
//! - `control`: reserved heartbeat/error addresses.
//!
//! All decoders are panic-free: malformed input is reported as `PlexError`
//! and later folded into an error envelope by the gateway.

pub mod codec;
pub mod control;
pub mod envelope;
pub mod scheme;

pub use codec::ResponseEncoding;
pub use control::{ReservedAddresses, ERROR_URI, HEARTBEAT_URI};
pub use envelope::{Envelope, ErrorMessage, Route, Routing};
pub use scheme::{IngressPolicy, MICROSERVICE_SCHEME};
