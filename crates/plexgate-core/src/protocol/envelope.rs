//! Platform envelope (protobuf, proto2 presence).
//!
//! Tag numbers are shared with every backend worker and must not change:
//!
//! ```text
//! message Route   { optional string uri = 1; }
//! message Routing { repeated Route route_to = 1; repeated Route route_from = 2; }
//! message Request { optional string uuid = 1; optional Routing routing = 2;
//!                   optional bytes payload = 3; optional bool completed = 4; }
//! message Error   { optional string message = 1; }
//! ```
//!
//! Scalars are `Option` so that a decoded envelope re-encodes to the same
//! set of fields.

use bytes::Bytes;

/// A single address: `scheme://authority/path`.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct Route {
    #[prost(string, optional, tag = "1")]
    pub uri: Option<String>,
}

impl Route {
    pub fn new(uri: impl Into<String>) -> Self {
        Self {
            uri: Some(uri.into()),
        }
    }
}

/// Destination and provenance addresses of an envelope.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct Routing {
    /// Ordered destinations; `route_to[0]` drives dispatch.
    #[prost(message, repeated, tag = "1")]
    pub route_to: Vec<Route>,
    /// Provenance, most recent hop last.
    #[prost(message, repeated, tag = "2")]
    pub route_from: Vec<Route>,
}

impl Routing {
    /// Routing with a single destination and no provenance.
    pub fn to(uri: impl Into<String>) -> Self {
        Self {
            route_to: vec![Route::new(uri)],
            route_from: Vec::new(),
        }
    }
}

/// Unit of request/reply exchanged across the bridge.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct Envelope {
    /// Correlation id assigned by the originator.
    #[prost(string, optional, tag = "1")]
    pub uuid: Option<String>,
    #[prost(message, optional, tag = "2")]
    pub routing: Option<Routing>,
    /// Opaque, owned by the destination service.
    #[prost(bytes = "bytes", optional, tag = "3")]
    pub payload: Option<Bytes>,
    /// Marks the terminal message of an exchange.
    #[prost(bool, optional, tag = "4")]
    pub completed: Option<bool>,
}

impl Envelope {
    /// Correlation id, empty when unset.
    pub fn id(&self) -> &str {
        self.uuid.as_deref().unwrap_or_default()
    }

    pub fn is_completed(&self) -> bool {
        self.completed.unwrap_or(false)
    }

    /// Address of the primary destination, if any.
    pub fn destination(&self) -> Option<&str> {
        self.routing
            .as_ref()
            .and_then(|r| r.route_to.first())
            .and_then(|r| r.uri.as_deref())
    }
}

/// Failure description carried as the payload of an error envelope.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ErrorMessage {
    #[prost(string, optional, tag = "1")]
    pub message: Option<String>,
}
