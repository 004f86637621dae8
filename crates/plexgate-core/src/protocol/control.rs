//! Reserved control addresses: heartbeat filtering and error envelopes.

use bytes::Bytes;
use prost::Message;

use crate::error::Result;
use crate::protocol::envelope::{Envelope, ErrorMessage, Routing};

/// Liveness probe reply; never a terminal reply.
pub const HEARTBEAT_URI: &str = "resource:///heartbeat";

/// Destination of every error envelope produced by the bridge.
pub const ERROR_URI: &str = "resource:///router-http/reply/error";

/// The two literal addresses the bridge treats specially.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReservedAddresses {
    pub heartbeat: String,
    pub error: String,
}

impl Default for ReservedAddresses {
    fn default() -> Self {
        Self {
            heartbeat: HEARTBEAT_URI.to_string(),
            error: ERROR_URI.to_string(),
        }
    }
}

impl ReservedAddresses {
    /// True iff `reply` is addressed to the heartbeat resource.
    pub fn is_heartbeat(&self, reply: &Envelope) -> bool {
        reply.destination() == Some(self.heartbeat.as_str())
    }

    /// Wrap a failure message into a complete, encodable envelope.
    ///
    /// `id` is the original exchange id when the failure happened after the
    /// request was decoded.
    pub fn error_envelope(&self, id: Option<&str>, message: impl Into<String>) -> Envelope {
        let body = ErrorMessage {
            message: Some(message.into()),
        };
        Envelope {
            uuid: id.filter(|s| !s.is_empty()).map(str::to_string),
            routing: Some(Routing::to(self.error.as_str())),
            payload: Some(Bytes::from(body.encode_to_vec())),
            completed: Some(true),
        }
    }

    /// True iff `env` was produced by [`ReservedAddresses::error_envelope`].
    pub fn is_error(&self, env: &Envelope) -> bool {
        env.destination() == Some(self.error.as_str())
    }
}

/// Decode the `Error` payload of an error envelope.
pub fn read_error(env: &Envelope) -> Result<String> {
    let msg = ErrorMessage::decode(env.payload.as_deref().unwrap_or_default())?;
    Ok(msg.message.unwrap_or_default())
}
