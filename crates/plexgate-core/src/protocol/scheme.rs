//! Ingress normalization and destination scheme check.

use crate::error::{PlexError, Result};
use crate::protocol::envelope::{Envelope, Routing};

/// Scheme of requests dispatched through the substrate.
pub const MICROSERVICE_SCHEME: &str = "microservice";

/// How the validator treats an inbound envelope.
#[derive(Debug, Clone)]
pub struct IngressPolicy {
    /// The only scheme accepted in `route_to[0]`.
    pub required_scheme: String,
    /// Drop caller-supplied provenance.
    pub strip_route_from: bool,
}

impl Default for IngressPolicy {
    fn default() -> Self {
        Self {
            required_scheme: MICROSERVICE_SCHEME.to_string(),
            strip_route_from: true,
        }
    }
}

/// Scheme part of a URI-shaped address (text before `://`).
pub fn scheme_of(uri: &str) -> Option<&str> {
    uri.split_once("://")
        .map(|(scheme, _)| scheme)
        .filter(|s| !s.is_empty())
}

/// Normalize routing and require `route_to[0]` to carry the policy's scheme.
///
/// A missing `routing` becomes an empty one, so the returned envelope always
/// has routing set. Applying this to its own output is a no-op.
pub fn normalize(mut env: Envelope, policy: &IngressPolicy) -> Result<Envelope> {
    let routing = env.routing.get_or_insert_with(Routing::default);
    if policy.strip_route_from {
        routing.route_from.clear();
    }

    let uri = routing
        .route_to
        .first()
        .and_then(|r| r.uri.as_deref())
        .unwrap_or_default();
    let accepted =
        scheme_of(uri).is_some_and(|s| s.eq_ignore_ascii_case(&policy.required_scheme));
    if !accepted {
        let offending_uri = if uri.is_empty() { "<none>" } else { uri };
        tracing::debug!(uri = %offending_uri, required = %policy.required_scheme, "destination scheme rejected");
        return Err(PlexError::SchemeMismatch {
            offending_uri: offending_uri.to_string(),
        });
    }
    Ok(env)
}
