//! Response waiter: races an exchange's reply stream against its timeout.
//!
//! Heartbeats never terminate an exchange. Which reply does depends on
//! [`Termination`]. Whatever the outcome, the substrate subscription is
//! cancelled before returning so no further replies are delivered for the
//! exchange.

use futures_util::StreamExt;

use plexgate_core::error::{PlexError, Result};
use plexgate_core::protocol::{Envelope, ReservedAddresses};

use crate::config::schema::Termination;
use crate::substrate::Routed;

/// Terminal outcome of a successful exchange.
#[derive(Debug)]
pub struct Exchange {
    /// Reply written back to the caller.
    pub terminal: Envelope,
    /// Non-terminal replies dropped before it (`until_completed` only).
    pub partials: usize,
    /// Heartbeats discarded while waiting.
    pub heartbeats: usize,
}

/// Wait for the terminal reply of exchange `id`, or fail with `Timeout`.
pub async fn wait_for_reply(
    id: &str,
    routed: Routed,
    reserved: &ReservedAddresses,
    termination: Termination,
) -> Result<Exchange> {
    let Routed {
        mut responses,
        mut timeout,
        subscription,
    } = routed;

    let mut partials = 0usize;
    let mut heartbeats = 0usize;

    let outcome = loop {
        tokio::select! {
            biased;

            Some(reply) = responses.next() => {
                if reserved.is_heartbeat(&reply) {
                    heartbeats += 1;
                    tracing::trace!(%id, "heartbeat dropped");
                    continue;
                }
                match termination {
                    Termination::FirstReply => break Ok(reply),
                    Termination::UntilCompleted if reply.is_completed() => break Ok(reply),
                    Termination::UntilCompleted => {
                        partials += 1;
                        tracing::debug!(%id, seen = partials, "partial reply");
                    }
                }
            }

            _ = &mut timeout => {
                break Err(PlexError::Timeout { id: id.to_string() });
            }
        }
    };

    subscription.cancel();

    outcome.map(|terminal| Exchange {
        terminal,
        partials,
        heartbeats,
    })
}
