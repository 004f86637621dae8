//! HTTP body -> substrate exchange -> reply envelope.
//!
//! `Bridge::respond` never fails: every error (read, decode, parse, scheme,
//! timeout) is folded into an error envelope addressed to the reserved error
//! resource, so the transport always has an envelope to encode.

pub mod waiter;

use std::sync::Arc;
use std::time::Instant;

use bytes::Bytes;
use tracing::Instrument;

use plexgate_core::error::{PlexError, Result};
use plexgate_core::protocol::{codec, scheme};
use plexgate_core::protocol::{Envelope, IngressPolicy, ReservedAddresses, ResponseEncoding};

use crate::config::schema::{BridgeSection, Termination};
use crate::obs::metrics::GatewayMetrics;
use crate::substrate::Substrate;

pub use waiter::{wait_for_reply, Exchange};

/// Outcome label of an exchange whose caller went away before the reply.
pub const ABANDONED: &str = "abandoned";

pub struct Bridge {
    substrate: Arc<dyn Substrate>,
    ingress: IngressPolicy,
    reserved: ReservedAddresses,
    termination: Termination,
    encoding: ResponseEncoding,
    metrics: Arc<GatewayMetrics>,
}

impl Bridge {
    pub fn new(cfg: &BridgeSection, substrate: Arc<dyn Substrate>, metrics: Arc<GatewayMetrics>) -> Self {
        Self {
            substrate,
            ingress: cfg.ingress_policy(),
            reserved: cfg.reserved_addresses(),
            termination: cfg.termination,
            encoding: cfg.response_encoding.into(),
            metrics,
        }
    }

    pub fn encoding(&self) -> ResponseEncoding {
        self.encoding
    }

    pub fn reserved(&self) -> &ReservedAddresses {
        &self.reserved
    }

    /// Bridge one HTTP body and return the envelope to send back.
    pub async fn respond(&self, body: Result<Bytes>) -> Envelope {
        let mut tally = Tally::open(&self.metrics);

        let reply = match body.and_then(|b| codec::decode(&b)) {
            Ok(request) => {
                let id = request.id().to_string();
                let span = tracing::info_span!("exchange", %id);
                self.exchange(request, &mut tally).instrument(span).await
            }
            Err(e) => self.fail(&mut tally, None, e),
        };
        reply
    }

    async fn exchange(&self, request: Envelope, tally: &mut Tally<'_>) -> Envelope {
        let id = request.id().to_string();
        let request = match scheme::normalize(request, &self.ingress) {
            Ok(r) => r,
            Err(e) => return self.fail(tally, Some(&id), e),
        };

        tracing::debug!(uri = request.destination().unwrap_or_default(), "routing request");
        let routed = self.substrate.route(request).await;

        match wait_for_reply(&id, routed, &self.reserved, self.termination).await {
            Ok(ex) => {
                self.record(tally, &ex);
                tracing::debug!(
                    uri = ex.terminal.destination().unwrap_or_default(),
                    partials = ex.partials,
                    heartbeats = ex.heartbeats,
                    "terminal reply"
                );
                ex.terminal
            }
            Err(e) => self.fail(tally, Some(&id), e),
        }
    }

    fn record(&self, tally: &mut Tally<'_>, ex: &Exchange) {
        tally.close("ok");
        if ex.heartbeats > 0 {
            self.metrics.heartbeats_dropped.add(&[], ex.heartbeats as u64);
        }
        if ex.partials > 0 {
            self.metrics.partial_replies.add(&[], ex.partials as u64);
        }
    }

    fn fail(&self, tally: &mut Tally<'_>, id: Option<&str>, e: PlexError) -> Envelope {
        let code = e.client_code();
        tally.close(code.as_str());
        tracing::warn!(code = code.as_str(), error = %e, "exchange failed");
        self.reserved.error_envelope(id, e.to_string())
    }
}

/// Per-exchange metric bookkeeping, settled on drop.
///
/// The handler future is dropped when the caller goes away mid-exchange; the
/// gauge, the duration and the outcome are still recorded then, with the
/// outcome `abandoned`.
struct Tally<'a> {
    metrics: &'a GatewayMetrics,
    started: Instant,
    outcome: Option<&'static str>,
}

impl<'a> Tally<'a> {
    fn open(metrics: &'a GatewayMetrics) -> Self {
        metrics.exchanges_in_flight.inc(&[]);
        Self {
            metrics,
            started: Instant::now(),
            outcome: None,
        }
    }

    fn close(&mut self, outcome: &'static str) {
        self.outcome = Some(outcome);
    }
}

impl Drop for Tally<'_> {
    fn drop(&mut self) {
        let elapsed = self.started.elapsed();
        let outcome = self.outcome.unwrap_or(ABANDONED);
        self.metrics.exchanges_in_flight.dec(&[]);
        self.metrics.exchange_duration.observe(&[], elapsed);
        self.metrics.exchanges.inc(&[("outcome", outcome)]);
        tracing::debug!(outcome, elapsed_ms = elapsed.as_millis(), "exchange finished");
    }
}
