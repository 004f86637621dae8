//! In-process substrate: microservices registered by authority, one task per
//! exchange, a per-exchange timer, and cancellable delivery.
//!
//! A request for an authority nobody serves is dropped and left to time out,
//! the same way an unconsumed broker message would be.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use dashmap::DashMap;
use futures_util::{stream, FutureExt, StreamExt};
use tokio::sync::{mpsc, oneshot};

use plexgate_core::error::{PlexError, Result};
use plexgate_core::protocol::Envelope;

use super::{Routed, Substrate, Subscription};

const DEFAULT_QUEUE_DEPTH: usize = 64;

/// A backend worker reachable as `microservice://<authority>/...`.
#[async_trait]
pub trait Microservice: Send + Sync {
    fn authority(&self) -> &'static str;
    async fn handle(&self, request: Envelope, replies: ReplySink) -> Result<()>;
}

/// Reply channel handed to a microservice for one exchange.
pub struct ReplySink {
    tx: mpsc::Sender<Envelope>,
}

impl ReplySink {
    /// Deliver one reply. Fails once the exchange has been abandoned.
    pub async fn send(&self, reply: Envelope) -> Result<()> {
        self.tx
            .send(reply)
            .await
            .map_err(|_| PlexError::Internal("exchange abandoned".into()))
    }
}

pub struct LocalSubstrate {
    services: DashMap<&'static str, Arc<dyn Microservice>>,
    in_flight: Arc<DashMap<u64, String>>,
    seq: AtomicU64,
    timeout: Duration,
    queue_depth: usize,
}

impl LocalSubstrate {
    pub fn new(timeout: Duration) -> Self {
        Self {
            services: DashMap::new(),
            in_flight: Arc::new(DashMap::new()),
            seq: AtomicU64::new(1),
            timeout,
            queue_depth: DEFAULT_QUEUE_DEPTH,
        }
    }

    pub fn register(&self, svc: Arc<dyn Microservice>) {
        self.services.insert(svc.authority(), svc);
    }

    pub fn registered(&self) -> Vec<&'static str> {
        self.services.iter().map(|e| *e.key()).collect()
    }

    /// Exchanges whose subscription has not been released yet.
    pub fn in_flight(&self) -> usize {
        self.in_flight.len()
    }

    fn lookup(&self, uri: &str) -> Option<Arc<dyn Microservice>> {
        let authority = authority_of(uri)?;
        self.services.get(authority).map(|e| Arc::clone(e.value()))
    }
}

/// `microservice://meta/get/x` => `meta`.
fn authority_of(uri: &str) -> Option<&str> {
    let (_, rest) = uri.split_once("://")?;
    rest.split('/').next().filter(|a| !a.is_empty())
}

#[async_trait]
impl Substrate for LocalSubstrate {
    async fn route(&self, request: Envelope) -> Routed {
        let key = self.seq.fetch_add(1, Ordering::Relaxed);
        self.in_flight.insert(key, request.id().to_string());

        let (tx, mut rx) = mpsc::channel::<Envelope>(self.queue_depth);
        let (fire, fired) = oneshot::channel::<()>();

        let destination = request.destination().unwrap_or_default().to_string();
        let worker = match self.lookup(&destination) {
            Some(svc) => {
                let sink = ReplySink { tx };
                Some(tokio::spawn(async move {
                    let id = request.id().to_string();
                    if let Err(e) = svc.handle(request, sink).await {
                        tracing::debug!(%id, error = %e, "microservice stopped");
                    }
                }))
            }
            None => {
                tracing::warn!(uri = %destination, "no microservice registered for destination");
                None
            }
        };

        let budget = self.timeout;
        let timer = tokio::spawn(async move {
            tokio::time::sleep(budget).await;
            let _ = fire.send(());
        });

        let in_flight = Arc::clone(&self.in_flight);
        let subscription = Subscription::new(move || {
            timer.abort();
            if let Some(worker) = worker {
                worker.abort();
            }
            in_flight.remove(&key);
        });

        let responses = stream::poll_fn(move |cx| rx.poll_recv(cx)).boxed();
        let timeout = async move {
            let _ = fired.await;
        }
        .boxed();

        Routed {
            responses,
            timeout,
            subscription,
        }
    }
}
