//! Routing substrate contract.
//!
//! The bridge never talks to a broker directly. It hands a validated envelope
//! to a [`Substrate`] and gets back the replies for that exchange, a timeout
//! signal, and a [`Subscription`] used to stop delivery once the exchange is
//! over. Implementations are injected through `AppState`.

pub mod local;

use async_trait::async_trait;
use futures_util::future::BoxFuture;
use futures_util::stream::BoxStream;

use plexgate_core::protocol::Envelope;

pub use local::{LocalSubstrate, Microservice, ReplySink};

/// Replies correlated with one submitted request, in delivery order.
pub type ReplyStream = BoxStream<'static, Envelope>;

/// Resolves once when the exchange's budget is exhausted.
pub type TimeoutSignal = BoxFuture<'static, ()>;

/// Everything the response waiter needs for one exchange.
pub struct Routed {
    pub responses: ReplyStream,
    pub timeout: TimeoutSignal,
    pub subscription: Subscription,
}

/// Delivery registration for one exchange.
///
/// Cancelling (explicitly or by drop) tells the substrate to stop delivering
/// replies and to release whatever it holds for the exchange. Runs at most once.
pub struct Subscription {
    release: Option<Box<dyn FnOnce() + Send>>,
}

impl Subscription {
    pub fn new(release: impl FnOnce() + Send + 'static) -> Self {
        Self {
            release: Some(Box::new(release)),
        }
    }

    pub fn cancel(mut self) {
        self.release_now();
    }

    fn release_now(&mut self) {
        if let Some(release) = self.release.take() {
            release();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.release_now();
    }
}

/// Capability to dispatch an envelope into the backend messaging system.
#[async_trait]
pub trait Substrate: Send + Sync {
    /// Submit `request` and subscribe to its replies.
    ///
    /// The returned timeout signal must fire exactly once unless the
    /// subscription is cancelled first.
    async fn route(&self, request: Envelope) -> Routed;
}
