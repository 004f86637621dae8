use async_trait::async_trait;

use plexgate_core::error::Result;
use plexgate_core::protocol::{Envelope, Routing};

use crate::substrate::{Microservice, ReplySink};

/// Replies with the request payload. Useful to prove the HTTP <-> substrate path.
///
/// `microservice://echo/<path>` is answered on `resource:///echo/reply/<path>`.
pub struct EchoService;

impl EchoService {
    pub fn new() -> Self {
        Self
    }
}

impl Default for EchoService {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Microservice for EchoService {
    fn authority(&self) -> &'static str {
        "echo"
    }

    async fn handle(&self, request: Envelope, replies: ReplySink) -> Result<()> {
        let path = request
            .destination()
            .and_then(|uri| uri.split_once("://echo/"))
            .map(|(_, path)| path.to_string())
            .unwrap_or_default();

        replies
            .send(Envelope {
                uuid: request.uuid,
                routing: Some(Routing::to(format!("resource:///echo/reply/{path}"))),
                payload: request.payload,
                completed: Some(true),
            })
            .await
    }
}
