//! Shared builders and a scripted microservice for gateway tests.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]
#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{HeaderMap, Request, StatusCode};
use axum::Router;
use bytes::Bytes;
use http_body_util::BodyExt;
use tower::ServiceExt;

use plexgate_core::error::Result;
use plexgate_core::protocol::{codec, Envelope, Route, Routing, HEARTBEAT_URI};
use plexgate_gateway::app_state::AppState;
use plexgate_gateway::substrate::{LocalSubstrate, Microservice, ReplySink};
use plexgate_gateway::{config, router};

/// Replies with a fixed script, each step after its delay.
///
/// Replies without a uuid inherit the request's.
pub struct Scripted {
    pub authority: &'static str,
    pub script: Vec<(Duration, Envelope)>,
}

impl Scripted {
    pub fn new(authority: &'static str, script: Vec<(Duration, Envelope)>) -> Arc<dyn Microservice> {
        Arc::new(Self { authority, script })
    }
}

#[async_trait]
impl Microservice for Scripted {
    fn authority(&self) -> &'static str {
        self.authority
    }

    async fn handle(&self, request: Envelope, replies: ReplySink) -> Result<()> {
        for (delay, reply) in &self.script {
            tokio::time::sleep(*delay).await;
            let mut reply = reply.clone();
            if reply.uuid.is_none() {
                reply.uuid = request.uuid.clone();
            }
            replies.send(reply).await?;
        }
        Ok(())
    }
}

pub fn request(id: &str, to: &str) -> Envelope {
    Envelope {
        uuid: Some(id.into()),
        routing: Some(Routing {
            route_to: vec![Route::new(to)],
            route_from: vec![Route::new("microservice://testing/get/truecaller")],
        }),
        payload: Some(Bytes::from_static(br#"{"phone_number": "+385915256970"}"#)),
        completed: Some(true),
    }
}

pub fn reply(to: &str, completed: Option<bool>) -> Envelope {
    Envelope {
        routing: Some(Routing::to(to)),
        completed,
        ..Envelope::default()
    }
}

pub fn heartbeat() -> Envelope {
    reply(HEARTBEAT_URI, None)
}

pub fn now(env: Envelope) -> (Duration, Envelope) {
    (Duration::ZERO, env)
}

pub fn after(ms: u64, env: Envelope) -> (Duration, Envelope) {
    (Duration::from_millis(ms), env)
}

/// Gateway wired to a local substrate serving `services`.
pub fn app(yaml: &str, services: Vec<Arc<dyn Microservice>>) -> (Router, AppState, Arc<LocalSubstrate>) {
    let cfg = config::load_from_str(yaml).expect("test config must parse");
    let local = Arc::new(LocalSubstrate::new(cfg.bridge.timeout()));
    for svc in services {
        local.register(svc);
    }
    let state = AppState::new(cfg, local.clone());
    (router::build_router(state.clone()), state, local)
}

pub async fn send(app: &Router, req: Request<Body>) -> (StatusCode, HeaderMap, Vec<u8>) {
    let res = app.clone().oneshot(req).await.unwrap();
    let status = res.status();
    let headers = res.headers().clone();
    let body = res.into_body().collect().await.unwrap().to_bytes().to_vec();
    (status, headers, body)
}

pub async fn post(app: &Router, body: impl Into<Body>) -> (StatusCode, HeaderMap, Vec<u8>) {
    let req = Request::builder()
        .method("POST")
        .uri("/")
        .header("content-type", "text/plain")
        .body(body.into())
        .unwrap();
    send(app, req).await
}

pub async fn get(app: &Router, uri: &str) -> (StatusCode, HeaderMap, Vec<u8>) {
    let req = Request::builder().method("GET").uri(uri).body(Body::empty()).unwrap();
    send(app, req).await
}

/// POST `env` hex-encoded and decode the hex reply.
pub async fn exchange(app: &Router, env: &Envelope) -> Envelope {
    let (status, _, body) = post(app, codec::encode(env)).await;
    assert_eq!(status, StatusCode::OK);
    codec::decode(&body).expect("reply must be a hex envelope")
}
