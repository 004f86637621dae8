//! In-process substrate: dispatch by authority, timers, cancellation.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use std::sync::Arc;
use std::time::Duration;

use futures_util::StreamExt;

use plexgate_core::error::PlexError;
use plexgate_core::protocol::ReservedAddresses;
use plexgate_gateway::bridge::wait_for_reply;
use plexgate_gateway::config::Termination;
use plexgate_gateway::services::EchoService;
use plexgate_gateway::substrate::{LocalSubstrate, Substrate};

mod common;
use common::{after, heartbeat, now, reply, request, Scripted};

#[tokio::test]
async fn delivers_replies_from_the_registered_authority() {
    let local = LocalSubstrate::new(Duration::from_secs(5));
    local.register(Scripted::new("meta", vec![now(reply("resource:///x/reply/x", None))]));

    let routed = local.route(request("req-1", "microservice://meta/get/x")).await;
    assert_eq!(local.in_flight(), 1);

    let mut responses = routed.responses;
    let got = responses.next().await.unwrap();
    assert_eq!(got.destination(), Some("resource:///x/reply/x"));
    assert_eq!(got.id(), "req-1");

    routed.subscription.cancel();
    assert_eq!(local.in_flight(), 0);
}

#[tokio::test]
async fn unknown_authority_ends_stream_and_times_out() {
    let local = LocalSubstrate::new(Duration::from_millis(20));
    let routed = local.route(request("req-2", "microservice://nobody/get/x")).await;

    let mut responses = routed.responses;
    assert!(responses.next().await.is_none());

    tokio::time::timeout(Duration::from_secs(2), routed.timeout)
        .await
        .expect("timeout signal must fire");
}

#[tokio::test]
async fn cancel_stops_further_delivery() {
    let local = LocalSubstrate::new(Duration::from_secs(5));
    local.register(Scripted::new(
        "meta",
        vec![
            now(reply("resource:///x/reply/one", Some(false))),
            after(500, reply("resource:///x/reply/two", Some(true))),
        ],
    ));

    let routed = local.route(request("req-3", "microservice://meta/get/x")).await;
    let mut responses = routed.responses;
    assert!(responses.next().await.is_some());

    routed.subscription.cancel();
    let rest = tokio::time::timeout(Duration::from_secs(2), responses.next())
        .await
        .expect("stream must close after cancel");
    assert!(rest.is_none());
    assert_eq!(local.in_flight(), 0);
}

#[tokio::test]
async fn dropping_the_subscription_releases_the_exchange() {
    let local = LocalSubstrate::new(Duration::from_secs(5));
    let routed = local.route(request("req-4", "microservice://nobody/x")).await;
    assert_eq!(local.in_flight(), 1);
    drop(routed);
    assert_eq!(local.in_flight(), 0);
}

#[tokio::test]
async fn timed_out_exchange_leaves_nothing_in_flight() {
    let local = LocalSubstrate::new(Duration::from_millis(50));
    local.register(Scripted::new(
        "chatty",
        vec![after(10, heartbeat()), after(10, heartbeat()), after(1_000, reply("resource:///late", None))],
    ));

    let routed = local.route(request("req-5", "microservice://chatty/get/x")).await;
    let err = wait_for_reply("req-5", routed, &ReservedAddresses::default(), Termination::FirstReply)
        .await
        .unwrap_err();

    assert!(matches!(err, PlexError::Timeout { .. }));
    assert_eq!(local.in_flight(), 0);
}

#[tokio::test]
async fn echo_service_mirrors_payload() {
    let local = LocalSubstrate::new(Duration::from_secs(5));
    local.register(Arc::new(EchoService::new()));
    assert_eq!(local.registered(), vec!["echo"]);

    let req = request("req-6", "microservice://echo/say/hello");
    let payload = req.payload.clone();
    let routed = local.route(req).await;

    let ex = wait_for_reply("req-6", routed, &ReservedAddresses::default(), Termination::UntilCompleted)
        .await
        .unwrap();
    assert_eq!(ex.terminal.destination(), Some("resource:///echo/reply/say/hello"));
    assert_eq!(ex.terminal.payload, payload);
    assert_eq!(ex.terminal.id(), "req-6");
    assert!(ex.terminal.is_completed());
}
