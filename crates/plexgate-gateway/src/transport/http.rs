//! HTTP handlers for the bridge endpoint and server discovery.
//!
//! `POST /` always answers 200. Failures travel inside the envelope.

use axum::body::Body;
use axum::extract::{Query, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use serde::Deserialize;
use serde_json::json;

use plexgate_core::error::PlexError;
use plexgate_core::protocol::{codec, ResponseEncoding};

use crate::app_state::AppState;

/// `POST /`: hex envelope in, encoded reply envelope out.
pub async fn bridge_endpoint(State(app): State<AppState>, body: Body) -> Response {
    let limit = app.cfg().gateway.max_body_bytes;
    let body = axum::body::to_bytes(body, limit)
        .await
        .map_err(|e| PlexError::Read(e.to_string()));

    let bridge = app.bridge();
    let reply = bridge.respond(body).await;

    let encoding = bridge.encoding();
    let content_type = match encoding {
        ResponseEncoding::Hex => "text/plain; charset=utf-8",
        ResponseEncoding::Raw => "application/octet-stream",
    };
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, content_type)],
        codec::encode_as(&reply, encoding),
    )
        .into_response()
}

/// `OPTIONS /`: CORS preflight; headers come from the middleware.
pub async fn preflight() -> StatusCode {
    StatusCode::OK
}

#[derive(Debug, Deserialize)]
pub struct DiscoveryQuery {
    #[serde(default)]
    pub callback: Option<String>,
}

/// `GET /server[?callback=NAME]`: where to reach this router, as JSON or JSONP.
pub async fn server_discovery(
    State(app): State<AppState>,
    Query(q): Query<DiscoveryQuery>,
) -> Response {
    let d = &app.cfg().discovery;
    let body = json!({
        "protocol": d.protocol,
        "host": d.formatted_host(),
        "port": d.port,
    })
    .to_string();

    match q.callback.filter(|cb| is_callback_name(cb)) {
        Some(cb) => (
            [(header::CONTENT_TYPE, "application/javascript")],
            format!("{cb}({body})"),
        )
            .into_response(),
        None => ([(header::CONTENT_TYPE, "application/json")], body).into_response(),
    }
}

/// JavaScript identifier path such as `cb`, `$jsonp_1`, `app.onServer`.
fn is_callback_name(s: &str) -> bool {
    !s.is_empty()
        && s.len() <= 128
        && s.bytes()
            .all(|b| b.is_ascii_alphanumeric() || matches!(b, b'_' | b'$' | b'.'))
}
