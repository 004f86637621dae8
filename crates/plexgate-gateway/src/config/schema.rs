use std::net::SocketAddr;
use std::time::Duration;

use serde::Deserialize;

use plexgate_core::error::{PlexError, Result};
use plexgate_core::protocol::{scheme, IngressPolicy, ReservedAddresses, ResponseEncoding};
use plexgate_core::protocol::{ERROR_URI, HEARTBEAT_URI, MICROSERVICE_SCHEME};

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GatewayConfig {
    pub version: u32,

    #[serde(default)]
    pub gateway: GatewaySection,

    #[serde(default)]
    pub discovery: DiscoverySection,

    #[serde(default)]
    pub bridge: BridgeSection,
}

impl GatewayConfig {
    pub fn validate(&self) -> Result<()> {
        if self.version != 1 {
            return Err(PlexError::UnsupportedVersion);
        }

        self.gateway.validate()?;
        self.discovery.validate()?;
        self.bridge.validate()?;

        Ok(())
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GatewaySection {
    #[serde(default = "default_listen")]
    pub listen: String,

    /// Upper bound on a request body; larger bodies fail as read errors.
    #[serde(default = "default_max_body_bytes")]
    pub max_body_bytes: usize,
}

impl Default for GatewaySection {
    fn default() -> Self {
        Self {
            listen: default_listen(),
            max_body_bytes: default_max_body_bytes(),
        }
    }
}

impl GatewaySection {
    pub fn validate(&self) -> Result<()> {
        self.listen.parse::<SocketAddr>().map_err(|e| {
            PlexError::BadRequest(format!("gateway.listen must be a valid SocketAddr: {e}"))
        })?;
        if !(1..=16 * 1024 * 1024).contains(&self.max_body_bytes) {
            return Err(PlexError::BadRequest(
                "gateway.max_body_bytes must be between 1 and 16777216".into(),
            ));
        }
        Ok(())
    }
}

fn default_listen() -> String {
    "0.0.0.0:8080".into()
}
fn default_max_body_bytes() -> usize {
    1024 * 1024
}

/// Values advertised by `GET /server`.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DiscoverySection {
    #[serde(default = "default_protocol")]
    pub protocol: String,

    /// Public IPv4 of this router.
    #[serde(default = "default_ip_addr")]
    pub ip_addr: String,

    #[serde(default = "default_port")]
    pub port: String,

    #[serde(default = "default_host_suffix")]
    pub host_suffix: String,
}

impl Default for DiscoverySection {
    fn default() -> Self {
        Self {
            protocol: default_protocol(),
            ip_addr: default_ip_addr(),
            port: default_port(),
            host_suffix: default_host_suffix(),
        }
    }
}

impl DiscoverySection {
    pub fn validate(&self) -> Result<()> {
        if !matches!(self.protocol.as_str(), "http" | "https") {
            return Err(PlexError::BadRequest(
                "discovery.protocol must be http or https".into(),
            ));
        }
        if self.port.parse::<u16>().is_err() {
            return Err(PlexError::BadRequest(
                "discovery.port must be a valid port number".into(),
            ));
        }
        if self.ip_addr.is_empty() || self.host_suffix.is_empty() {
            return Err(PlexError::BadRequest(
                "discovery.ip_addr and discovery.host_suffix must not be empty".into(),
            ));
        }
        Ok(())
    }

    /// `10.0.0.7` + `microplatform.io` => `10-0-0-7.microplatform.io`.
    pub fn formatted_host(&self) -> String {
        format!("{}.{}", self.ip_addr.replace('.', "-"), self.host_suffix)
    }
}

fn default_protocol() -> String {
    "https".into()
}
fn default_ip_addr() -> String {
    "127.0.0.1".into()
}
fn default_port() -> String {
    "443".into()
}
fn default_host_suffix() -> String {
    "microplatform.io".into()
}

/// When the response waiter stops listening for replies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Termination {
    /// The first non-heartbeat reply ends the exchange.
    #[default]
    FirstReply,
    /// Keep collecting replies until one has `completed = true`.
    UntilCompleted,
}

/// Body form of `POST /` responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BodyEncoding {
    #[default]
    Hex,
    Raw,
}

impl From<BodyEncoding> for ResponseEncoding {
    fn from(v: BodyEncoding) -> Self {
        match v {
            BodyEncoding::Hex => ResponseEncoding::Hex,
            BodyEncoding::Raw => ResponseEncoding::Raw,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BridgeSection {
    #[serde(default = "default_required_scheme")]
    pub required_scheme: String,

    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    #[serde(default)]
    pub termination: Termination,

    #[serde(default)]
    pub response_encoding: BodyEncoding,

    #[serde(default = "default_strip_route_from")]
    pub strip_route_from: bool,

    #[serde(default = "default_heartbeat_uri")]
    pub heartbeat_uri: String,

    #[serde(default = "default_error_uri")]
    pub error_uri: String,
}

impl Default for BridgeSection {
    fn default() -> Self {
        Self {
            required_scheme: default_required_scheme(),
            timeout_ms: default_timeout_ms(),
            termination: Termination::default(),
            response_encoding: BodyEncoding::default(),
            strip_route_from: default_strip_route_from(),
            heartbeat_uri: default_heartbeat_uri(),
            error_uri: default_error_uri(),
        }
    }
}

impl BridgeSection {
    pub fn validate(&self) -> Result<()> {
        if self.required_scheme.is_empty() || self.required_scheme.contains(':') {
            return Err(PlexError::BadRequest(
                "bridge.required_scheme must be a bare scheme name".into(),
            ));
        }
        if !(10..=300000).contains(&self.timeout_ms) {
            return Err(PlexError::BadRequest(
                "bridge.timeout_ms must be between 10 and 300000".into(),
            ));
        }
        for (key, uri) in [
            ("bridge.heartbeat_uri", &self.heartbeat_uri),
            ("bridge.error_uri", &self.error_uri),
        ] {
            if scheme::scheme_of(uri).is_none() {
                return Err(PlexError::BadRequest(format!(
                    "{key} must be a scheme://authority/path address"
                )));
            }
        }
        if self.heartbeat_uri == self.error_uri {
            return Err(PlexError::BadRequest(
                "bridge.heartbeat_uri and bridge.error_uri must differ".into(),
            ));
        }
        Ok(())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    pub fn ingress_policy(&self) -> IngressPolicy {
        IngressPolicy {
            required_scheme: self.required_scheme.clone(),
            strip_route_from: self.strip_route_from,
        }
    }

    pub fn reserved_addresses(&self) -> ReservedAddresses {
        ReservedAddresses {
            heartbeat: self.heartbeat_uri.clone(),
            error: self.error_uri.clone(),
        }
    }
}

fn default_required_scheme() -> String {
    MICROSERVICE_SCHEME.into()
}
fn default_timeout_ms() -> u64 {
    10000
}
fn default_strip_route_from() -> bool {
    true
}
fn default_heartbeat_uri() -> String {
    HEARTBEAT_URI.into()
}
fn default_error_uri() -> String {
    ERROR_URI.into()
}
