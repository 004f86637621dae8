#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use std::time::Duration;

use plexgate_gateway::config::{self, BodyEncoding, Termination};

#[test]
fn deny_unknown_fields_nested() {
    let bad = r#"
version: 1
gateway:
  listen: "0.0.0.0:8080"
bridge:
  timeout_msec: 500 # typo should fail
"#;

    let err = config::load_from_str(bad).expect_err("must fail");
    assert_eq!(err.client_code().as_str(), "BAD_REQUEST");
}

#[test]
fn ok_minimal_config() {
    let cfg = config::load_from_str("version: 1\n").expect("must parse");
    assert_eq!(cfg.version, 1);
    assert_eq!(cfg.gateway.listen, "0.0.0.0:8080");
    assert_eq!(cfg.bridge.timeout(), Duration::from_secs(10));
    assert_eq!(cfg.bridge.termination, Termination::FirstReply);
    assert_eq!(cfg.bridge.response_encoding, BodyEncoding::Hex);
    assert!(cfg.bridge.strip_route_from);
    assert_eq!(cfg.discovery.formatted_host(), "127-0-0-1.microplatform.io");
}

#[test]
fn full_config() {
    let yaml = r#"
version: 1
gateway:
  listen: "127.0.0.1:9000"
  max_body_bytes: 4096
discovery:
  protocol: http
  ip_addr: "10.1.2.3"
  port: "80"
  host_suffix: "edge.test"
bridge:
  required_scheme: microservice
  timeout_ms: 2500
  termination: until_completed
  response_encoding: raw
  strip_route_from: false
  heartbeat_uri: "resource:///ping"
  error_uri: "resource:///edge/reply/error"
"#;
    let cfg = config::load_from_str(yaml).expect("must parse");
    assert_eq!(cfg.gateway.max_body_bytes, 4096);
    assert_eq!(cfg.bridge.termination, Termination::UntilCompleted);
    assert_eq!(cfg.bridge.response_encoding, BodyEncoding::Raw);
    assert_eq!(cfg.bridge.reserved_addresses().heartbeat, "resource:///ping");
    assert!(!cfg.bridge.ingress_policy().strip_route_from);
    assert_eq!(cfg.discovery.formatted_host(), "10-1-2-3.edge.test");
}

#[test]
fn rejects_unsupported_version() {
    let err = config::load_from_str("version: 2\n").expect_err("must fail");
    assert_eq!(err.client_code().as_str(), "UNSUPPORTED_VERSION");
}

#[test]
fn range_checks() {
    for bad in [
        "version: 1\nbridge:\n  timeout_ms: 0\n",
        "version: 1\nbridge:\n  timeout_ms: 600000\n",
        "version: 1\ngateway:\n  max_body_bytes: 0\n",
        "version: 1\ngateway:\n  listen: \"not-an-addr\"\n",
        "version: 1\ndiscovery:\n  port: \"http\"\n",
        "version: 1\ndiscovery:\n  protocol: ftp\n",
        "version: 1\nbridge:\n  required_scheme: \"microservice://\"\n",
        "version: 1\nbridge:\n  heartbeat_uri: \"heartbeat\"\n",
        "version: 1\nbridge:\n  termination: forever\n",
    ] {
        let err = config::load_from_str(bad).expect_err(bad);
        assert_eq!(err.client_code().as_str(), "BAD_REQUEST", "{bad}");
    }
}

#[test]
fn reserved_addresses_must_differ() {
    let yaml = r#"
version: 1
bridge:
  heartbeat_uri: "resource:///same"
  error_uri: "resource:///same"
"#;
    assert!(config::load_from_str(yaml).is_err());
}
