//! Shared application state for the plexgate gateway.
//!
//! Everything a handler touches is an explicit field here: config, the bridge
//! (which owns the injected substrate handle), and metrics. Nothing is
//! mutated after startup except atomics.

use std::sync::Arc;

use crate::bridge::Bridge;
use crate::config::GatewayConfig;
use crate::obs::metrics::GatewayMetrics;
use crate::substrate::Substrate;

#[derive(Clone)]
pub struct AppState {
    cfg: Arc<GatewayConfig>,
    bridge: Arc<Bridge>,
    metrics: Arc<GatewayMetrics>,
}

impl AppState {
    /// Build application state around an already-validated config.
    pub fn new(cfg: GatewayConfig, substrate: Arc<dyn Substrate>) -> Self {
        let metrics = Arc::new(GatewayMetrics::default());
        let bridge = Arc::new(Bridge::new(&cfg.bridge, substrate, Arc::clone(&metrics)));

        tracing::info!(
            scheme = %cfg.bridge.required_scheme,
            timeout_ms = cfg.bridge.timeout_ms,
            termination = ?cfg.bridge.termination,
            encoding = ?cfg.bridge.response_encoding,
            "bridge configured"
        );

        Self {
            cfg: Arc::new(cfg),
            bridge,
            metrics,
        }
    }

    pub fn cfg(&self) -> &GatewayConfig {
        &self.cfg
    }

    pub fn bridge(&self) -> Arc<Bridge> {
        Arc::clone(&self.bridge)
    }

    pub fn metrics(&self) -> Arc<GatewayMetrics> {
        Arc::clone(&self.metrics)
    }

    pub fn is_draining(&self) -> bool {
        self.metrics.is_draining()
    }

    pub fn set_draining(&self) {
        self.metrics.set_draining();
    }
}
