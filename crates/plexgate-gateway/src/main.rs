//! plexgate gateway
//!
//! - `POST /`: hex-encoded platform envelope bridged to a microservice
//! - `GET /server`: discovery (JSON / JSONP)
//! - `/healthz`, `/readyz`, `/metrics`
//!
//! Config path: first CLI argument, else `plexgate.yaml`.

use std::net::SocketAddr;
use std::sync::Arc;

use tracing_subscriber::{fmt, EnvFilter};

use plexgate_core::error::PlexError;
use plexgate_gateway::{app_state, config, router, services, substrate};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();

    let path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "plexgate.yaml".to_string());
    let cfg = config::load_from_file(&path)?;
    let listen: SocketAddr = cfg
        .gateway
        .listen
        .parse()
        .map_err(|e| PlexError::BadRequest(format!("gateway.listen: {e}")))?;

    let local = substrate::LocalSubstrate::new(cfg.bridge.timeout());
    local.register(Arc::new(services::EchoService::new()));
    tracing::info!(services = ?local.registered(), "local substrate ready");

    let state = app_state::AppState::new(cfg, Arc::new(local));
    let app = router::build_router(state.clone());

    tracing::info!(%listen, "plexgate-gateway starting");
    let listener = tokio::net::TcpListener::bind(listen).await?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(state))
        .await?;

    tracing::info!("shutdown complete");
    Ok(())
}

async fn shutdown_signal(state: app_state::AppState) {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    state.set_draining();
    tracing::info!("signal received, draining");
}
