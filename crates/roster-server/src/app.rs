//! Serving lifecycle: bind, connect, serve, release.

use crate::{
    di::build_app_module,
    startup::{print_startup_info, shutdown_signal},
};
use roster_config::AppConfig;
use roster_core::{RosterError, RosterResult};
use roster_rest::create_router;
use tokio::net::TcpListener;
use tracing::info;

/// Runs the server until a shutdown signal arrives.
///
/// The listener is bound before any backend is contacted, so a taken port
/// fails fast with nothing to clean up. Backends are released whether
/// serving ends normally or with an error.
pub async fn run(config: AppConfig) -> RosterResult<()> {
    let addr = config.server.addr();
    let listener = TcpListener::bind(&addr)
        .await
        .map_err(|e| RosterError::internal(format!("Failed to bind {}: {}", addr, e)))?;

    let module = build_app_module(&config).await?;
    let router = create_router(module.app_state(), &config.server);

    print_startup_info(&config);

    let served = axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| RosterError::internal(format!("REST server error: {}", e)));

    module.shutdown().await;
    info!("Server shutdown complete");
    served
}
