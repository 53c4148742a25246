//! # Roster Server
//!
//! Main entry point for the Roster application.

use roster_config::ObservabilityConfig;
use roster_server::{
    app::run,
    startup::{init_logging, print_banner},
};
use tracing::{error, info};

#[tokio::main]
async fn main() {
    let config = match roster_config::load_default() {
        Ok(config) => config,
        Err(e) => {
            init_logging(&ObservabilityConfig::default());
            error!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    init_logging(&config.observability);
    print_banner();

    info!("Starting Roster Server...");
    info!("Version: {}", env!("CARGO_PKG_VERSION"));

    if let Err(e) = run(config).await {
        error!("Application error: {}", e);
        std::process::exit(1);
    }
}
