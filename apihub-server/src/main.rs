use anyhow::Context;
use apihub_core::{Config, Services, logging::init_server_tracing};
use tracing::{error, info, warn};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::load()?;
    init_server_tracing(&config.app)?;

    info!(
        name = config.app.name.as_str(),
        version = config.app.version.as_str(),
        environment = config.app.environment.as_str(),
        bind_address = config.app.bind_address().as_str(),
        "Starting apihub server"
    );

    if config.app.is_production() && config.app.api_key == "changeme" {
        warn!("Running in production with the default API key");
    }

    let services = Services::from_config(&config)?;
    let app = apihub_server::app(&config, services);

    let bind_address = config.app.bind_address();
    let listener = tokio::net::TcpListener::bind(&bind_address)
        .await
        .with_context(|| format!("Failed to bind {bind_address}"))?;

    axum::serve(listener, app)
        .with_graceful_shutdown(signal())
        .await
        .context("HTTP server failed")?;

    info!("Server stopped");
    Ok(())
}

async fn signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!(error = %e, "Failed to install Ctrl-C handler");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received, terminating...");
}
