mod api;
mod bootstrap;
mod email;
mod exchange;
mod health;
mod pdf;

use anyhow::Result;
use ratecard_core::config::{AppConfig, LoadOptions};

fn init_logging(config: &AppConfig) {
    use ratecard_core::config::LogFormat::*;
    use tracing::Level;

    let log_level = config.logging.level.parse::<Level>().unwrap_or(Level::INFO);

    match config.logging.format {
        Compact => {
            tracing_subscriber::fmt().with_target(false).with_max_level(log_level).compact().init();
        }
        Pretty => {
            tracing_subscriber::fmt().with_target(false).with_max_level(log_level).pretty().init();
        }
        Json => {
            tracing_subscriber::fmt().with_target(false).with_max_level(log_level).json().init();
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    run().await
}

pub async fn run() -> Result<()> {
    // Load config and initialize logging before any other operations
    let config = AppConfig::load(LoadOptions::default())?;
    init_logging(&config);

    // Bootstrap using the same config we already loaded
    let app = bootstrap::bootstrap_with_config(config).await?;

    health::spawn(
        &app.config.server.bind_address,
        app.config.server.health_check_port,
        app.db_pool.clone(),
    )
    .await?;

    if app.config.exchange.enabled {
        tokio::spawn(exchange::run_refresh_loop(
            app.provider,
            app.state.cache.clone(),
            app.exchange_repository.clone(),
        ));
        tracing::info!(
            event_name = "system.server.exchange_refresh_started",
            correlation_id = "bootstrap",
            interval_secs = app.config.exchange.refresh_interval_secs,
            "exchange-rate refresh task started"
        );
    } else {
        tracing::info!(
            event_name = "system.server.exchange_refresh_disabled",
            correlation_id = "bootstrap",
            "exchange-rate refresh disabled, serving fallback rates"
        );
    }

    let address = format!("{}:{}", app.config.server.bind_address, app.config.server.port);
    let listener = tokio::net::TcpListener::bind(&address).await?;

    tracing::info!(
        event_name = "system.server.started",
        correlation_id = "bootstrap",
        bind_address = %address,
        "ratecard-server started"
    );

    axum::serve(listener, api::router(app.state))
        .with_graceful_shutdown(wait_for_shutdown())
        .await?;

    tracing::info!(
        event_name = "system.server.stopping",
        correlation_id = "shutdown",
        "ratecard-server stopping"
    );

    Ok(())
}

async fn wait_for_shutdown() {
    let _ = tokio::signal::ctrl_c().await;
}
