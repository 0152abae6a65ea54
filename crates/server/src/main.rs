mod api;
mod bootstrap;
mod health;
mod poller;

use std::time::Duration;

use anyhow::Result;
use dinebot_core::config::{AppConfig, LoadOptions};

fn init_logging(config: &AppConfig) {
    use dinebot_core::config::LogFormat::*;
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
    let config = AppConfig::load(LoadOptions::default())?;
    init_logging(&config);

    let app = bootstrap::bootstrap_with_config(config).await?;

    let poll_secs = app.config.server.worker_poll_secs;
    let poller = (poll_secs > 0)
        .then(|| poller::spawn(app.worker.clone(), Duration::from_secs(poll_secs)));

    let queue_name = app.config.queue.name.clone();
    let router = api::router(app.api.clone())
        .merge(health::router(health::HealthState::new(app.db_pool.clone(), &queue_name)));

    let address = format!("{}:{}", app.config.server.bind_address, app.config.server.port);
    let listener = tokio::net::TcpListener::bind(&address).await?;
    tracing::info!(
        event_name = "system.server.started",
        correlation_id = "bootstrap",
        bind_address = %address,
        worker_poll_secs = poll_secs,
        "dinebot-server listening"
    );

    axum::serve(listener, router).with_graceful_shutdown(wait_for_shutdown()).await?;

    tracing::info!(
        event_name = "system.server.stopping",
        correlation_id = "shutdown",
        "dinebot-server stopping"
    );
    if let Some(poller) = poller {
        poller.abort();
    }
    app.db_pool.close().await;

    Ok(())
}

async fn wait_for_shutdown() {
    if let Err(error) = tokio::signal::ctrl_c().await {
        tracing::error!(
            event_name = "system.server.signal_error",
            correlation_id = "shutdown",
            error = %error,
            "could not listen for shutdown signal"
        );
    }
}
