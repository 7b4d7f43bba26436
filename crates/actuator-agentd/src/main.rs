mod cli;
mod config;

use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tokio::net::TcpListener;
use tracing::info;

use actuator_core::{FanoutSink, SinkHandle};
use actuator_observe::{LoggerTimeZone, TracingSink, init_local_offset, init_logger};
use actuator_prometheus::PrometheusSink;

use crate::{cli::Cli, config::Config};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // 1) config
    let cfg = Config::load(&cli.config_file)
        .with_context(|| format!("loading {}", cli.config_file.display()))?;

    // 2) logger; the local offset must be read before any runtime thread exists
    if cfg.logger.tz == LoggerTimeZone::Local {
        init_local_offset();
    }
    init_logger(&cfg.logger)?;
    info!(config = %cli.config_file.display(), "logger initialized");

    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?
        .block_on(serve(cli, cfg))
}

async fn serve(cli: Cli, cfg: Config) -> anyhow::Result<()> {
    // 3) event sinks
    let metrics = PrometheusSink::new()?;
    let sink: SinkHandle = Arc::new(FanoutSink::new(vec![
        Arc::new(TracingSink) as SinkHandle,
        Arc::new(metrics.clone()) as SinkHandle,
    ]));

    // 4) handlers
    let router = cfg.build_api(sink)?.with_metrics(metrics).router();

    // 5) server
    let listener = TcpListener::bind(&cli.server_address)
        .await
        .with_context(|| format!("binding {}", cli.server_address))?;
    info!(address = %cli.server_address, "serving webhooks");

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("failed to listen for shutdown signal: {e}");
        std::future::pending::<()>().await;
    }
    info!("shutdown requested");
}
