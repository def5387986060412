//! Streaming HTTP adapter.
//!
//! Fronts a streaming function invoker with a plain HTTP endpoint.
//!
//! # Architecture Overview
//!
//! ```text
//!     Client Request        ┌──────────────────────────────────────────┐
//!     ──────────────────────┼─▶ http server ─▶ request ─▶ bridge ───────┼──▶ InputSignal*
//!                           │                              │           │        │
//!     Client Response       │                              ▼           │        ▼
//!     ◀─────────────────────┼── error / response ◀──── recv loop ◀─────┼── OutputSignal*
//!                           │                                          │   (invoker,
//!                           │  config · cli · logging · metrics        │    gRPC bidi)
//!                           │  lifecycle: invoker process, shutdown    │
//!                           └──────────────────────────────────────────┘
//! ```

use std::sync::Arc;

use clap::Parser;
use tokio::net::TcpListener;

use streaming_http_adapter::cli::Cli;
use streaming_http_adapter::http::HttpServer;
use streaming_http_adapter::lifecycle::{
    process, signals, startup, InvokerProcess, Shutdown, ShutdownReason,
};
use streaming_http_adapter::observability::{logging, metrics};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = cli.load_config()?;

    logging::init(&config.observability.log_level);

    tracing::info!("streaming-http-adapter v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        bind_address = %config.listener.bind_address,
        backend = %config.backend.address,
        request_timeout_secs = config.timeouts.request_secs,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => {
                if let Err(e) = metrics::init_metrics(addr) {
                    tracing::error!(error = %e, "Failed to start metrics endpoint");
                }
            }
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let mut invoker_process = if config.invoker.command.is_empty() {
        None
    } else {
        Some(InvokerProcess::spawn(&config.invoker.command)?)
    };

    let invoker = startup::build_invoker(&config).await?;

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let shutdown = Shutdown::new();
    let server = HttpServer::new(config, Arc::new(invoker));
    let mut server_task = tokio::spawn(server.run(listener, shutdown.subscribe()));

    tokio::select! {
        _ = signals::termination() => shutdown.trigger(ShutdownReason::Signal),
        status = process::exited(invoker_process.as_mut()) => {
            match status {
                Ok(status) => tracing::warn!(%status, "Invoker process exited"),
                Err(e) => tracing::error!(error = %e, "Lost track of invoker process"),
            }
            shutdown.trigger(ShutdownReason::InvokerExited);
        }
        result = &mut server_task => {
            result??;
            tracing::warn!("HTTP server stopped unexpectedly");
        }
    }

    if !server_task.is_finished() {
        server_task.await??;
    }

    if let Some(process) = invoker_process {
        process.stop().await?;
    }

    tracing::info!("Shutdown complete");
    Ok(())
}
