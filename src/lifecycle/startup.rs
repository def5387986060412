//! Startup orchestration.
//!
//! # Responsibilities
//! - Wait for the invoker to accept gRPC connections
//! - Build the shared invoker client
//!
//! # Design Decisions
//! - Fail fast: an invoker that never comes up is a startup error
//! - The connected channel is shared read-only by every request

use std::time::Duration;

use tokio::time::{sleep, Instant};
use tonic::transport::{Channel, Endpoint};

use crate::config::{AdapterConfig, BackendConfig};
use crate::error::{AdapterError, AdapterResult};
use crate::invoker::GrpcInvoker;

/// Delay between connection attempts while the invoker boots.
const READY_POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Connect to the invoker, retrying until `ready_timeout_secs` elapses.
pub async fn connect_backend(config: &BackendConfig) -> AdapterResult<Channel> {
    let endpoint = Endpoint::from_shared(config.endpoint_uri())
        .map_err(|source| AdapterError::Endpoint {
            address: config.address.clone(),
            source,
        })?
        .connect_timeout(Duration::from_secs(config.connect_timeout_secs));

    let ready_timeout = Duration::from_secs(config.ready_timeout_secs);
    let started = Instant::now();
    let mut attempts = 0u32;

    loop {
        attempts += 1;
        match endpoint.connect().await {
            Ok(channel) => {
                tracing::info!(
                    address = %config.address,
                    attempts,
                    "Connected to invoker"
                );
                return Ok(channel);
            }
            Err(e) => {
                if started.elapsed() >= ready_timeout {
                    tracing::error!(address = %config.address, error = %e, "Invoker not ready");
                    return Err(AdapterError::InvokerNotReady {
                        address: config.address.clone(),
                        waited: started.elapsed(),
                    });
                }
                tracing::debug!(address = %config.address, attempt = attempts, error = %e, "Invoker not ready yet");
                sleep(READY_POLL_INTERVAL).await;
            }
        }
    }
}

/// Connected invoker client carrying the request deadline.
pub async fn build_invoker(config: &AdapterConfig) -> AdapterResult<GrpcInvoker> {
    let channel = connect_backend(&config.backend).await?;
    Ok(GrpcInvoker::new(channel).with_deadline(Duration::from_secs(config.timeouts.request_secs)))
}
