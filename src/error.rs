//! Startup and lifecycle errors.
//!
//! Failures of individual requests are [`crate::http::BridgeError`]; these
//! are the ones that stop the adapter.

use std::time::Duration;

use thiserror::Error;

use crate::config::ConfigError;

#[derive(Debug, Error)]
pub enum AdapterError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("invalid invoker endpoint '{address}': {source}")]
    Endpoint {
        address: String,
        #[source]
        source: tonic::transport::Error,
    },

    #[error("invoker at {address} not ready after {waited:?}")]
    InvokerNotReady { address: String, waited: Duration },

    #[error("failed to launch invoker '{program}': {source}")]
    Launch {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invoker command is empty")]
    EmptyCommand,

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type AdapterResult<T> = Result<T, AdapterError>;
