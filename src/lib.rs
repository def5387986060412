//! Streaming HTTP adapter library.
//!
//! Serves `POST /` and bridges each request through one bidirectional
//! `Invoke` call on a streaming function invoker.

pub mod cli;
pub mod config;
pub mod error;
pub mod http;
pub mod invoker;
pub mod lifecycle;
pub mod observability;
pub mod rpc;

pub use config::AdapterConfig;
pub use error::AdapterError;
pub use http::HttpServer;
pub use invoker::{InvocationStream, Invoker};
pub use lifecycle::Shutdown;
