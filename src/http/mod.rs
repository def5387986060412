//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! HTTP request
//!     → server.rs (Axum setup, middleware)
//!     → request.rs (guard, start + data frames)
//!     → bridge.rs (drive the invocation)
//!     → response.rs (output frames → HTTP response)
//!     → error.rs (invoker status → HTTP status + plain text)
//!     → Send to client
//! ```

pub mod bridge;
pub mod error;
pub mod request;
pub mod response;
pub mod server;

pub use bridge::bridge;
pub use error::BridgeError;
pub use server::HttpServer;
