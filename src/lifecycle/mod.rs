//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (startup.rs, process.rs):
//!     Load config → Launch invoker → Wait for invoker → Start listener
//!
//! Shutdown (shutdown.rs):
//!     Signal or invoker exit → Stop accepting → Drain requests → Stop invoker
//!
//! Signals (signals.rs):
//!     SIGTERM/SIGINT → Trigger graceful shutdown
//! ```

pub mod process;
pub mod shutdown;
pub mod signals;
pub mod startup;

pub use process::InvokerProcess;
pub use shutdown::{Shutdown, ShutdownReason};
