//! Wire protocol spoken with the function invoker.
//!
//! # Data Flow
//! ```text
//! HTTP request
//!     → InputSignal::Start (negotiation)
//!     → InputSignal::Data  (request body + metadata)
//!     → [half-close]
//! invoker
//!     → OutputSignal::Data * n
//!     → [end of stream | status]
//! ```

pub mod client;
pub mod frame;

pub use client::RiffClient;
pub use frame::{
    input_signal, output_signal, InputFrame, InputSignal, OutputFrame, OutputSignal, StartFrame,
};
