//! Backend invocation capability.
//!
//! The HTTP bridge only talks to the invoker through these two traits, so it
//! can be driven by the gRPC implementation in [`grpc`] or by a test double.
//!
//! Failures are reported as a [`tonic::Status`]: a code plus a message, at the
//! point of the failing call. A clean end of stream is `Ok(None)` from
//! [`InvocationStream::recv`], never an error.

pub mod grpc;

use async_trait::async_trait;
use tonic::Status;

use crate::rpc::{InputSignal, OutputSignal};

pub use grpc::GrpcInvoker;

/// Opens invocation streams against the function invoker.
///
/// Implementations are shared read-only across all requests.
#[async_trait]
pub trait Invoker: Send + Sync {
    /// Open one bidirectional invocation.
    async fn invoke(&self) -> Result<Box<dyn InvocationStream>, Status>;
}

/// A single open invocation.
///
/// Dropping the stream releases it; an unfinished call is cancelled.
#[async_trait]
pub trait InvocationStream: Send {
    /// Queue one input signal.
    async fn send(&mut self, signal: InputSignal) -> Result<(), Status>;

    /// Signal that no further input will be sent.
    async fn close_send(&mut self) -> Result<(), Status>;

    /// Next output signal, or `None` once the invoker closed the stream.
    async fn recv(&mut self) -> Result<Option<OutputSignal>, Status>;
}
