//! [`Invoker`] backed by the invoker's gRPC `Invoke` call.
//!
//! tonic takes the outbound half of a bidi call as a stream, so input signals
//! are queued on a channel that feeds the call. The call itself is only
//! polled once the bridge starts receiving: by then the start and data frames
//! are queued and the send half is closed.

use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;
use tonic::transport::Channel;
use tonic::{Request, Response, Status, Streaming};

use crate::invoker::{InvocationStream, Invoker};
use crate::rpc::{InputSignal, OutputSignal, RiffClient};

/// Start and data frames must fit without the call being polled.
const OUTBOUND_CAPACITY: usize = 4;

type PendingCall =
    Pin<Box<dyn Future<Output = Result<Response<Streaming<OutputSignal>>, Status>> + Send>>;

/// Invoker reached over a shared tonic channel.
#[derive(Clone)]
pub struct GrpcInvoker {
    client: RiffClient,
    deadline: Option<Duration>,
}

impl GrpcInvoker {
    pub fn new(channel: Channel) -> Self {
        Self {
            client: RiffClient::new(channel),
            deadline: None,
        }
    }

    /// Propagate a deadline to every call as `grpc-timeout`.
    pub fn with_deadline(mut self, deadline: Duration) -> Self {
        self.deadline = Some(deadline);
        self
    }
}

#[async_trait]
impl Invoker for GrpcInvoker {
    async fn invoke(&self) -> Result<Box<dyn InvocationStream>, Status> {
        let (tx, rx) = mpsc::channel(OUTBOUND_CAPACITY);

        let mut request = Request::new(ReceiverStream::new(rx));
        if let Some(deadline) = self.deadline {
            request.set_timeout(deadline);
        }

        let mut client = self.client.clone();
        let call: PendingCall = Box::pin(async move { client.invoke(request).await });

        Ok(Box::new(GrpcInvocation {
            outbound: Some(tx),
            state: CallState::Pending(call),
        }))
    }
}

enum CallState {
    /// Response headers not yet received.
    Pending(PendingCall),
    Open(Streaming<OutputSignal>),
    Finished,
}

/// One in-flight `Invoke` call.
pub struct GrpcInvocation {
    outbound: Option<mpsc::Sender<InputSignal>>,
    state: CallState,
}

impl GrpcInvocation {
    /// Drive the call to its response headers, surfacing a failed call's status.
    async fn open(&mut self) -> Result<(), Status> {
        if let CallState::Pending(call) = &mut self.state {
            let result = call.as_mut().await;
            match result {
                Ok(response) => self.state = CallState::Open(response.into_inner()),
                Err(status) => {
                    self.state = CallState::Finished;
                    return Err(status);
                }
            }
        }
        Ok(())
    }
}

#[async_trait]
impl InvocationStream for GrpcInvocation {
    async fn send(&mut self, signal: InputSignal) -> Result<(), Status> {
        let Some(outbound) = self.outbound.as_ref() else {
            return Err(Status::failed_precondition("send after close_send"));
        };

        if outbound.send(signal).await.is_err() {
            // The call dropped its request stream, so it has terminated.
            self.outbound = None;
            self.open().await?;
            return Err(Status::aborted("invocation closed its input"));
        }
        Ok(())
    }

    async fn close_send(&mut self) -> Result<(), Status> {
        self.outbound = None;
        Ok(())
    }

    async fn recv(&mut self) -> Result<Option<OutputSignal>, Status> {
        self.open().await?;

        let CallState::Open(stream) = &mut self.state else {
            return Ok(None);
        };

        match stream.message().await {
            Ok(Some(signal)) => Ok(Some(signal)),
            Ok(None) => {
                self.state = CallState::Finished;
                Ok(None)
            }
            Err(status) => {
                self.state = CallState::Finished;
                Err(status)
            }
        }
    }
}
