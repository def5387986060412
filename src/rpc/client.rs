//! gRPC client for the invoker's `streaming.Riff` service.

use tonic::codegen::http::uri::PathAndQuery;
use tonic::transport::Channel;
use tonic::{GrpcMethod, IntoStreamingRequest, Response, Status, Streaming};

use crate::rpc::frame::{InputSignal, OutputSignal};

const SERVICE_NAME: &str = "streaming.Riff";
const INVOKE_METHOD: &str = "Invoke";
const INVOKE_PATH: &str = "/streaming.Riff/Invoke";

/// Thin client over a tonic channel. Cloning is cheap and shares the
/// underlying HTTP/2 connection.
#[derive(Clone)]
pub struct RiffClient {
    inner: tonic::client::Grpc<Channel>,
}

impl RiffClient {
    pub fn new(channel: Channel) -> Self {
        Self {
            inner: tonic::client::Grpc::new(channel),
        }
    }

    /// Open a bidirectional `Invoke` call.
    ///
    /// Input signals are pulled from the request stream as the call makes
    /// progress; the returned stream yields the invoker's output signals.
    pub async fn invoke(
        &mut self,
        request: impl IntoStreamingRequest<Message = InputSignal>,
    ) -> Result<Response<Streaming<OutputSignal>>, Status> {
        self.inner
            .ready()
            .await
            .map_err(|e| Status::unavailable(format!("invoker channel not ready: {e}")))?;

        let codec = tonic_prost::ProstCodec::default();
        let path = PathAndQuery::from_static(INVOKE_PATH);
        let mut request = request.into_streaming_request();
        request
            .extensions_mut()
            .insert(GrpcMethod::new(SERVICE_NAME, INVOKE_METHOD));

        self.inner.streaming(request, path, codec).await
    }
}
