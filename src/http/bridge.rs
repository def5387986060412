//! Drives one invocation per HTTP request.
//!
//! ```text
//! translate → invoke → send Start → send Data → close_send → recv* → response
//! ```
//!
//! The invocation stream is owned by this future, so every exit path
//! (including the client going away) releases it.

use axum::body::Body;
use axum::http::Request;
use axum::response::Response;

use crate::http::error::BridgeError;
use crate::http::request;
use crate::http::response::ResponseWriter;
use crate::invoker::Invoker;

/// Bridge `request` through one invocation on `invoker`.
pub async fn bridge(invoker: &dyn Invoker, request: Request<Body>) -> Result<Response, BridgeError> {
    let invocation = request::translate(request).await?;

    let mut stream = invoker.invoke().await?;
    for signal in invocation.into_signals() {
        stream.send(signal).await?;
    }
    stream.close_send().await?;

    let mut writer = ResponseWriter::new();
    while let Some(signal) = stream.recv().await? {
        writer.write_signal(signal);
    }

    if !writer.has_output() {
        tracing::debug!("Invocation completed without output");
    }
    Ok(writer.finish())
}
