//! Response writing.
//!
//! # Responsibilities
//! - Copy the first output frame's content type and headers onto the response
//! - Accumulate output payloads into the response body
//!
//! # Design Decisions
//! - Headers are fixed once the first frame is written; later frames only
//!   contribute payload
//! - Headers the invoker sends that are not valid HTTP are dropped, not fatal

use axum::body::Body;
use axum::http::{header, HeaderName, HeaderValue, StatusCode};
use axum::response::Response;

use crate::rpc::{output_signal, OutputFrame, OutputSignal};

/// Builds the HTTP response from the invoker's output signals.
#[derive(Debug)]
pub struct ResponseWriter {
    response: Response<()>,
    head_written: bool,
    body: Vec<u8>,
}

impl ResponseWriter {
    pub fn new() -> Self {
        Self {
            response: Response::new(()),
            head_written: false,
            body: Vec::new(),
        }
    }

    pub fn write_signal(&mut self, signal: OutputSignal) {
        match signal.frame {
            Some(output_signal::Frame::Data(frame)) => self.write_frame(frame),
            None => tracing::debug!("Ignoring empty output signal"),
        }
    }

    pub fn write_frame(&mut self, frame: OutputFrame) {
        if !self.head_written {
            self.write_head(&frame);
        }
        self.body.extend_from_slice(&frame.payload);
    }

    fn write_head(&mut self, frame: &OutputFrame) {
        self.head_written = true;
        *self.response.status_mut() = StatusCode::OK;
        let headers = self.response.headers_mut();

        if !frame.content_type.is_empty() {
            match HeaderValue::from_str(&frame.content_type) {
                Ok(value) => {
                    headers.insert(header::CONTENT_TYPE, value);
                }
                Err(_) => tracing::warn!(
                    content_type = %frame.content_type,
                    "Dropping invalid output content type"
                ),
            }
        }

        for (name, value) in &frame.headers {
            match (
                HeaderName::from_bytes(name.as_bytes()),
                HeaderValue::from_str(value),
            ) {
                (Ok(name), Ok(value)) => {
                    headers.insert(name, value);
                }
                _ => tracing::warn!(header = %name, "Dropping invalid output header"),
            }
        }
    }

    /// Whether any output frame has been written.
    pub fn has_output(&self) -> bool {
        self.head_written
    }

    pub fn finish(self) -> Response {
        let (parts, ()) = self.response.into_parts();
        Response::from_parts(parts, Body::from(self.body))
    }
}

impl Default for ResponseWriter {
    fn default() -> Self {
        Self::new()
    }
}
