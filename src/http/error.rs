//! Request path errors and their HTTP rendering.
//!
//! Invoker failures arrive as a gRPC status. Content negotiation failures are
//! reported by the invoker as `InvalidArgument` with a message naming the
//! HTTP condition, so those two are classified by message text; everything
//! else maps by code.

use axum::body::Body;
use axum::http::{header, HeaderValue, Method, StatusCode};
use axum::response::{IntoResponse, Response};
use thiserror::Error;
use tonic::{Code, Status};

const NOT_ACCEPTABLE_MARKER: &str = "Not Acceptable";
const UNSUPPORTED_MEDIA_TYPE_MARKER: &str = "Unsupported Media Type";

/// Failure of one bridged request.
#[derive(Debug, Error)]
pub enum BridgeError {
    /// Anything but `POST /`. Never reaches the invoker.
    #[error("{method} {path} is not served")]
    NotImplemented { method: Method, path: String },

    /// The request body could not be read.
    #[error("failed to read request body: {0}")]
    Body(#[source] axum::Error),

    /// The request body outgrew the configured limit while being read.
    #[error("request body exceeds the configured limit")]
    PayloadTooLarge,

    /// The invoker failed to open, accept or answer the invocation.
    #[error("{}", .0.message())]
    Invoker(#[from] Status),
}

impl BridgeError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            BridgeError::NotImplemented { .. } => StatusCode::NOT_IMPLEMENTED,
            BridgeError::Body(_) => StatusCode::INTERNAL_SERVER_ERROR,
            BridgeError::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            BridgeError::Invoker(status) => classify(status),
        }
    }
}

impl IntoResponse for BridgeError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        match &self {
            BridgeError::NotImplemented { .. } => status.into_response(),
            BridgeError::Body(_) | BridgeError::PayloadTooLarge => {
                plain_text(status, format!("{self}\n"))
            }
            BridgeError::Invoker(invoker) => plain_text(status, format!("{}\n", invoker.message())),
        }
    }
}

/// HTTP status for an invoker failure.
pub fn classify(status: &Status) -> StatusCode {
    if status.code() == Code::InvalidArgument {
        if status.message().contains(NOT_ACCEPTABLE_MARKER) {
            return StatusCode::NOT_ACCEPTABLE;
        }
        if status.message().contains(UNSUPPORTED_MEDIA_TYPE_MARKER) {
            return StatusCode::UNSUPPORTED_MEDIA_TYPE;
        }
    }
    status_for_code(status.code())
}

fn status_for_code(code: Code) -> StatusCode {
    match code {
        Code::Cancelled => StatusCode::REQUEST_TIMEOUT,
        Code::InvalidArgument => StatusCode::BAD_REQUEST,
        Code::DeadlineExceeded => StatusCode::GATEWAY_TIMEOUT,
        Code::NotFound => StatusCode::NOT_FOUND,
        Code::AlreadyExists => StatusCode::CONFLICT,
        Code::PermissionDenied => StatusCode::FORBIDDEN,
        Code::ResourceExhausted => StatusCode::TOO_MANY_REQUESTS,
        Code::FailedPrecondition => StatusCode::BAD_REQUEST,
        Code::Aborted => StatusCode::CONFLICT,
        Code::OutOfRange => StatusCode::BAD_REQUEST,
        Code::Unimplemented => StatusCode::NOT_IMPLEMENTED,
        Code::Unavailable => StatusCode::SERVICE_UNAVAILABLE,
        Code::Unauthenticated => StatusCode::UNAUTHORIZED,
        // An `Ok` status only lands here if the invoker misreported a failure.
        Code::Ok | Code::Unknown | Code::Internal | Code::DataLoss => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

fn plain_text(status: StatusCode, body: String) -> Response {
    let mut response = Response::new(Body::from(body));
    *response.status_mut() = status;
    response
        .headers_mut()
        .insert(header::CONTENT_TYPE, HeaderValue::from_static("text/plain"));
    response
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn body_string(response: Response) -> String {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn test_not_acceptable() {
        let msg = "Invoker: Not Acceptable: unrecognized output #0's content-type text/zglorbf";
        let response = BridgeError::from(Status::invalid_argument(msg)).into_response();

        assert_eq!(response.status(), StatusCode::NOT_ACCEPTABLE);
        assert_eq!(response.headers()[header::CONTENT_TYPE], "text/plain");
        assert_eq!(body_string(response).await, format!("{msg}\n"));
    }

    #[tokio::test]
    async fn test_unsupported_media_type() {
        let msg = "Invoker: Unsupported Media Type: unsupported input #0's content-type text/zglorbf";
        let response = BridgeError::from(Status::invalid_argument(msg)).into_response();

        assert_eq!(response.status(), StatusCode::UNSUPPORTED_MEDIA_TYPE);
        assert_eq!(response.headers()[header::CONTENT_TYPE], "text/plain");
        assert_eq!(body_string(response).await, format!("{msg}\n"));
    }

    #[test]
    fn test_markers_only_classify_invalid_argument() {
        let status = Status::internal("Not Acceptable: but the invoker crashed");
        assert_eq!(classify(&status), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_code_mapping() {
        assert_eq!(classify(&Status::invalid_argument("bad")), StatusCode::BAD_REQUEST);
        assert_eq!(classify(&Status::unavailable("down")), StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(classify(&Status::deadline_exceeded("slow")), StatusCode::GATEWAY_TIMEOUT);
        assert_eq!(classify(&Status::unknown("?")), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(classify(&Status::internal("boom")), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_ok_code_is_never_success() {
        let status = Status::new(Code::Ok, "misreported");
        assert_eq!(classify(&status), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn test_payload_too_large_is_plain_text() {
        let response = BridgeError::PayloadTooLarge.into_response();

        assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
        assert_eq!(response.headers()[header::CONTENT_TYPE], "text/plain");
        assert_eq!(
            body_string(response).await,
            "request body exceeds the configured limit\n"
        );
    }

    #[tokio::test]
    async fn test_not_implemented_has_empty_body() {
        let err = BridgeError::NotImplemented {
            method: Method::GET,
            path: "/".into(),
        };
        let response = err.into_response();

        assert_eq!(response.status(), StatusCode::NOT_IMPLEMENTED);
        assert_eq!(body_string(response).await, "");
    }

    #[tokio::test]
    async fn test_generic_failure_is_plain_text() {
        let response = BridgeError::from(Status::unknown("function threw")).into_response();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(response.headers()[header::CONTENT_TYPE], "text/plain");
        assert_eq!(body_string(response).await, "function threw\n");
    }
}
