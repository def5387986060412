//! Request translation.
//!
//! # Responsibilities
//! - Reject anything but `POST /` before the invoker is contacted
//! - Derive the start frame from `Accept`
//! - Drain the body into a single data frame
//! - Project the remaining headers with canonical casing
//!
//! # Design Decisions
//! - The whole body is buffered; the invoker receives exactly one data frame
//! - Repeated headers collapse to their last value

use std::collections::HashMap;
use std::error::Error as StdError;

use axum::body::Body;
use axum::http::{header, HeaderMap, Method, Request, Uri};
use http_body_util::LengthLimitError;

use crate::http::error::BridgeError;
use crate::rpc::{InputFrame, InputSignal, StartFrame};

/// Content type requested from the invoker when the client sent no `Accept`.
pub const ANY_CONTENT_TYPE: &str = "*/*";

/// The frames one HTTP request translates to, in send order.
#[derive(Debug, Clone, PartialEq)]
pub struct Invocation {
    pub start: StartFrame,
    pub data: InputFrame,
}

impl Invocation {
    /// Signals in the order they must reach the invoker.
    pub fn into_signals(self) -> [InputSignal; 2] {
        [InputSignal::start(self.start), InputSignal::data(self.data)]
    }
}

/// Translate an HTTP request into the frames of one invocation.
pub async fn translate(request: Request<Body>) -> Result<Invocation, BridgeError> {
    check_route(request.method(), request.uri())?;

    let (parts, body) = request.into_parts();
    let payload = axum::body::to_bytes(body, usize::MAX)
        .await
        .map_err(body_error)?;

    Ok(Invocation {
        start: start_frame(&parts.headers),
        data: InputFrame {
            payload: payload.to_vec(),
            content_type: header_str(&parts.headers, &header::CONTENT_TYPE).unwrap_or_default(),
            headers: project_headers(&parts.headers),
            arg_index: 0,
        },
    })
}

/// Bodies without a `Content-Length` only hit the size limit while streaming,
/// so the limit shows up here as a read error.
fn body_error(err: axum::Error) -> BridgeError {
    if exceeds_limit(&err) {
        return BridgeError::PayloadTooLarge;
    }
    BridgeError::Body(err)
}

fn exceeds_limit(err: &(dyn StdError + 'static)) -> bool {
    let mut source = Some(err);
    while let Some(err) = source {
        if err.is::<LengthLimitError>() {
            return true;
        }
        source = err.source();
    }
    false
}

/// Only `POST /` is served.
pub fn check_route(method: &Method, uri: &Uri) -> Result<(), BridgeError> {
    if *method == Method::POST && uri.path() == "/" {
        return Ok(());
    }
    Err(BridgeError::NotImplemented {
        method: method.clone(),
        path: uri.path().to_string(),
    })
}

/// Start frame carrying the client's `Accept` value verbatim.
pub fn start_frame(headers: &HeaderMap) -> StartFrame {
    let accept = header_str(headers, &header::ACCEPT)
        .filter(|accept| !accept.is_empty())
        .unwrap_or_else(|| ANY_CONTENT_TYPE.to_string());
    StartFrame::new(vec![accept])
}

/// Every header but `Content-Type` and `Accept`, keyed by canonical name.
pub fn project_headers(headers: &HeaderMap) -> HashMap<String, String> {
    let mut projected = HashMap::new();
    for (name, value) in headers {
        if *name == header::CONTENT_TYPE || *name == header::ACCEPT {
            continue;
        }
        projected.insert(
            canonical_header_name(name.as_str()),
            String::from_utf8_lossy(value.as_bytes()).into_owned(),
        );
    }
    projected
}

/// MIME-style header casing: `x-custom-header` → `X-Custom-Header`.
pub fn canonical_header_name(name: &str) -> String {
    let mut canonical = String::with_capacity(name.len());
    let mut upper = true;
    for c in name.chars() {
        if upper {
            canonical.push(c.to_ascii_uppercase());
        } else {
            canonical.push(c.to_ascii_lowercase());
        }
        upper = c == '-';
    }
    canonical
}

fn header_str(headers: &HeaderMap, name: &header::HeaderName) -> Option<String> {
    headers
        .get(name)
        .map(|value| String::from_utf8_lossy(value.as_bytes()).into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::Limited;

    fn post(uri: &str) -> axum::http::request::Builder {
        Request::builder().method(Method::POST).uri(uri)
    }

    #[test]
    fn test_canonical_header_name() {
        assert_eq!(canonical_header_name("x-custom-header"), "X-Custom-Header");
        assert_eq!(canonical_header_name("user-agent"), "User-Agent");
        assert_eq!(canonical_header_name("X-REQUEST-ID"), "X-Request-Id");
        assert_eq!(canonical_header_name("host"), "Host");
        assert_eq!(canonical_header_name("a--b"), "A--B");
    }

    #[test]
    fn test_check_route_accepts_only_post_root() {
        assert!(check_route(&Method::POST, &"/".parse().unwrap()).is_ok());
        assert!(check_route(&Method::POST, &"/?q=1".parse().unwrap()).is_ok());
        assert!(check_route(&Method::GET, &"/".parse().unwrap()).is_err());
        assert!(check_route(&Method::PUT, &"/".parse().unwrap()).is_err());
        assert!(check_route(&Method::POST, &"/nope/".parse().unwrap()).is_err());
        assert!(check_route(&Method::POST, &"/nope".parse().unwrap()).is_err());
    }

    #[test]
    fn test_start_frame_propagates_accept() {
        let mut headers = HeaderMap::new();
        headers.insert(header::ACCEPT, "text/plain".parse().unwrap());
        let start = start_frame(&headers);
        assert_eq!(start.expected_content_types, vec!["text/plain"]);
        assert_eq!(start.input_names, vec!["in"]);
        assert_eq!(start.output_names, vec!["out"]);
    }

    #[test]
    fn test_start_frame_defaults_to_any() {
        let start = start_frame(&HeaderMap::new());
        assert_eq!(start.expected_content_types, vec![ANY_CONTENT_TYPE]);
    }

    #[test]
    fn test_project_headers_skips_negotiation_headers() {
        let mut headers = HeaderMap::new();
        headers.insert(header::CONTENT_TYPE, "text/plain".parse().unwrap());
        headers.insert(header::ACCEPT, "application/json".parse().unwrap());
        headers.insert("x-custom-header", "header-value".parse().unwrap());
        headers.append("x-repeated", "first".parse().unwrap());
        headers.append("x-repeated", "second".parse().unwrap());

        let projected = project_headers(&headers);
        assert_eq!(projected.len(), 2);
        assert_eq!(projected["X-Custom-Header"], "header-value");
        assert_eq!(projected["X-Repeated"], "second");
    }

    #[tokio::test]
    async fn test_translate_builds_data_frame() {
        let request = post("/")
            .header("content-type", "text/plain")
            .header("x-custom-header", "header-value")
            .body(Body::from("some body"))
            .unwrap();

        let invocation = translate(request).await.unwrap();
        assert_eq!(invocation.data.payload, b"some body");
        assert_eq!(invocation.data.content_type, "text/plain");
        assert_eq!(invocation.data.headers["X-Custom-Header"], "header-value");
        assert_eq!(invocation.data.arg_index, 0);
    }

    #[tokio::test]
    async fn test_translate_without_content_type() {
        let request = post("/").body(Body::empty()).unwrap();
        let invocation = translate(request).await.unwrap();
        assert!(invocation.data.payload.is_empty());
        assert_eq!(invocation.data.content_type, "");
        assert!(invocation.data.headers.is_empty());
    }

    #[tokio::test]
    async fn test_translate_rejects_other_paths() {
        let request = post("/nope/").body(Body::from("ignored")).unwrap();
        let err = translate(request).await.unwrap_err();
        assert!(matches!(err, BridgeError::NotImplemented { .. }));
    }

    #[tokio::test]
    async fn test_translate_streamed_body_over_limit() {
        let chunks: Vec<Result<&'static str, std::io::Error>> =
            vec![Ok("this body arrives in "), Ok("two chunks of data")];
        let limited = Limited::new(Body::from_stream(tokio_stream::iter(chunks)), 16);
        let request = post("/").body(Body::new(limited)).unwrap();

        let err = translate(request).await.unwrap_err();
        assert!(matches!(err, BridgeError::PayloadTooLarge));
    }

    #[test]
    fn test_signals_are_start_then_data() {
        let invocation = Invocation {
            start: StartFrame::new(vec![ANY_CONTENT_TYPE.into()]),
            data: InputFrame::default(),
        };
        let [first, second] = invocation.into_signals();
        assert!(first.as_start().is_some());
        assert!(second.as_data().is_some());
    }
}
