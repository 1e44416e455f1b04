//! Streaming relay of backend responses.
//!
//! Used for file retrieval: the backend body is forwarded chunk by chunk
//! instead of being buffered, preserving status and headers. The circuit
//! gate and timeout classification have already run by the time a response
//! reaches this point.

use axum::{body::Body, http::header, response::Response};

/// Relay a backend response to the caller without buffering the body.
pub fn relay(upstream: reqwest::Response) -> Response {
    let status = upstream.status();
    let mut headers = upstream.headers().clone();
    // Hop-by-hop; hyper re-frames the relayed body itself.
    headers.remove(header::TRANSFER_ENCODING);

    let mut response = Response::new(Body::from_stream(upstream.bytes_stream()));
    *response.status_mut() = status;
    *response.headers_mut() = headers;
    response
}
