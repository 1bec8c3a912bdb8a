//! Per-request snapshot consumed by the gating checks.

use axum::http::{HeaderMap, Method, Request};
use std::net::SocketAddr;

use crate::http::request::X_REQUEST_ID;

pub const HEADER_ACCESS_KEY: &str = "accesskey";
pub const HEADER_NONCE: &str = "nonce";
pub const HEADER_SIGN: &str = "sign";
pub const HEADER_INTERFACE_ID: &str = "interface_id";
pub const HEADER_USER_ID: &str = "user_id";

/// Local address of the connection, inserted by the server as a request extension.
#[derive(Debug, Clone, Copy)]
pub struct LocalAddr(pub SocketAddr);

/// Immutable view of one inbound request.
#[derive(Debug, Clone)]
pub struct RequestContext {
    pub request_id: String,
    pub source: SocketAddr,
    pub destination: Option<SocketAddr>,
    pub method: Method,
    pub query: Option<String>,
    pub headers: HeaderMap,
    pub access_key: Option<String>,
    pub nonce: Option<String>,
    pub sign: Option<String>,
    pub interface_id: Option<String>,
    pub user_id: Option<String>,
}

impl RequestContext {
    /// Snapshot `req`, which arrived from `source`.
    pub fn from_request<B>(req: &Request<B>, source: SocketAddr) -> Self {
        let headers = req.headers().clone();
        let request_id = header_value(&headers, X_REQUEST_ID.as_str())
            .unwrap_or_else(|| "unknown".to_string());

        Self {
            request_id,
            source,
            destination: req.extensions().get::<LocalAddr>().map(|a| a.0),
            method: req.method().clone(),
            query: req.uri().query().map(str::to_string),
            access_key: header_value(&headers, HEADER_ACCESS_KEY),
            nonce: header_value(&headers, HEADER_NONCE),
            sign: header_value(&headers, HEADER_SIGN),
            interface_id: header_value(&headers, HEADER_INTERFACE_ID),
            user_id: header_value(&headers, HEADER_USER_ID),
            headers,
        }
    }
}

/// First value of `name` as a string; non-UTF-8 values count as absent.
fn header_value(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
}
