//! Wire types and error definitions for the remote authority.

use serde::{Deserialize, Serialize};
use thiserror::Error;

// Re-export RemoteConfig from config module to avoid duplication
pub use crate::config::schema::RemoteConfig;

/// Errors that can occur while talking to the remote authority.
#[derive(Debug, Error)]
pub enum RemoteError {
    /// Connection or request failed before a response arrived.
    #[error("transport error: {0}")]
    Transport(String),

    /// The call did not complete within the configured deadline.
    #[error("remote call timed out after {0} ms")]
    Timeout(u64),

    /// The authority answered with a non-success status.
    #[error("remote authority returned status {0}")]
    Status(u16),

    /// The response body could not be decoded.
    #[error("invalid response body: {0}")]
    Decode(String),

    /// Invalid base URL or endpoint path.
    #[error("invalid endpoint: {0}")]
    Endpoint(String),
}

/// Result type for remote authority operations.
pub type RemoteResult<T> = Result<T, RemoteError>;

#[derive(Debug, Serialize, Deserialize)]
pub struct SignRequest {
    pub access_key: String,
    pub nonce: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SignResponse {
    pub sign: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct InterfaceCheckRequest {
    pub interface_id: String,
    pub method: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct InterfaceCheckResponse {
    pub authorized: bool,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UsageRequest {
    pub interface_id: String,
    pub user_id: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UsageResponse {
    pub counted: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = RemoteError::Timeout(250);
        assert_eq!(err.to_string(), "remote call timed out after 250 ms");

        let err = RemoteError::Status(503);
        assert!(err.to_string().contains("503"));
    }

    #[test]
    fn test_wire_field_names() {
        let body = serde_json::to_value(InterfaceCheckRequest {
            interface_id: "iface".into(),
            method: "GET".into(),
        })
        .unwrap();
        assert_eq!(body["interface_id"], "iface");
        assert_eq!(body["method"], "GET");

        let resp: UsageResponse = serde_json::from_str(r#"{"counted":true}"#).unwrap();
        assert!(resp.counted);
    }
}
