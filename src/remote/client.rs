//! Remote authority client.
//!
//! # Responsibilities
//! - Derive the expected request signature for an access key and nonce
//! - Ask whether an interface accepts a given HTTP method
//! - Record one usage event for an interface/user pair
//!
//! The client holds no per-request state; one instance is shared by every
//! request through an `Arc<dyn RemoteAuthority>`.

use async_trait::async_trait;
use serde::{de::DeserializeOwned, Serialize};
use std::time::{Duration, Instant};
use tokio::time::timeout;
use url::Url;

use crate::observability::metrics;
use crate::remote::types::{
    InterfaceCheckRequest, InterfaceCheckResponse, RemoteConfig, RemoteError, RemoteResult,
    SignRequest, SignResponse, UsageRequest, UsageResponse,
};

/// Operations the gateway consumes from the remote authority.
///
/// Implementations must be safe to call concurrently from many requests.
#[async_trait]
pub trait RemoteAuthority: Send + Sync {
    /// Signature the authority expects for `(access_key, nonce)`.
    async fn derive_signature(&self, access_key: &str, nonce: &str) -> RemoteResult<String>;

    /// Whether `interface_id` may be called with `method`.
    async fn check_interface_authorized(
        &self,
        interface_id: &str,
        method: &str,
    ) -> RemoteResult<bool>;

    /// Count one invocation of `interface_id` by `user_id`.
    async fn record_usage(&self, interface_id: &str, user_id: &str) -> RemoteResult<bool>;
}

/// JSON-over-HTTP implementation of [`RemoteAuthority`].
#[derive(Clone)]
pub struct HttpRemoteAuthority {
    http: reqwest::Client,
    base_url: Url,
    timeout_duration: Duration,
}

impl HttpRemoteAuthority {
    /// Create a new client from configuration.
    pub fn new(config: &RemoteConfig) -> RemoteResult<Self> {
        let mut base_url: Url = config.base_url.parse().map_err(|e| {
            RemoteError::Endpoint(format!("invalid base URL '{}': {}", config.base_url, e))
        })?;
        // Url::join drops the last segment unless the path ends with '/'
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        // The authority sits next to the gateway; never route it through an HTTP proxy
        let http = reqwest::Client::builder()
            .no_proxy()
            .build()
            .map_err(|e| RemoteError::Transport(e.to_string()))?;

        tracing::info!(base_url = %base_url, timeout_ms = config.timeout_ms, "Remote authority client initialized");

        Ok(Self {
            http,
            base_url,
            timeout_duration: Duration::from_millis(config.timeout_ms),
        })
    }

    async fn post<B, R>(&self, op: &'static str, path: &str, body: &B) -> RemoteResult<R>
    where
        B: Serialize + Sync,
        R: DeserializeOwned,
    {
        let url = self
            .base_url
            .join(path)
            .map_err(|e| RemoteError::Endpoint(e.to_string()))?;

        let start = Instant::now();
        let call = async {
            let response = self
                .http
                .post(url)
                .json(body)
                .send()
                .await
                .map_err(|e| RemoteError::Transport(e.to_string()))?;

            let status = response.status();
            if !status.is_success() {
                return Err(RemoteError::Status(status.as_u16()));
            }

            response
                .json::<R>()
                .await
                .map_err(|e| RemoteError::Decode(e.to_string()))
        };

        let result = match timeout(self.timeout_duration, call).await {
            Ok(result) => result,
            Err(_) => Err(RemoteError::Timeout(self.timeout_duration.as_millis() as u64)),
        };
        metrics::record_remote_call(op, result.is_ok(), start);
        result
    }
}

#[async_trait]
impl RemoteAuthority for HttpRemoteAuthority {
    async fn derive_signature(&self, access_key: &str, nonce: &str) -> RemoteResult<String> {
        let body = SignRequest {
            access_key: access_key.to_string(),
            nonce: nonce.to_string(),
        };
        let resp: SignResponse = self.post("derive_signature", "sign", &body).await?;
        Ok(resp.sign)
    }

    async fn check_interface_authorized(
        &self,
        interface_id: &str,
        method: &str,
    ) -> RemoteResult<bool> {
        let body = InterfaceCheckRequest {
            interface_id: interface_id.to_string(),
            method: method.to_string(),
        };
        let resp: InterfaceCheckResponse = self
            .post("check_interface", "interfaces/check", &body)
            .await?;
        Ok(resp.authorized)
    }

    async fn record_usage(&self, interface_id: &str, user_id: &str) -> RemoteResult<bool> {
        let body = UsageRequest {
            interface_id: interface_id.to_string(),
            user_id: user_id.to_string(),
        };
        let resp: UsageResponse = self.post("record_usage", "usage/count", &body).await?;
        Ok(resp.counted)
    }
}
