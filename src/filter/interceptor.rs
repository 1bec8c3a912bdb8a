//! Streaming response interceptor.
//!
//! # Responsibilities
//! - Leave non-200 responses untouched
//! - Re-wrap 200 bodies with a per-chunk transform stage
//! - Record one usage event per chunk before forwarding it (best effort)
//! - Log each chunk as text without touching the bytes
//!
//! # Design Decisions
//! - Chunks are moved through, never copied or re-framed; the client sees the
//!   downstream bytes in the same order and with the same boundaries
//! - Usage recording failures, `false` answers and panics are logged, never propagated
//! - No task is spawned per chunk: dropping the body (client gone) cancels the
//!   in-flight usage call and stops any further ones

use axum::{
    body::{Body, Bytes},
    http::StatusCode,
    response::Response,
};
use futures_util::{FutureExt, StreamExt};
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use crate::filter::context::RequestContext;
use crate::observability::metrics;
use crate::remote::RemoteAuthority;

/// Response extension marking a body as one pre-built buffer rather than a stream.
///
/// Such bodies are forwarded as-is; there is no chunk sequence to observe.
/// Bodies cannot be told apart by type, so a downstream handler that returns a
/// whole payload must insert this marker itself. The upstream forwarder never
/// sets it: proxied bodies are always metered.
#[derive(Debug, Clone, Copy, Default)]
pub struct MaterializedBody;

/// Interface/user pair charged for each intercepted chunk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UsageEvent {
    pub interface_id: String,
    pub user_id: String,
}

impl UsageEvent {
    pub fn from_context(ctx: &RequestContext) -> Option<Self> {
        let interface_id = ctx.interface_id.as_deref().filter(|v| !v.trim().is_empty())?;
        let user_id = ctx.user_id.as_deref().filter(|v| !v.trim().is_empty())?;
        Some(Self {
            interface_id: interface_id.to_string(),
            user_id: user_id.to_string(),
        })
    }
}

/// Per-response state of the transform stage.
struct ChunkObserver {
    remote: Arc<dyn RemoteAuthority>,
    event: Option<UsageEvent>,
    request_id: String,
}

impl ChunkObserver {
    async fn observe(&self, chunk: Bytes) -> Bytes {
        self.record_usage().await;

        metrics::record_chunk(chunk.len());
        match std::str::from_utf8(&chunk) {
            Ok(text) => tracing::debug!(
                request_id = %self.request_id,
                bytes = chunk.len(),
                body = %text,
                "Response chunk"
            ),
            Err(_) => tracing::debug!(
                request_id = %self.request_id,
                bytes = chunk.len(),
                body = %String::from_utf8_lossy(&chunk),
                "Response chunk (not valid UTF-8)"
            ),
        }

        chunk
    }

    /// Best effort: the outcome only reaches logs and metrics.
    async fn record_usage(&self) {
        let Some(event) = &self.event else {
            return;
        };

        let call = AssertUnwindSafe(
            self.remote
                .record_usage(&event.interface_id, &event.user_id),
        )
        .catch_unwind();

        match call.await {
            Ok(Ok(true)) => metrics::record_usage("counted"),
            Ok(Ok(false)) => {
                tracing::warn!(
                    request_id = %self.request_id,
                    interface_id = %event.interface_id,
                    "Usage not counted by authority"
                );
                metrics::record_usage("rejected");
            }
            Ok(Err(e)) => {
                tracing::error!(
                    request_id = %self.request_id,
                    interface_id = %event.interface_id,
                    error = %e,
                    "Usage recording failed"
                );
                metrics::record_usage("error");
            }
            Err(_) => {
                tracing::error!(request_id = %self.request_id, "Usage recorder panicked");
                metrics::record_usage("panic");
            }
        }
    }
}

/// Wrap a downstream response so its body is metered as it streams.
pub fn intercept_response(
    response: Response,
    remote: Arc<dyn RemoteAuthority>,
    ctx: &RequestContext,
) -> Response {
    let status = response.status();
    if status != StatusCode::OK {
        return response;
    }

    if response.extensions().get::<MaterializedBody>().is_some() {
        tracing::error!(
            request_id = %ctx.request_id,
            status = %status,
            "Response body is not a stream, forwarding without interception"
        );
        return response;
    }

    let event = UsageEvent::from_context(ctx);
    if event.is_none() {
        tracing::warn!(
            request_id = %ctx.request_id,
            "Missing interface or user id, usage will not be recorded"
        );
    }

    let observer = Arc::new(ChunkObserver {
        remote,
        event,
        request_id: ctx.request_id.clone(),
    });

    let (parts, body) = response.into_parts();
    let stream = body.into_data_stream().then(move |frame| {
        let observer = Arc::clone(&observer);
        async move {
            match frame {
                Ok(chunk) => Ok(observer.observe(chunk).await),
                Err(e) => {
                    tracing::warn!(request_id = %observer.request_id, error = %e, "Downstream body error");
                    Err(e)
                }
            }
        }
    });

    Response::from_parts(parts, Body::from_stream(stream))
}
