//! Gateway filter middleware.
//!
//! Sequence per request:
//! ```text
//! access gate → signature verifier → authorization checker
//!     → next handler → streaming response interceptor (status 200 only)
//! ```
//! The first failing check short-circuits to an empty 403.

use axum::{
    body::Body,
    extract::{ConnectInfo, State},
    http::{Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use std::net::SocketAddr;
use std::sync::Arc;

use crate::filter::access::{check_origin, AllowList};
use crate::filter::authorization::check_authorization;
use crate::filter::context::RequestContext;
use crate::filter::decision::{Decision, DenyReason};
use crate::filter::interceptor::intercept_response;
use crate::filter::signature::verify_signature;
use crate::observability::metrics;
use crate::remote::RemoteAuthority;

/// Gating checks plus the shared collaborators they need.
#[derive(Clone)]
pub struct GatewayFilter {
    allow_list: Arc<AllowList>,
    remote: Arc<dyn RemoteAuthority>,
}

impl GatewayFilter {
    pub fn new(allow_list: AllowList, remote: Arc<dyn RemoteAuthority>) -> Self {
        Self {
            allow_list: Arc::new(allow_list),
            remote,
        }
    }

    /// Run the three checks in order. Holds no state between calls.
    pub async fn evaluate(&self, ctx: &RequestContext) -> Decision {
        let decision = check_origin(&self.allow_list, &ctx.source);
        if !decision.is_allow() {
            return decision;
        }

        let decision = verify_signature(self.remote.as_ref(), ctx).await;
        if !decision.is_allow() {
            return decision;
        }

        check_authorization(self.remote.as_ref(), ctx).await
    }

    /// Gate `req`, delegate to `next` when allowed, and meter the response.
    pub async fn handle(&self, ctx: RequestContext, req: Request<Body>, next: Next) -> Response {
        match self.evaluate(&ctx).await {
            Decision::Allow => {
                metrics::record_decision("allow", "none");
                let response = next.run(req).await;
                intercept_response(response, Arc::clone(&self.remote), &ctx)
            }
            Decision::Deny(reason) => {
                log_denial(&ctx, reason);
                metrics::record_decision("deny", reason.stage());
                forbidden()
            }
        }
    }
}

fn log_denial(ctx: &RequestContext, reason: DenyReason) {
    tracing::info!(
        request_id = %ctx.request_id,
        source = %ctx.source,
        stage = reason.stage(),
        reason = %reason,
        "Request denied"
    );
}

/// Uniform denial: no body, no hint about which check failed.
fn forbidden() -> Response {
    StatusCode::FORBIDDEN.into_response()
}

/// Axum middleware entry point.
pub async fn gateway_filter(
    State(filter): State<GatewayFilter>,
    ConnectInfo(source): ConnectInfo<SocketAddr>,
    req: Request<Body>,
    next: Next,
) -> Response {
    let ctx = RequestContext::from_request(&req, source);

    tracing::info!(
        request_id = %ctx.request_id,
        method = %ctx.method,
        source = %ctx.source,
        destination = ?ctx.destination,
        query = ?ctx.query,
        "Inbound request"
    );
    tracing::debug!(request_id = %ctx.request_id, headers = ?ctx.headers, "Request headers");

    filter.handle(ctx, req, next).await
}
