//! Per-interface authorization check.

use crate::filter::context::RequestContext;
use crate::filter::decision::{Decision, DenyReason};
use crate::remote::RemoteAuthority;

/// Ask the authority whether the interface accepts this method. Fails closed.
pub async fn check_authorization(remote: &dyn RemoteAuthority, ctx: &RequestContext) -> Decision {
    let deny = Decision::Deny(DenyReason::InterfaceNotAuthorized);

    let interface_id = match ctx.interface_id.as_deref() {
        Some(id) if !id.trim().is_empty() => id,
        _ => {
            tracing::debug!(request_id = %ctx.request_id, "Missing interface id");
            return deny;
        }
    };

    match remote
        .check_interface_authorized(interface_id, ctx.method.as_str())
        .await
    {
        Ok(true) => Decision::Allow,
        Ok(false) => deny,
        Err(e) => {
            tracing::warn!(
                request_id = %ctx.request_id,
                interface_id = %interface_id,
                error = %e,
                "Interface authorization check failed"
            );
            deny
        }
    }
}
