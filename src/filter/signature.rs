//! Request signature verification.

use crate::filter::context::RequestContext;
use crate::filter::decision::{Decision, DenyReason};
use crate::remote::RemoteAuthority;

/// Required length of an access key, in characters.
pub const ACCESS_KEY_LEN: usize = 32;

fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

/// Access key must be exactly 32 characters and not all whitespace.
pub fn is_valid_access_key(key: &str) -> bool {
    !is_blank(key) && key.chars().count() == ACCESS_KEY_LEN
}

/// Compare the presented `sign` header with the signature the authority derives.
///
/// Every failure mode maps to the same denial, so callers cannot tell a wrong
/// signature from an unreachable authority.
pub async fn verify_signature(remote: &dyn RemoteAuthority, ctx: &RequestContext) -> Decision {
    let deny = Decision::Deny(DenyReason::SignatureMismatch);

    let Some(sign) = ctx.sign.as_deref() else {
        tracing::debug!(request_id = %ctx.request_id, "No signature presented");
        return deny;
    };

    let (access_key, nonce) = match (ctx.access_key.as_deref(), ctx.nonce.as_deref()) {
        (Some(key), Some(nonce)) if is_valid_access_key(key) && !is_blank(nonce) => (key, nonce),
        _ => {
            tracing::debug!(request_id = %ctx.request_id, "Malformed access key or nonce");
            return deny;
        }
    };

    match remote.derive_signature(access_key, nonce).await {
        Ok(expected) if expected == sign => Decision::Allow,
        Ok(_) => {
            tracing::debug!(request_id = %ctx.request_id, "Signature mismatch");
            deny
        }
        Err(e) => {
            tracing::warn!(request_id = %ctx.request_id, error = %e, "Signature derivation failed");
            deny
        }
    }
}
