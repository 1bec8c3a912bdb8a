//! Gating outcome types.

use std::fmt;

/// Why a request was denied. Only logged and counted; clients always see a bare 403.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DenyReason {
    UntrustedOrigin,
    SignatureMismatch,
    InterfaceNotAuthorized,
}

impl DenyReason {
    /// Stage label used in logs and metrics.
    pub fn stage(&self) -> &'static str {
        match self {
            DenyReason::UntrustedOrigin => "access",
            DenyReason::SignatureMismatch => "signature",
            DenyReason::InterfaceNotAuthorized => "authorization",
        }
    }
}

impl fmt::Display for DenyReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DenyReason::UntrustedOrigin => write!(f, "origin not in allow-list"),
            DenyReason::SignatureMismatch => write!(f, "signature verification failed"),
            DenyReason::InterfaceNotAuthorized => write!(f, "interface not authorized for method"),
        }
    }
}

/// Result of a single check or of the whole gating sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Allow,
    Deny(DenyReason),
}

impl Decision {
    pub fn is_allow(&self) -> bool {
        matches!(self, Decision::Allow)
    }
}
