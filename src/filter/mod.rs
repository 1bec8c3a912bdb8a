//! Gateway filter subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming request (source addr, method, headers)
//!     → context.rs (immutable RequestContext snapshot)
//!     → access.rs (source IP in allow-list?)
//!     → signature.rs (sign == authority-derived signature?)
//!     → authorization.rs (interface accepts method?)
//!     → orchestrator.rs (403 on first failure, else delegate)
//!     → interceptor.rs (meter 200 bodies chunk by chunk)
//! ```
//!
//! # Design Decisions
//! - Fail closed: any gating error is a denial
//! - Fail open on the usage path: accounting never costs the client a response
//! - All denials look the same on the wire (empty 403)

pub mod access;
pub mod authorization;
pub mod context;
pub mod decision;
pub mod interceptor;
pub mod orchestrator;
pub mod signature;

#[cfg(test)]
pub(crate) mod testing;

pub use access::AllowList;
pub use context::{LocalAddr, RequestContext};
pub use decision::{Decision, DenyReason};
pub use interceptor::{intercept_response, MaterializedBody, UsageEvent};
pub use orchestrator::{gateway_filter, GatewayFilter};
