//! Remote authority subsystem.
//!
//! # Data Flow
//! ```text
//! Gating checks / response interceptor
//!     → client.rs (RemoteAuthority trait, HTTP transport with timeouts)
//!     → remote authority service (signature, interface policy, usage accounting)
//! ```
//!
//! # Design Decisions
//! - The authority is injected as `Arc<dyn RemoteAuthority>`, never looked up globally
//! - Every call has a deadline; a timeout is reported like any other error
//! - Callers decide the failure policy (fail closed for gating, fail open for usage)

pub mod client;
pub mod types;

pub use client::{HttpRemoteAuthority, RemoteAuthority};
pub use types::{RemoteError, RemoteResult};
