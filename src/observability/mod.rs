//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Filter stages, interceptor, remote client produce:
//!     → logging.rs (structured tracing events)
//!     → metrics.rs (decision counters, usage outcomes, remote latency)
//!
//! Consumers:
//!     → stdout (fmt layer, filtered by RUST_LOG or config)
//!     → Metrics endpoint (Prometheus scrape)
//! ```
//!
//! # Design Decisions
//! - Request ID flows through every log line of a request
//! - Metric updates are fire-and-forget and never fail a request

pub mod logging;
pub mod metrics;
