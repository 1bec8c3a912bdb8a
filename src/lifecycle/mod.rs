//! Lifecycle management.
//!
//! Startup lives in `main.rs` (config → logging → metrics → authority client → server).
//! Shutdown: Ctrl+C or [`Shutdown::trigger`] stops accepting, then in-flight
//! exchanges drain through axum's graceful shutdown.

pub mod shutdown;

pub use shutdown::Shutdown;
