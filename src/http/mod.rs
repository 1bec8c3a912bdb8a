//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, connect info, local address)
//!     → request.rs (assign/propagate request ID)
//!     → filter (gate, then meter the response)
//!     → server.rs proxy handler (forward to the pre-resolved upstream)
//!     → Send to client
//! ```

pub mod request;
pub mod server;

pub use request::X_REQUEST_ID;
pub use server::HttpServer;
