//! Edge gateway filter library.
//!
//! Gates every request on origin, signature and interface authorization, then
//! meters successful responses as they stream back to the client.

pub mod config;
pub mod filter;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod remote;

pub use config::schema::GatewayConfig;
pub use filter::GatewayFilter;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
pub use remote::{HttpRemoteAuthority, RemoteAuthority};
