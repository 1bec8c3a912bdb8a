//! Shared utilities for integration testing.

use axum::{
    body::Body,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;

use interface_gateway::config::GatewayConfig;
use interface_gateway::{HttpRemoteAuthority, HttpServer, Shutdown};

pub const ACCESS_KEY: &str = "AAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAA";
pub const INTERFACE_ID: &str = "0123456789abcdef0123456789abcdef";
pub const USER_ID: &str = "fedcba9876543210fedcba9876543210";

/// Signature the mock authority derives.
pub fn sign_for(access_key: &str, nonce: &str) -> String {
    format!("sig-{}-{}", access_key, nonce)
}

/// Call counters and failure switches of the mock authority.
#[derive(Default)]
pub struct AuthorityState {
    pub sign_calls: AtomicUsize,
    pub check_calls: AtomicUsize,
    pub usage_calls: AtomicUsize,
    pub deny_interfaces: AtomicBool,
    pub fail_usage: AtomicBool,
}

impl AuthorityState {
    pub fn sign_calls(&self) -> usize {
        self.sign_calls.load(Ordering::SeqCst)
    }

    pub fn check_calls(&self) -> usize {
        self.check_calls.load(Ordering::SeqCst)
    }

    pub fn usage_calls(&self) -> usize {
        self.usage_calls.load(Ordering::SeqCst)
    }

    pub fn total_calls(&self) -> usize {
        self.sign_calls() + self.check_calls() + self.usage_calls()
    }
}

async fn bind_ephemeral() -> (TcpListener, SocketAddr) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    (listener, addr)
}

/// Start a remote authority double speaking the gateway's JSON contract.
pub async fn start_mock_authority() -> (SocketAddr, Arc<AuthorityState>) {
    let state = Arc::new(AuthorityState::default());

    let app = Router::new()
        .route(
            "/sign",
            post(|State(s): State<Arc<AuthorityState>>, Json(req): Json<Value>| async move {
                s.sign_calls.fetch_add(1, Ordering::SeqCst);
                let key = req["access_key"].as_str().unwrap_or_default();
                let nonce = req["nonce"].as_str().unwrap_or_default();
                Json(json!({ "sign": sign_for(key, nonce) }))
            }),
        )
        .route(
            "/interfaces/check",
            post(|State(s): State<Arc<AuthorityState>>| async move {
                s.check_calls.fetch_add(1, Ordering::SeqCst);
                let authorized = !s.deny_interfaces.load(Ordering::SeqCst);
                Json(json!({ "authorized": authorized }))
            }),
        )
        .route(
            "/usage/count",
            post(|State(s): State<Arc<AuthorityState>>| async move {
                s.usage_calls.fetch_add(1, Ordering::SeqCst);
                if s.fail_usage.load(Ordering::SeqCst) {
                    StatusCode::INTERNAL_SERVER_ERROR.into_response()
                } else {
                    Json(json!({ "counted": true })).into_response()
                }
            }),
        )
        .with_state(state.clone());

    let (listener, addr) = bind_ephemeral().await;
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    (addr, state)
}

/// Start a backend that streams `"ab"`, `"cd"`, `"ef"` on `/stream` and fails on `/broken`.
pub async fn start_mock_upstream() -> SocketAddr {
    let app = Router::new()
        .route(
            "/stream",
            get(|| async {
                let chunks = futures_util::stream::unfold(0usize, |i| async move {
                    let parts = ["ab", "cd", "ef"];
                    if i == parts.len() {
                        return None;
                    }
                    tokio::time::sleep(Duration::from_millis(10)).await;
                    Some((Ok::<_, Infallible>(parts[i]), i + 1))
                });
                Body::from_stream(chunks)
            }),
        )
        .route(
            "/broken",
            get(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "backend failure") }),
        );

    let (listener, addr) = bind_ephemeral().await;
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    addr
}

/// A running gateway plus the handle that stops it.
pub struct Gateway {
    pub addr: SocketAddr,
    pub shutdown: Shutdown,
}

impl Gateway {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }
}

impl Drop for Gateway {
    fn drop(&mut self) {
        self.shutdown.trigger();
    }
}

/// Start the gateway in front of `upstream`, asking `authority`.
pub async fn start_gateway(
    upstream: SocketAddr,
    authority: SocketAddr,
    allow_list: &[&str],
) -> Gateway {
    let mut config = GatewayConfig::default();
    config.upstream.address = upstream.to_string();
    config.remote.base_url = format!("http://{}", authority);
    config.remote.timeout_ms = 1000;
    config.access.allow_list = allow_list.iter().map(|s| s.to_string()).collect();
    config.observability.metrics_enabled = false;

    let remote = Arc::new(HttpRemoteAuthority::new(&config.remote).unwrap());
    let server = HttpServer::new(config, remote).unwrap();

    let (listener, addr) = bind_ephemeral().await;
    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    tokio::spawn(async move {
        let _ = server.run(listener, server_shutdown).await;
    });

    Gateway { addr, shutdown }
}

/// A request carrying every header needed to pass the gate.
pub fn signed_get(client: &reqwest::Client, url: &str) -> reqwest::RequestBuilder {
    signed_get_with(client, url, &sign_for(ACCESS_KEY, "n1"))
}

/// Same headers as [`signed_get`] but with `sign` as the only signature value.
pub fn signed_get_with(client: &reqwest::Client, url: &str, sign: &str) -> reqwest::RequestBuilder {
    client
        .get(url)
        .header("accessKey", ACCESS_KEY)
        .header("nonce", "n1")
        .header("sign", sign)
        .header("interface_id", INTERFACE_ID)
        .header("user_id", USER_ID)
}

pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .pool_max_idle_per_host(0)
        .no_proxy()
        .build()
        .unwrap()
}
