//! In-process remote authority double for unit tests.

use async_trait::async_trait;
use axum::http::{HeaderMap, Method};
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::filter::context::RequestContext;
use crate::remote::{RemoteAuthority, RemoteError, RemoteResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UsageBehavior {
    Count,
    Reject,
    Fail,
    Panic,
}

pub struct MockAuthority {
    sign_calls: AtomicUsize,
    check_calls: AtomicUsize,
    usage_calls: AtomicUsize,
    fail_sign: bool,
    fail_check: bool,
    allowed_method: Option<&'static str>,
    usage: UsageBehavior,
}

impl MockAuthority {
    pub fn new() -> Self {
        Self {
            sign_calls: AtomicUsize::new(0),
            check_calls: AtomicUsize::new(0),
            usage_calls: AtomicUsize::new(0),
            fail_sign: false,
            fail_check: false,
            allowed_method: None,
            usage: UsageBehavior::Count,
        }
    }

    pub fn sign_for(access_key: &str, nonce: &str) -> String {
        format!("sig:{}:{}", access_key, nonce)
    }

    pub fn failing_sign(mut self) -> Self {
        self.fail_sign = true;
        self
    }

    pub fn failing_check(mut self) -> Self {
        self.fail_check = true;
        self
    }

    pub fn authorize_only(mut self, method: &'static str) -> Self {
        self.allowed_method = Some(method);
        self
    }

    pub fn usage(mut self, behavior: UsageBehavior) -> Self {
        self.usage = behavior;
        self
    }

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

#[async_trait]
impl RemoteAuthority for MockAuthority {
    async fn derive_signature(&self, access_key: &str, nonce: &str) -> RemoteResult<String> {
        self.sign_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_sign {
            return Err(RemoteError::Transport("connection refused".into()));
        }
        Ok(Self::sign_for(access_key, nonce))
    }

    async fn check_interface_authorized(
        &self,
        _interface_id: &str,
        method: &str,
    ) -> RemoteResult<bool> {
        self.check_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_check {
            return Err(RemoteError::Timeout(10));
        }
        Ok(self.allowed_method.map_or(true, |m| m == method))
    }

    async fn record_usage(&self, _interface_id: &str, _user_id: &str) -> RemoteResult<bool> {
        self.usage_calls.fetch_add(1, Ordering::SeqCst);
        match self.usage {
            UsageBehavior::Count => Ok(true),
            UsageBehavior::Reject => Ok(false),
            UsageBehavior::Fail => Err(RemoteError::Status(500)),
            UsageBehavior::Panic => panic!("usage backend exploded"),
        }
    }
}

pub const ACCESS_KEY: &str = "AAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAA";
pub const INTERFACE_ID: &str = "0123456789abcdef0123456789abcdef";
pub const USER_ID: &str = "fedcba9876543210fedcba9876543210";

/// A context that passes every check against a default [`MockAuthority`].
pub fn context(source: &str) -> RequestContext {
    RequestContext {
        request_id: "test-request".into(),
        source: source.parse().unwrap(),
        destination: None,
        method: Method::GET,
        query: None,
        headers: HeaderMap::new(),
        access_key: Some(ACCESS_KEY.into()),
        nonce: Some("n1".into()),
        sign: Some(MockAuthority::sign_for(ACCESS_KEY, "n1")),
        interface_id: Some(INTERFACE_ID.into()),
        user_id: Some(USER_ID.into()),
    }
}
