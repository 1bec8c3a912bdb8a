//! Origin allow-list check.

use std::collections::HashSet;
use std::net::{IpAddr, SocketAddr};

use crate::filter::decision::{Decision, DenyReason};

/// Fixed set of trusted source IPs, shared read-only by all requests.
///
/// Entries and lookups are canonical: `::ffff:a.b.c.d` is the same origin as `a.b.c.d`.
#[derive(Debug, Clone, Default)]
pub struct AllowList {
    ips: HashSet<IpAddr>,
}

impl AllowList {
    pub fn new(ips: impl IntoIterator<Item = IpAddr>) -> Self {
        Self {
            ips: ips.into_iter().map(|ip| ip.to_canonical()).collect(),
        }
    }

    /// Build from configuration strings. Unparseable entries are skipped with a warning;
    /// validation rejects them before this point in normal startup.
    pub fn from_config(entries: &[String]) -> Self {
        let ips = entries.iter().filter_map(|entry| match entry.trim().parse::<IpAddr>() {
            Ok(ip) => Some(ip),
            Err(_) => {
                tracing::warn!(entry = %entry, "Ignoring invalid allow-list entry");
                None
            }
        });
        Self::new(ips)
    }

    pub fn contains(&self, ip: &IpAddr) -> bool {
        self.ips.contains(&ip.to_canonical())
    }

    pub fn len(&self) -> usize {
        self.ips.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ips.is_empty()
    }
}

/// Allow iff the source IP is trusted. The port is not part of the identity.
pub fn check_origin(allow_list: &AllowList, source: &SocketAddr) -> Decision {
    if allow_list.contains(&source.ip()) {
        Decision::Allow
    } else {
        Decision::Deny(DenyReason::UntrustedOrigin)
    }
}
