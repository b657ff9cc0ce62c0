//! Resolves a `service:<label>` A-record value into a live IPv4 address via
//! the host's own resolver, at answer-assembly time rather than load time
//! (container IPs are ephemeral). Grounded on
//! `original_source/internal/dns/resolver.go`'s `ResolveServiceIP`, built
//! on `hickory_resolver` rather than a hand-rolled getaddrinfo call.

use std::net::IpAddr;

use hickory_resolver::{Resolver, TokioResolver};
use tracing::warn;

use crate::error::EngineError;

pub struct ServiceResolver {
    resolver: TokioResolver,
}

impl ServiceResolver {
    pub async fn from_system_conf() -> Result<Self, EngineError> {
        let resolver = Resolver::builder_tokio()
            .map_err(|e| EngineError::ConfigInvalid(format!("resolver init failed: {e}")))?
            .build();
        Ok(Self { resolver })
    }

    /// Resolves `label` to its first IPv4 address, logging and returning
    /// `ResolveFailed` on any error or when only IPv6 addresses come back.
    pub async fn resolve_v4(&self, label: &str) -> Result<String, EngineError> {
        let lookup = self.resolver.lookup_ip(label).await?;
        lookup
            .iter()
            .find_map(|ip| match ip {
                IpAddr::V4(v4) => Some(v4.to_string()),
                IpAddr::V6(_) => None,
            })
            .ok_or_else(|| {
                warn!(label, "service resolution returned no ipv4 address");
                EngineError::ResolveFailed(format!("no ipv4 address for {label}"))
            })
    }
}
