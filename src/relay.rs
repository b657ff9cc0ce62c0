//! The upstream relay client: sequential fail-over across configured
//! recursive resolvers within a per-exchange deadline. A close idiomatic
//! transliteration of `original_source/internal/dns/relay.go`'s
//! `RelayClient.Relay`, built on a raw `hickory_proto::op::Message`
//! exchange over `tokio::net::UdpSocket` rather than `hickory-resolver`'s
//! stub resolver, since the resolver needs the upstream's *verbatim* reply
//! (including non-zero rcodes) rather than a resolved record set.

use std::net::SocketAddr;
use std::time::Duration;

use hickory_proto::op::Message;
use hickory_proto::serialize::binary::{BinDecodable, BinEncodable};
use tokio::net::UdpSocket;
use tracing::warn;

use crate::error::EngineError;

const DEFAULT_DNS_PORT: u16 = 53;

#[derive(Debug, Clone)]
pub struct RelayConfig {
    pub upstreams: Vec<SocketAddr>,
    pub timeout: Duration,
}

impl RelayConfig {
    pub fn new(upstreams: Vec<SocketAddr>, timeout: Duration) -> Result<Self, EngineError> {
        if upstreams.is_empty() {
            return Err(EngineError::ConfigInvalid(
                "relay requires at least one upstream".to_string(),
            ));
        }
        if timeout.is_zero() {
            return Err(EngineError::ConfigInvalid(
                "relay timeout must be positive".to_string(),
            ));
        }
        Ok(Self { upstreams, timeout })
    }

    /// Parses `DNS_RELAY_SERVERS`-style entries (`ipv4[:port]`, comma
    /// separated upstream list already split by the caller), defaulting a
    /// missing port to 53. Fails the whole list on any unparseable entry,
    /// per the all-or-nothing behavior the source enforces.
    pub fn parse_upstreams(entries: &[&str]) -> Result<Vec<SocketAddr>, EngineError> {
        entries
            .iter()
            .map(|entry| parse_upstream(entry))
            .collect()
    }
}

fn parse_upstream(entry: &str) -> Result<SocketAddr, EngineError> {
    let entry = entry.trim();
    if let Ok(addr) = entry.parse::<SocketAddr>() {
        return Ok(addr);
    }
    entry
        .parse()
        .map(|ip| SocketAddr::new(ip, DEFAULT_DNS_PORT))
        .map_err(|_| EngineError::ConfigInvalid(format!("invalid relay upstream {entry:?}")))
}

pub struct RelayClient {
    config: RelayConfig,
}

impl RelayClient {
    pub fn new(config: RelayConfig) -> Self {
        Self { config }
    }

    /// Forwards `question` to each upstream in order until one replies.
    pub async fn relay(&self, question: &Message) -> Result<Message, EngineError> {
        let wire = question.to_vec()?;
        let mut last_error = EngineError::RelayTransport("no upstreams configured".to_string());
        for upstream in &self.config.upstreams {
            match exchange(&wire, *upstream, self.config.timeout).await {
                Ok(reply) => return Ok(reply),
                Err(error) => {
                    warn!(%upstream, %error, "relay upstream failed, trying next");
                    last_error = error;
                }
            }
        }
        Err(EngineError::RelayExhausted(last_error.to_string()))
    }
}

async fn exchange(wire: &[u8], upstream: SocketAddr, timeout: Duration) -> Result<Message, EngineError> {
    let bind_addr: SocketAddr = if upstream.is_ipv4() {
        "0.0.0.0:0".parse().unwrap()
    } else {
        "[::]:0".parse().unwrap()
    };
    let transport = |e: std::io::Error| EngineError::RelayTransport(e.to_string());
    let socket = UdpSocket::bind(bind_addr).await.map_err(transport)?;
    socket.connect(upstream).await.map_err(transport)?;

    tokio::time::timeout(timeout, async {
        socket.send(wire).await.map_err(transport)?;
        let mut buf = [0u8; 4096];
        let len = socket.recv(&mut buf).await.map_err(transport)?;
        Message::from_vec(&buf[..len]).map_err(|e| EngineError::RelayTransport(e.to_string()))
    })
    .await
    .map_err(|_| EngineError::RelayTransport("timed out".to_string()))?
}
