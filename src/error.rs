//! The engine's error kinds. Mirrors the teacher's manual-`From` style
//! (`GoatNsError`) rather than a `thiserror` derive — every variant already
//! carries its own human-readable payload, so a derive buys little here.

use std::fmt::{Display, Formatter};

#[derive(Debug)]
pub enum EngineError {
    /// A single record declaration was dropped at load time.
    MalformedRecord { key: String, reason: String },
    /// Startup configuration (relay timeout, upstream list) was invalid.
    ConfigInvalid(String),
    /// The service resolver could not find an IPv4 address for a label.
    ResolveFailed(String),
    /// One upstream failed during relay fail-over; the caller moves on.
    RelayTransport(String),
    /// Every configured upstream failed.
    RelayExhausted(String),
    /// Wire-format encode/decode failure surfaced by the framing library.
    Protocol(String),
    Io(std::io::Error),
}

impl Display for EngineError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            EngineError::MalformedRecord { key, reason } => {
                write!(f, "malformed record {key}: {reason}")
            }
            EngineError::ConfigInvalid(msg) => write!(f, "invalid configuration: {msg}"),
            EngineError::ResolveFailed(msg) => write!(f, "service resolution failed: {msg}"),
            EngineError::RelayTransport(msg) => write!(f, "relay transport error: {msg}"),
            EngineError::RelayExhausted(msg) => {
                write!(f, "all relay upstreams failed, last error: {msg}")
            }
            EngineError::Protocol(msg) => write!(f, "protocol error: {msg}"),
            EngineError::Io(err) => write!(f, "I/O error: {err}"),
        }
    }
}

impl std::error::Error for EngineError {}

impl From<std::io::Error> for EngineError {
    fn from(error: std::io::Error) -> Self {
        EngineError::Io(error)
    }
}

impl From<hickory_proto::ProtoError> for EngineError {
    fn from(error: hickory_proto::ProtoError) -> Self {
        EngineError::Protocol(error.to_string())
    }
}

impl From<hickory_resolver::ResolveError> for EngineError {
    fn from(error: hickory_resolver::ResolveError) -> Self {
        EngineError::ResolveFailed(error.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_carries_the_key() {
        let err = EngineError::MalformedRecord {
            key: "MX_1".to_string(),
            reason: "invalid priority".to_string(),
        };
        assert!(err.to_string().contains("MX_1"));
    }
}
