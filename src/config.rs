//! Parses the environment into the typed startup configuration: listening
//! port, relay settings, and the log-collaborator fields the core doesn't
//! consume itself. Grounded on the teacher's `ConfigFile` shape, but reads
//! `std::env::var` directly rather than the `config` crate's
//! `Environment::with_prefix` source, since these variables aren't
//! uniformly prefixed the way that source expects (matches
//! `original_source/pkg/config/config.go`'s plain `os.Getenv` style).

use std::time::Duration;

use serde::Serialize;
use tracing::warn;

use crate::relay::RelayConfig;

const DEFAULT_PORT: u16 = 53;
const DEFAULT_RELAY_TIMEOUT: Duration = Duration::from_secs(2);

#[derive(Debug, Serialize)]
pub struct ServerConfig {
    pub port: u16,
    #[serde(skip)]
    pub relay: Option<RelayConfig>,
    pub relay_servers: Vec<String>,
    pub log_dir: Option<String>,
    pub service_log: Option<String>,
    pub action_log: Option<String>,
    pub max_log_size: Option<String>,
    pub max_log_backups: Option<String>,
}

impl ServerConfig {
    pub fn from_env() -> Self {
        Self::from_vars(std::env::vars())
    }

    /// Builds the config from an arbitrary `(key, value)` source, so tests
    /// don't have to mutate the real process environment.
    pub fn from_vars<I>(vars: I) -> Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let mut port = None;
        let mut relay_servers_raw = None;
        let mut log_dir = None;
        let mut service_log = None;
        let mut action_log = None;
        let mut max_log_size = None;
        let mut max_log_backups = None;

        for (key, value) in vars {
            match key.as_str() {
                "DNS_PORT" => port = value.parse::<u16>().ok(),
                "DNS_RELAY_SERVERS" => relay_servers_raw = Some(value),
                "LOG_DIR" => log_dir = Some(value),
                "SERVICE_LOG" => service_log = Some(value),
                "ACTION_LOG" => action_log = Some(value),
                "MAX_LOG_SIZE" => max_log_size = Some(value),
                "MAX_LOG_BACKUPS" => max_log_backups = Some(value),
                _ => {}
            }
        }

        let relay_servers: Vec<String> = relay_servers_raw
            .unwrap_or_default()
            .split(',')
            .map(str::trim)
            .filter(|entry| !entry.is_empty())
            .map(str::to_string)
            .collect();

        let relay = build_relay(&relay_servers);

        Self {
            port: port.unwrap_or(DEFAULT_PORT),
            relay,
            relay_servers,
            log_dir,
            service_log,
            action_log,
            max_log_size,
            max_log_backups,
        }
    }
}

fn build_relay(relay_servers: &[String]) -> Option<RelayConfig> {
    if relay_servers.is_empty() {
        return None;
    }
    let entries: Vec<&str> = relay_servers.iter().map(String::as_str).collect();
    match RelayConfig::parse_upstreams(&entries) {
        Ok(upstreams) => match RelayConfig::new(upstreams, DEFAULT_RELAY_TIMEOUT) {
            Ok(config) => Some(config),
            Err(error) => {
                warn!(%error, "disabling relay, invalid configuration");
                None
            }
        },
        Err(error) => {
            warn!(%error, "disabling relay, unparseable upstream in DNS_RELAY_SERVERS");
            None
        }
    }
}

impl std::fmt::Display for ServerConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "port={} relay={} log_dir={:?}",
            self.port,
            match &self.relay {
                Some(relay) => format!("{} upstream(s)", relay.upstreams.len()),
                None => "disabled".to_string(),
            },
            self.log_dir
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vars(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn defaults_to_port_53_with_no_relay() {
        let config = ServerConfig::from_vars(vars(&[]));
        assert_eq!(config.port, 53);
        assert!(config.relay.is_none());
    }

    #[test]
    fn reads_custom_port() {
        let config = ServerConfig::from_vars(vars(&[("DNS_PORT", "5353")]));
        assert_eq!(config.port, 5353);
    }

    #[test]
    fn builds_relay_from_valid_server_list() {
        let config = ServerConfig::from_vars(vars(&[("DNS_RELAY_SERVERS", "198.51.100.1,198.51.100.2:5353")]));
        assert!(config.relay.is_some());
        assert_eq!(config.relay.unwrap().upstreams.len(), 2);
    }

    #[test]
    fn disables_relay_on_any_invalid_entry() {
        let config = ServerConfig::from_vars(vars(&[("DNS_RELAY_SERVERS", "198.51.100.1,not-an-ip")]));
        assert!(config.relay.is_none());
    }
}
