//! Process configuration, read from the environment once at startup.

use std::env;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};

use crate::error::ConfigError;

/// Collector URL for the trace signal, e.g. `http://localhost:4318/v1/traces`.
/// Required; the process refuses to start without it.
pub const OTEL_EXPORTER_OTLP_TRACES_ENDPOINT: &str = "OTEL_EXPORTER_OTLP_TRACES_ENDPOINT";

/// Socket address the HTTP listener binds to. Optional.
pub const K8STRACE_LISTEN_ADDR: &str = "K8STRACE_LISTEN_ADDR";

/// Name greeted by the hello handler. Read per request; unset reads as empty.
pub const MY_NAME: &str = "MY_NAME";

/// Listen address used when [`K8STRACE_LISTEN_ADDR`] is not set.
pub const DEFAULT_LISTEN_ADDR: SocketAddr =
    SocketAddr::new(IpAddr::V4(Ipv4Addr::UNSPECIFIED), 8080);

/// Startup configuration for the service.
#[derive(Debug, Clone)]
pub struct Config {
    /// Full OTLP/HTTP traces URL the exporter binds to.
    pub collector_endpoint: String,
    /// Address the HTTP listener binds to.
    pub listen_addr: SocketAddr,
}

impl Config {
    /// Reads the configuration from the process environment.
    ///
    /// The collector endpoint is required so that a missing collector is a
    /// startup error rather than a silent default; the listen address falls
    /// back to [`DEFAULT_LISTEN_ADDR`].
    pub fn from_env() -> Result<Self, ConfigError> {
        let collector_endpoint = env::var(OTEL_EXPORTER_OTLP_TRACES_ENDPOINT)
            .ok()
            .filter(|value| !value.is_empty())
            .ok_or(ConfigError::MissingCollectorEndpoint(
                OTEL_EXPORTER_OTLP_TRACES_ENDPOINT,
            ))?;

        let listen_addr = match env::var(K8STRACE_LISTEN_ADDR).ok().filter(|value| !value.is_empty()) {
            Some(addr) => addr
                .parse()
                .map_err(|source| ConfigError::InvalidListenAddr { addr, source })?,
            None => DEFAULT_LISTEN_ADDR,
        };

        Ok(Config {
            collector_endpoint,
            listen_addr,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collector_endpoint_is_required() {
        temp_env::with_var(OTEL_EXPORTER_OTLP_TRACES_ENDPOINT, None::<&str>, || {
            let err = Config::from_env().unwrap_err();
            assert!(matches!(err, ConfigError::MissingCollectorEndpoint(_)));
        });
    }

    #[test]
    fn empty_collector_endpoint_is_rejected() {
        temp_env::with_var(OTEL_EXPORTER_OTLP_TRACES_ENDPOINT, Some(""), || {
            let err = Config::from_env().unwrap_err();
            assert!(matches!(err, ConfigError::MissingCollectorEndpoint(_)));
        });
    }

    #[test]
    fn listen_addr_defaults_to_port_8080() {
        temp_env::with_vars(
            [
                (
                    OTEL_EXPORTER_OTLP_TRACES_ENDPOINT,
                    Some("http://localhost:4318/v1/traces"),
                ),
                (K8STRACE_LISTEN_ADDR, None),
            ],
            || {
                let config = Config::from_env().expect("endpoint is set");
                assert_eq!(config.collector_endpoint, "http://localhost:4318/v1/traces");
                assert_eq!(config.listen_addr, DEFAULT_LISTEN_ADDR);
            },
        );
    }

    #[test]
    fn listen_addr_can_be_overridden() {
        temp_env::with_vars(
            [
                (
                    OTEL_EXPORTER_OTLP_TRACES_ENDPOINT,
                    Some("http://localhost:4318/v1/traces"),
                ),
                (K8STRACE_LISTEN_ADDR, Some("127.0.0.1:9090")),
            ],
            || {
                let config = Config::from_env().expect("both variables are set");
                assert_eq!(config.listen_addr, "127.0.0.1:9090".parse().unwrap());
            },
        );
    }

    #[test]
    fn malformed_listen_addr_is_an_error() {
        temp_env::with_vars(
            [
                (
                    OTEL_EXPORTER_OTLP_TRACES_ENDPOINT,
                    Some("http://localhost:4318/v1/traces"),
                ),
                (K8STRACE_LISTEN_ADDR, Some("not-a-socket-addr")),
            ],
            || {
                let err = Config::from_env().unwrap_err();
                assert!(matches!(err, ConfigError::InvalidListenAddr { .. }));
            },
        );
    }
}
