//! Error taxonomy for pipeline startup and shutdown.

use std::time::Duration;

use opentelemetry_otlp::ExporterBuildError;
use opentelemetry_sdk::error::OTelSdkError;
use thiserror::Error;

/// Errors reading the process configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The collector endpoint variable is unset or empty.
    #[error("collector endpoint is required: set {0}")]
    MissingCollectorEndpoint(&'static str),

    /// The listen address override could not be parsed as a socket address.
    #[error("invalid listen address {addr:?}: {source}")]
    InvalidListenAddr {
        addr: String,
        #[source]
        source: std::net::AddrParseError,
    },
}

/// Errors that prevent the trace pipeline from starting.
///
/// Any of these is fatal: the process reports the error and exits without
/// ever binding the HTTP listener.
#[derive(Debug, Error)]
pub enum InitError {
    /// The configuration could not be read from the environment.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The span exporter could not be bound to the configured collector
    /// endpoint, e.g. the URL failed to parse.
    #[error("failed to build span exporter: {0}")]
    ExporterInit(#[from] ExporterBuildError),
}

/// Errors reported by the bounded shutdown flush.
#[derive(Debug, Error)]
pub enum ShutdownError {
    /// The flush did not complete before the deadline; spans still buffered
    /// at that point are dropped.
    #[error("span flush did not complete within {deadline:?}")]
    FlushTimeout { deadline: Duration },

    /// The provider rejected the final flush for a reason other than the
    /// deadline, e.g. the transport refused the batch or the provider was
    /// already shut down.
    #[error("span export failed during shutdown: {0}")]
    ExportFailure(#[source] OTelSdkError),
}
