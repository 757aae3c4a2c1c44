//! A traced greeting service.
//!
//! The binary binds an OTLP span exporter to a collector, wraps it in a
//! batching tracer provider stamped with the `k8sTrace` service identity,
//! installs the provider process-wide, opens one root span, and serves a
//! single HTTP endpoint that answers `Hello "<MY_NAME>"!` while emitting one
//! child span per request. On shutdown, buffered spans are flushed within a
//! bounded deadline.
//!
//! Modules mirror the lifecycle: [`config`] reads the environment,
//! [`telemetry`] builds and installs the pipeline, [`server`] carries the
//! request path, [`shutdown`] bounds the final flush, and [`error`] names
//! what can go wrong at either end.

pub mod config;
pub mod error;
pub mod server;
pub mod shutdown;
pub mod telemetry;
