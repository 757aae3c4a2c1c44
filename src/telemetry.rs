//! Trace pipeline construction: exporter binding, provider, resource identity.

use opentelemetry::trace::{TraceContextExt, Tracer, TracerProvider as _};
use opentelemetry::{global, Context, KeyValue};
use opentelemetry_otlp::{Protocol, SpanExporter, WithExportConfig};
use opentelemetry_sdk::trace::SdkTracerProvider;
use opentelemetry_sdk::Resource;
use opentelemetry_semantic_conventions::SCHEMA_URL;

use crate::config::Config;
use crate::error::InitError;

/// Service identity stamped on every exported span.
pub const SERVICE_NAME: &str = "k8sTrace";
pub const ENVIRONMENT: &str = "development";
pub const INSTANCE_ID: i64 = 1;

/// Tracer that owns the process root span.
pub const MAIN_TRACER: &str = "component-main";

const ROOT_SPAN: &str = "hello";

pub(crate) fn resource() -> Resource {
    Resource::builder_empty()
        .with_service_name(SERVICE_NAME)
        .with_schema_url(
            [
                KeyValue::new("environment", ENVIRONMENT),
                KeyValue::new("ID", INSTANCE_ID),
            ],
            SCHEMA_URL,
        )
        .build()
}

/// Binds an OTLP/HTTP span exporter to the collector endpoint.
///
/// Only URL parsing and client setup happen here; the first network I/O is
/// the first batch upload.
fn build_span_exporter(endpoint: &str) -> Result<SpanExporter, InitError> {
    let exporter = SpanExporter::builder()
        .with_http()
        .with_protocol(Protocol::HttpBinary)
        .with_endpoint(endpoint)
        .build()?;
    Ok(exporter)
}

/// Constructs the tracer provider: exporter binding, batch pipeline, resource.
///
/// Finished spans are buffered and drained by the batch worker on its own
/// schedule; nothing is observable externally until spans end.
pub fn init_tracer_provider(config: &Config) -> Result<SdkTracerProvider, InitError> {
    let exporter = build_span_exporter(&config.collector_endpoint)?;
    Ok(SdkTracerProvider::builder()
        .with_batch_exporter(exporter)
        .with_resource(resource())
        .build())
}

/// Installs the provider in the process-wide slot consulted by
/// [`global::tracer`]. Until this runs, global lookups hand out no-op tracers
/// whose spans are silently discarded.
pub fn install_global(provider: &SdkTracerProvider) {
    global::set_tracer_provider(provider.clone());
}

/// Starts the process root span and returns the context carrying it.
///
/// Request spans parent to this context for the lifetime of the process; the
/// caller ends the span right before the final flush.
pub fn start_root_span(provider: &SdkTracerProvider) -> Context {
    let tracer = provider.tracer(MAIN_TRACER);
    let parent = Context::new();
    let span = tracer
        .span_builder(ROOT_SPAN)
        .start_with_context(&tracer, &parent);
    parent.with_span(span)
}
