//! HTTP surface: one handler, one child span per request.

use std::convert::Infallible;
use std::env;
use std::future::Future;
use std::pin::pin;
use std::sync::Arc;

use http_body_util::{combinators::BoxBody, BodyExt, Full};
use hyper::body::Bytes;
use hyper::service::service_fn;
use hyper::{Request, Response};
use hyper_util::rt::{TokioExecutor, TokioIo};
use hyper_util::server::conn::auto::Builder;
use opentelemetry::trace::{SpanKind, TraceContextExt, Tracer, TracerProvider as _};
use opentelemetry::{Context, KeyValue};
use opentelemetry_sdk::trace::{SdkTracer, SdkTracerProvider};
use tokio::net::TcpListener;
use tracing::{info, warn};

use crate::config;

/// Tracer that owns the per-request spans.
pub const HANDLER_TRACER: &str = "hello-handler";

const HELLO_SPAN: &str = "hello";

/// Per-process state injected into the handler.
///
/// Request handling never consults the global slot; it uses this handle, so
/// the tracer a request sees is decided at the composition root.
#[derive(Clone)]
pub struct AppState {
    tracer: SdkTracer,
    root_cx: Context,
}

impl AppState {
    /// Builds the handler state from the provider and the root span context.
    pub fn new(provider: &SdkTracerProvider, root_cx: Context) -> Self {
        Self {
            tracer: provider.tracer(HANDLER_TRACER),
            root_cx,
        }
    }
}

/// Answers every request with `Hello "<MY_NAME>"!` and emits one child span.
///
/// The span parents to the process root span, not to anything carried on
/// the request. A missing name degrades to an empty greeting; the handler
/// has no failure path. The span is ended explicitly on the way out, and
/// the drop guard ends it on any path that skips that line.
pub async fn handle<B>(
    _req: Request<B>,
    state: Arc<AppState>,
) -> Result<Response<BoxBody<Bytes, hyper::Error>>, Infallible> {
    let span = state
        .tracer
        .span_builder(HELLO_SPAN)
        .with_kind(SpanKind::Server)
        .start_with_context(&state.tracer, &state.root_cx);
    let cx = state.root_cx.with_span(span);
    cx.span().set_attribute(KeyValue::new("testset", "value"));

    let your_name = env::var(config::MY_NAME).unwrap_or_default();
    let body = format!("Hello {your_name:?}!");

    cx.span().end();

    Ok(Response::new(
        Full::new(Bytes::from(body))
            .map_err(|err| match err {})
            .boxed(),
    ))
}

/// Accepts connections until `shutdown` resolves, serving each connection on
/// its own task so in-flight requests stay independent.
pub async fn serve<F>(
    listener: TcpListener,
    state: Arc<AppState>,
    shutdown: F,
) -> std::io::Result<()>
where
    F: Future<Output = ()>,
{
    let mut shutdown = pin!(shutdown);
    loop {
        tokio::select! {
            accepted = listener.accept() => {
                let (stream, _addr) = accepted?;
                let state = state.clone();
                tokio::spawn(async move {
                    let service = service_fn(move |req| handle(req, state.clone()));
                    if let Err(err) = Builder::new(TokioExecutor::new())
                        .serve_connection(TokioIo::new(stream), service)
                        .await
                    {
                        warn!(name: "connection_error", error = %err, "Connection terminated abnormally");
                    }
                });
            }
            _ = &mut shutdown => {
                info!(name: "listener_stopped", "Shutdown signal received; no longer accepting connections");
                return Ok(());
            }
        }
    }
}
