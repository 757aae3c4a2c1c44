use std::error::Error;
use std::sync::Arc;

use opentelemetry::trace::TraceContextExt;
use tokio::net::TcpListener;
use tracing::{error, info};
use tracing_subscriber::filter::EnvFilter;
use tracing_subscriber::prelude::*;

use k8strace::config::Config;
use k8strace::server::{serve, AppState};
use k8strace::shutdown::{shutdown_with_deadline, SHUTDOWN_DEADLINE};
use k8strace::telemetry;

fn init_logging() {
    // Restrict the crates used by the OTLP exporter to `error` so batch
    // uploads do not loop their own events back through the subscriber.
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info"))
        .add_directive("hyper=error".parse().unwrap())
        .add_directive("tonic=error".parse().unwrap())
        .add_directive("reqwest=error".parse().unwrap());

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_filter(filter))
        .init();
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error + Send + Sync + 'static>> {
    init_logging();

    let config = Config::from_env()?;
    let provider = telemetry::init_tracer_provider(&config)?;
    telemetry::install_global(&provider);

    let root_cx = telemetry::start_root_span(&provider);
    let state = Arc::new(AppState::new(&provider, root_cx.clone()));

    let listener = TcpListener::bind(config.listen_addr).await?;
    info!(name: "listening", address = %config.listen_addr, "Listening for requests");

    let served = serve(listener, state, async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            error!(name: "signal_error", error = %err, "Failed to listen for the shutdown signal");
        }
    })
    .await;

    // The root span has to end before the flush or it never leaves the
    // pipeline.
    root_cx.span().end();

    if let Err(err) = shutdown_with_deadline(provider, SHUTDOWN_DEADLINE).await {
        error!(name: "shutdown_error", error = %err, "Trace flush failed");
        return Err(err.into());
    }

    served?;
    Ok(())
}
