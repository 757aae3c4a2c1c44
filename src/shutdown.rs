//! Bounded-deadline flush of the trace pipeline at process exit.

use std::time::Duration;

use opentelemetry_sdk::error::{OTelSdkError, OTelSdkResult};
use opentelemetry_sdk::trace::SdkTracerProvider;

use crate::error::ShutdownError;

/// How long the final flush may run before remaining spans are dropped.
pub const SHUTDOWN_DEADLINE: Duration = Duration::from_secs(5);

/// Flushes buffered spans and closes the provider, bounded by `deadline`.
///
/// `SdkTracerProvider::shutdown` blocks while the batch worker drains, so it
/// runs on a blocking thread and is raced against the deadline. When the
/// deadline wins, the abandoned worker may still be uploading but the caller
/// proceeds; spans it never managed to hand over are dropped. Exactly one
/// flush attempt is made, there is no retry.
pub async fn shutdown_with_deadline(
    provider: SdkTracerProvider,
    deadline: Duration,
) -> Result<(), ShutdownError> {
    let flush = tokio::task::spawn_blocking(move || provider.shutdown());

    match tokio::time::timeout(deadline, flush).await {
        Err(_elapsed) => Err(ShutdownError::FlushTimeout { deadline }),
        Ok(Err(join_err)) => Err(ShutdownError::ExportFailure(OTelSdkError::InternalFailure(
            format!("flush task panicked: {join_err}"),
        ))),
        Ok(Ok(result)) => map_flush_result(result, deadline),
    }
}

/// Maps the provider's shutdown result onto the sequencer's error taxonomy:
/// a provider-reported `Timeout` counts against the deadline contract, any
/// other failure is an export failure.
///
/// The 0.31 provider folds processor errors, timeouts included, into
/// `InternalFailure`, so through [`shutdown_with_deadline`] it is the outer
/// deadline race that produces `FlushTimeout`.
fn map_flush_result(result: OTelSdkResult, deadline: Duration) -> Result<(), ShutdownError> {
    match result {
        Ok(()) => Ok(()),
        Err(OTelSdkError::Timeout(_)) => Err(ShutdownError::FlushTimeout { deadline }),
        Err(err) => Err(ShutdownError::ExportFailure(err)),
    }
}
