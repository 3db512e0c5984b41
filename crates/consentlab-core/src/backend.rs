//! The single path every component uses to reach the generative backend.

use std::time::{Duration, Instant};

use tracing::{debug, warn};

use consentlab_contracts::{backend::GenerateRequest, error::BackendError};

use crate::traits::GenerativeBackend;

/// Default bound on one backend call.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Issue one bounded call and return the reply text.
///
/// A call that outlives `timeout` is dropped and reported as
/// `BackendError::Timeout`, so callers see timeouts on the same channel as
/// transport and HTTP failures. Never retries.
pub async fn call_backend(
    backend: &dyn GenerativeBackend,
    request: &GenerateRequest,
    timeout: Duration,
    operation: &'static str,
) -> Result<String, BackendError> {
    debug!(
        operation,
        backend = backend.name(),
        prompt_len = request.prompt.len(),
        has_image = request.inline_image.is_some(),
        "backend call starting"
    );

    let started = Instant::now();
    let outcome = tokio::time::timeout(timeout, backend.generate(request)).await;
    let elapsed_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);

    match outcome {
        Ok(Ok(response)) => {
            debug!(operation, elapsed_ms, reply_len = response.text.len(), "backend call finished");
            Ok(response.text)
        }
        Ok(Err(err)) => {
            warn!(operation, elapsed_ms, reason = err.reason(), error = %err, "backend call failed");
            Err(err)
        }
        Err(_) => {
            let after_ms = u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX);
            warn!(operation, after_ms, "backend call timed out");
            Err(BackendError::Timeout { after_ms })
        }
    }
}
