//! Deadline enforcement for derivation units.
//!
//! A unit that misses its deadline is abandoned from the caller's point of view. Work
//! already handed to the blocking pool keeps running until it finishes and its result is
//! dropped.

use pictor_core::AppError;
use std::future::Future;
use std::time::Duration;

/// Run `fut` under `deadline`, measured from this call.
pub async fn with_deadline<T, F>(
    operation: &'static str,
    deadline: Duration,
    fut: F,
) -> Result<T, AppError>
where
    F: Future<Output = Result<T, AppError>>,
{
    match tokio::time::timeout(deadline, fut).await {
        Ok(result) => result,
        Err(_) => {
            tracing::warn!(
                operation = operation,
                deadline_ms = deadline.as_millis() as u64,
                "Deadline exceeded"
            );
            Err(AppError::timeout(operation, deadline))
        }
    }
}

/// Run CPU-bound work on the blocking pool.
pub async fn run_blocking<T, F>(operation: &'static str, f: F) -> Result<T, AppError>
where
    F: FnOnce() -> Result<T, AppError> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| AppError::Internal(format!("{} task failed: {}", operation, e)))?
}
