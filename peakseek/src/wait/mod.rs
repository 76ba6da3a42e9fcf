//! Bounded cancellable wait primitive
//!
//! Every blocking point in a search run waits through [`bounded_wait`]: the
//! pending operation is polled in fixed quanta, and the cancellation token is
//! checked between quanta. A result that arrives within the current quantum
//! wins even if cancellation was already requested, so cancellation latency
//! is bounded by one quantum while results are never discarded racily.
//!
//! There is deliberately no overall deadline. An unresponsive remote call
//! keeps the caller waiting until cancellation is requested.
//!
//! # Example
//!
//! ```ignore
//! let mut pending = client.request(req);
//! match bounded_wait(&mut pending, config.poll_interval, &cancel).await {
//!     WaitOutcome::Ready(response) => handle(response),
//!     WaitOutcome::Cancelled => return SampleOutcome::Cancelled,
//! }
//! ```

use std::future::Future;
use std::time::Duration;

use tokio::time::timeout;
use tokio_util::sync::CancellationToken;

/// Result of a bounded cancellable wait.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaitOutcome<T> {
    /// The pending operation resolved with a value.
    Ready(T),
    /// Cancellation was observed at a quantum boundary before the
    /// operation resolved. The operation itself is left outstanding.
    Cancelled,
}

impl<T> WaitOutcome<T> {
    /// Returns true if the wait ended through cancellation.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, WaitOutcome::Cancelled)
    }
}

/// Waits for `pending` to resolve, checking `cancel` every `poll_interval`.
///
/// The pending future is only borrowed. On [`WaitOutcome::Cancelled`] the
/// caller still owns it and decides whether to drop it or issue an explicit
/// remote cancel; this function never aborts the underlying operation.
///
/// # Arguments
///
/// * `pending` - The in-flight operation, polled across quanta
/// * `poll_interval` - Length of one poll quantum
/// * `cancel` - Token checked at each quantum boundary
pub async fn bounded_wait<F>(
    pending: &mut F,
    poll_interval: Duration,
    cancel: &CancellationToken,
) -> WaitOutcome<F::Output>
where
    F: Future + Unpin,
{
    loop {
        match timeout(poll_interval, &mut *pending).await {
            Ok(value) => return WaitOutcome::Ready(value),
            Err(_) => {
                if cancel.is_cancelled() {
                    return WaitOutcome::Cancelled;
                }
            }
        }
    }
}
