//! Elevation sampling module
//!
//! The [`ElevationService`] trait abstracts the remote scalar-field service:
//! one request in, one `{success, elevation}` reply out. [`ElevationSampler`]
//! sits on top of it and turns a single attempt into a classified
//! [`SampleOutcome`], driving the reply through the bounded cancellable wait
//! so a hung service never wedges a search run past its cancellation.
//!
//! Requests are never retried here. A failed or abandoned reply is reported
//! upward and the whole run aborts; issuing a new goal is the recovery path.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::sync::oneshot;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::coord::MapPoint;
use crate::wait::{bounded_wait, WaitOutcome};

/// Wire request for one elevation sample, in world-frame meters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SampleRequest {
    pub x: f64,
    pub y: f64,
}

/// Wire response for one elevation sample.
///
/// When `success` is false the service could not produce a reading and
/// `elevation` carries no meaning.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SampleResponse {
    pub success: bool,
    pub elevation: f64,
}

/// A successful reading of the field at a specific position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ElevationSample {
    pub position: MapPoint,
    pub value: f64,
}

/// An in-flight sample request.
///
/// Resolves when the service replies. A dropped reply channel resolves to
/// an error rather than hanging, so transport loss is observable.
pub struct PendingSample {
    rx: oneshot::Receiver<SampleResponse>,
}

impl PendingSample {
    /// Creates the pending handle together with the sender half a service
    /// implementation answers on.
    pub fn channel() -> (oneshot::Sender<SampleResponse>, PendingSample) {
        let (tx, rx) = oneshot::channel();
        (tx, PendingSample { rx })
    }
}

impl Future for PendingSample {
    type Output = Result<SampleResponse, oneshot::error::RecvError>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        Pin::new(&mut self.get_mut().rx).poll(cx)
    }
}

/// Trait for the remote elevation service.
///
/// Implementations dispatch one request per call and answer on the returned
/// pending handle. Dispatch must not block; slow replies are absorbed by the
/// caller's bounded wait.
pub trait ElevationService: Send + Sync {
    /// Whether the service endpoint is currently reachable.
    fn is_ready(&self) -> bool;

    /// Dispatches a single sample request.
    fn request(&self, req: SampleRequest) -> PendingSample;
}

/// Outcome of one sample attempt.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SampleOutcome {
    /// The service reported success with this elevation value.
    Value(f64),
    /// The service reported failure, or the transport abandoned the request.
    ServiceFailure,
    /// Cancellation was observed while waiting for the reply.
    Cancelled,
}

/// Issues elevation sample requests and classifies their outcomes.
pub struct ElevationSampler {
    service: Arc<dyn ElevationService>,
    poll_interval: Duration,
}

impl ElevationSampler {
    pub fn new(service: Arc<dyn ElevationService>, poll_interval: Duration) -> Self {
        Self {
            service,
            poll_interval,
        }
    }

    /// Whether the underlying service is reachable.
    pub fn is_ready(&self) -> bool {
        self.service.is_ready()
    }

    /// Samples the field at `position`.
    ///
    /// Issues exactly one request. The reply wait checks `cancel` at every
    /// poll quantum; on cancellation the request is simply abandoned, there
    /// is no sample-level remote cancel.
    pub async fn sample(&self, position: MapPoint, cancel: &CancellationToken) -> SampleOutcome {
        debug!(x = position.x, y = position.y, "Requesting elevation sample");

        let mut pending = self.service.request(SampleRequest {
            x: position.x,
            y: position.y,
        });

        match bounded_wait(&mut pending, self.poll_interval, cancel).await {
            WaitOutcome::Ready(Ok(response)) if response.success => {
                debug!(
                    x = position.x,
                    y = position.y,
                    elevation = response.elevation,
                    "Elevation sample received"
                );
                SampleOutcome::Value(response.elevation)
            }
            WaitOutcome::Ready(Ok(_)) => {
                warn!(
                    x = position.x,
                    y = position.y,
                    "Elevation service reported failure"
                );
                SampleOutcome::ServiceFailure
            }
            WaitOutcome::Ready(Err(_)) => {
                warn!(
                    x = position.x,
                    y = position.y,
                    "Elevation service dropped the request"
                );
                SampleOutcome::ServiceFailure
            }
            WaitOutcome::Cancelled => SampleOutcome::Cancelled,
        }
    }
}
