//! Simulated collaborators
//!
//! In-process stand-ins for the three remote collaborators, used by the
//! CLI and integration tests to drive the full search stack without a
//! robot: a synthetic elevation field built from Gaussian hills, a pose
//! source tracking the simulated agent, and a navigation host that
//! teleports the agent to the target when a move completes.
//!
//! Latencies are configurable. With zero latency every remote call
//! completes at dispatch, which keeps unit tests fast; nonzero latencies
//! exercise the bounded waits and the cancellation paths for real.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::sync::watch;
use tokio::time::sleep;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::coord::MapPoint;
use crate::nav::{NavGoal, NavHandle, NavId, NavStatus, NavigationClient};
use crate::pose::{PoseError, PoseSource};
use crate::sampler::{ElevationService, PendingSample, SampleRequest, SampleResponse};

/// One Gaussian component of the simulated elevation field.
#[derive(Debug, Clone, Copy)]
pub struct Hill {
    pub center: MapPoint,
    pub amplitude: f64,
    pub spread: f64,
}

impl Hill {
    /// Field contribution at `(x, y)`.
    fn value_at(&self, x: f64, y: f64) -> f64 {
        let dx = x - self.center.x;
        let dy = y - self.center.y;
        self.amplitude * (-(dx * dx + dy * dy) / (2.0 * self.spread * self.spread)).exp()
    }
}

/// Configuration for a simulated world.
#[derive(Debug, Clone)]
pub struct SimConfig {
    /// Where the agent starts.
    pub start: MapPoint,

    /// Gaussian hills summed into the elevation field.
    pub hills: Vec<Hill>,

    /// Delay before a sample request is answered.
    pub sample_latency: Duration,

    /// How long a simulated move takes.
    pub move_duration: Duration,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            start: MapPoint::new(0.0, 0.0),
            hills: Vec::new(),
            sample_latency: Duration::ZERO,
            move_duration: Duration::ZERO,
        }
    }
}

/// A simulated world implementing all three collaborator traits.
///
/// Share one `Arc<SimWorld>` as the pose source, elevation service and
/// navigation client of a search stack.
pub struct SimWorld {
    hills: Vec<Hill>,
    sample_latency: Duration,
    move_duration: Duration,
    service_ready: AtomicBool,
    nav_available: AtomicBool,
    samples: AtomicU64,
    next_nav: AtomicU64,
    agent: Arc<Mutex<MapPoint>>,
    moves: Arc<Mutex<HashMap<u64, CancellationToken>>>,
}

impl SimWorld {
    pub fn new(config: SimConfig) -> Arc<Self> {
        Arc::new(Self {
            hills: config.hills,
            sample_latency: config.sample_latency,
            move_duration: config.move_duration,
            service_ready: AtomicBool::new(true),
            nav_available: AtomicBool::new(true),
            samples: AtomicU64::new(0),
            next_nav: AtomicU64::new(1),
            agent: Arc::new(Mutex::new(config.start)),
            moves: Arc::new(Mutex::new(HashMap::new())),
        })
    }

    /// Current position of the simulated agent.
    pub fn agent_position(&self) -> MapPoint {
        *self.agent.lock()
    }

    /// Elevation of the synthetic field at `(x, y)`.
    pub fn field_value(&self, x: f64, y: f64) -> f64 {
        self.hills.iter().map(|hill| hill.value_at(x, y)).sum()
    }

    /// Number of sample requests the service has received.
    pub fn sample_count(&self) -> u64 {
        self.samples.load(Ordering::SeqCst)
    }

    /// Number of navigation goals the host has received.
    pub fn move_count(&self) -> u64 {
        self.next_nav.load(Ordering::SeqCst) - 1
    }

    /// Scripts the elevation service's reachability probe.
    pub fn set_service_ready(&self, ready: bool) {
        self.service_ready.store(ready, Ordering::SeqCst);
    }

    /// Scripts the navigation host's reachability probe.
    pub fn set_nav_available(&self, available: bool) {
        self.nav_available.store(available, Ordering::SeqCst);
    }
}

impl ElevationService for SimWorld {
    fn is_ready(&self) -> bool {
        self.service_ready.load(Ordering::SeqCst)
    }

    fn request(&self, req: SampleRequest) -> PendingSample {
        self.samples.fetch_add(1, Ordering::SeqCst);
        let (tx, pending) = PendingSample::channel();
        let response = SampleResponse {
            success: true,
            elevation: self.field_value(req.x, req.y),
        };

        if self.sample_latency.is_zero() {
            let _ = tx.send(response);
        } else {
            let latency = self.sample_latency;
            tokio::spawn(async move {
                sleep(latency).await;
                let _ = tx.send(response);
            });
        }

        pending
    }
}

impl PoseSource for SimWorld {
    fn can_lookup(&self, _source: &str, _target: &str) -> bool {
        true
    }

    fn lookup(&self, _source: &str, _target: &str) -> Result<MapPoint, PoseError> {
        Ok(self.agent_position())
    }
}

impl NavigationClient for SimWorld {
    fn is_available(&self) -> bool {
        self.nav_available.load(Ordering::SeqCst)
    }

    fn submit(&self, goal: NavGoal) -> Option<NavHandle> {
        let id = NavId(self.next_nav.fetch_add(1, Ordering::SeqCst));
        let (tx, rx) = watch::channel(NavStatus::Active);

        if self.move_duration.is_zero() {
            *self.agent.lock() = goal.target;
            let _ = tx.send(NavStatus::Succeeded);
            debug!(nav_id = %id, x = goal.target.x, y = goal.target.y, "Simulated move complete");
            return Some(NavHandle::new(id, rx));
        }

        let cancel = CancellationToken::new();
        self.moves.lock().insert(id.0, cancel.clone());

        let agent = Arc::clone(&self.agent);
        let moves = Arc::clone(&self.moves);
        let duration = self.move_duration;
        let target = goal.target;
        tokio::spawn(async move {
            tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    debug!(nav_id = %id, "Simulated move cancelled");
                    let _ = tx.send(NavStatus::Cancelled);
                }
                _ = sleep(duration) => {
                    *agent.lock() = target;
                    debug!(nav_id = %id, x = target.x, y = target.y, "Simulated move complete");
                    let _ = tx.send(NavStatus::Succeeded);
                }
            }
            moves.lock().remove(&id.0);
        });

        Some(NavHandle::new(id, rx))
    }

    fn cancel(&self, id: NavId) {
        if let Some(token) = self.moves.lock().get(&id.0) {
            token.cancel();
        }
    }
}
