//! Navigation delegation module
//!
//! The [`NavigationClient`] trait abstracts the remote navigation action
//! host: submit a stamped world-frame target, observe an out-of-band
//! terminal status, optionally request cancellation. [`Navigator`] wraps a
//! client for one search run and enforces the single-outstanding-operation
//! discipline: the controller never submits a second move before the first
//! resolves, and an explicit remote cancel is sent at most once.

use std::fmt;
use std::sync::Arc;
use std::time::{Duration, SystemTime};

use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use crate::coord::{MapPoint, MAP_FRAME};
use crate::wait::{bounded_wait, WaitOutcome};

/// Identifier of one navigation operation, unique per client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NavId(pub u64);

impl fmt::Display for NavId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A stamped navigation target in the world frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NavGoal {
    pub target: MapPoint,
    pub frame: &'static str,
    pub stamp: SystemTime,
}

impl NavGoal {
    /// Builds a goal for `target` in the fixed world frame, stamped now.
    pub fn to_target(target: MapPoint) -> Self {
        Self {
            target,
            frame: MAP_FRAME,
            stamp: SystemTime::now(),
        }
    }
}

/// Status of a navigation operation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum NavStatus {
    /// The operation is still executing.
    #[default]
    Active,

    /// The agent reached the target.
    Succeeded,

    /// The operation ended without reaching the target.
    Failed,

    /// The operation ended because cancellation was requested.
    Cancelled,
}

impl NavStatus {
    /// Returns true once the operation has finished, for any reason.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Active)
    }

    /// Returns true if the agent reached the target.
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Succeeded)
    }
}

impl fmt::Display for NavStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Active => write!(f, "Active"),
            Self::Succeeded => write!(f, "Succeeded"),
            Self::Failed => write!(f, "Failed"),
            Self::Cancelled => write!(f, "Cancelled"),
        }
    }
}

/// Handle to one accepted navigation operation.
///
/// Cloneable; all clones observe the same status channel.
#[derive(Debug, Clone)]
pub struct NavHandle {
    id: NavId,
    status: watch::Receiver<NavStatus>,
}

impl NavHandle {
    pub fn new(id: NavId, status: watch::Receiver<NavStatus>) -> Self {
        Self { id, status }
    }

    /// Returns the operation's identifier.
    pub fn id(&self) -> NavId {
        self.id
    }

    /// Returns the most recently observed status without waiting.
    pub fn status(&self) -> NavStatus {
        *self.status.borrow()
    }

    /// Waits until the operation reaches a terminal status.
    ///
    /// A closed status channel reads as [`NavStatus::Failed`]: the
    /// collaborator vanished mid-move.
    pub async fn terminal_status(&mut self) -> NavStatus {
        loop {
            let current = *self.status.borrow();
            if current.is_terminal() {
                return current;
            }
            if self.status.changed().await.is_err() {
                return NavStatus::Failed;
            }
        }
    }
}

/// Trait for the remote navigation action host.
pub trait NavigationClient: Send + Sync {
    /// Whether the action host is currently reachable.
    fn is_available(&self) -> bool;

    /// Submits a goal. `None` means the host rejected it outright; `Some`
    /// carries the handle tracking the accepted operation.
    fn submit(&self, goal: NavGoal) -> Option<NavHandle>;

    /// Best-effort cancel of an accepted operation. The definitive outcome
    /// still arrives through the operation's status channel.
    fn cancel(&self, id: NavId);
}

/// Result of handing a target to the navigation host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavSubmission {
    /// The host accepted the goal; the delegate now tracks it.
    Accepted,
    /// The host rejected the goal.
    Rejected,
}

/// Drives navigation for one search run.
///
/// Holds at most one outstanding operation. On a cancelled wait the
/// operation stays tracked so [`Navigator::cancel_active`] can issue the
/// explicit remote cancel exactly once.
pub struct Navigator {
    client: Arc<dyn NavigationClient>,
    poll_interval: Duration,
    active: Option<NavHandle>,
}

impl Navigator {
    pub fn new(client: Arc<dyn NavigationClient>, poll_interval: Duration) -> Self {
        Self {
            client,
            poll_interval,
            active: None,
        }
    }

    /// Whether the navigation host is reachable.
    pub fn is_available(&self) -> bool {
        self.client.is_available()
    }

    /// Submits a move to `target`, stamped now, in the world frame.
    pub fn submit(&mut self, target: MapPoint) -> NavSubmission {
        let goal = NavGoal::to_target(target);
        info!(x = target.x, y = target.y, frame = goal.frame, "Submitting navigation goal");

        match self.client.submit(goal) {
            Some(handle) => {
                debug!(nav_id = %handle.id(), "Navigation goal accepted");
                self.active = Some(handle);
                NavSubmission::Accepted
            }
            None => {
                warn!("Navigation goal rejected");
                NavSubmission::Rejected
            }
        }
    }

    /// Waits for the outstanding operation to reach a terminal status.
    ///
    /// Polls in `poll_interval` quanta and checks `cancel` between quanta.
    /// `Ready` carries the terminal status and clears the outstanding slot;
    /// `Cancelled` leaves the operation tracked for [`Navigator::cancel_active`].
    pub async fn await_completion(&mut self, cancel: &CancellationToken) -> WaitOutcome<NavStatus> {
        let Some(handle) = self.active.clone() else {
            error!("await_completion called without an outstanding operation");
            return WaitOutcome::Ready(NavStatus::Failed);
        };

        let mut pending = Box::pin(async move {
            let mut handle = handle;
            handle.terminal_status().await
        });

        match bounded_wait(&mut pending, self.poll_interval, cancel).await {
            WaitOutcome::Ready(status) => {
                debug!(status = %status, "Navigation goal finished");
                self.active = None;
                WaitOutcome::Ready(status)
            }
            WaitOutcome::Cancelled => WaitOutcome::Cancelled,
        }
    }

    /// Sends one explicit cancel for the outstanding operation, if any.
    ///
    /// Best-effort: the host may already have finished the move. The
    /// outstanding slot is cleared either way, so repeated calls cancel
    /// nothing twice.
    pub fn cancel_active(&mut self) {
        if let Some(handle) = self.active.take() {
            info!(nav_id = %handle.id(), "Cancelling outstanding navigation goal");
            self.client.cancel(handle.id());
        }
    }
}
