//! Goal lifecycle module
//!
//! Exposes the search as a long-running, cancellable goal. [`SearchServer`]
//! accepts every submission and runs each goal on its own task;
//! [`GoalHandle`] is the client-side observer carrying the goal's state
//! channel and its cancellation token.
//!
//! Each goal reaches exactly one terminal state. The terminal notification
//! carries no failure detail; causes are logged where they occur, so the
//! observable surface stays a bare Succeeded / Cancelled / Aborted.
//!
//! # Example
//!
//! ```ignore
//! let server = SearchServer::new(pose, elevation, navigation, config);
//! let mut handle = server.submit(SearchRequest);
//!
//! // Request cooperative cancellation at any time:
//! handle.cancel();
//!
//! let terminal = handle.wait_terminal().await;
//! ```

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

use crate::nav::NavigationClient;
use crate::pose::PoseSource;
use crate::sampler::ElevationService;
use crate::search::{SearchConfig, SearchController, SearchOutcome};

/// Identifier of one accepted search goal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GoalId(u64);

impl fmt::Display for GoalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Observable state of a search goal.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GoalState {
    /// The search run is in progress.
    Executing,

    /// Cancellation was requested and the run has not yet reached its next
    /// poll point. Observed state only, never sent on the channel.
    CancelRequested,

    /// Terminal: the agent parked at a local maximum.
    Succeeded,

    /// Terminal: the run stopped at a poll point after cancellation.
    Cancelled,

    /// Terminal: a collaborator failed or the run panicked.
    Aborted,
}

impl GoalState {
    /// Returns true once the goal has finished, for any reason.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Succeeded | Self::Cancelled | Self::Aborted)
    }

    /// Returns true if the goal finished at a peak.
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Succeeded)
    }
}

impl fmt::Display for GoalState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Executing => write!(f, "Executing"),
            Self::CancelRequested => write!(f, "CancelRequested"),
            Self::Succeeded => write!(f, "Succeeded"),
            Self::Cancelled => write!(f, "Cancelled"),
            Self::Aborted => write!(f, "Aborted"),
        }
    }
}

/// Parameters of a search goal.
///
/// The search takes none; the type keeps the submission surface explicit
/// and leaves room for future knobs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SearchRequest;

/// Client-side observer of one goal.
///
/// Cloneable; all clones observe the same goal and share its cancellation
/// token.
#[derive(Clone)]
pub struct GoalHandle {
    id: GoalId,
    state: watch::Receiver<GoalState>,
    cancel: CancellationToken,
}

impl GoalHandle {
    /// Returns the goal's identifier.
    pub fn id(&self) -> GoalId {
        self.id
    }

    /// Current observable state.
    ///
    /// Between a cancellation request and the run's next poll point this
    /// reads [`GoalState::CancelRequested`]; a terminal state is never
    /// masked.
    pub fn state(&self) -> GoalState {
        let state = *self.state.borrow();
        if !state.is_terminal() && self.cancel.is_cancelled() {
            GoalState::CancelRequested
        } else {
            state
        }
    }

    /// Requests cooperative cancellation.
    ///
    /// Always honored: the run stops at its next poll point, which is at
    /// most one poll quantum away. Dispatched remote calls are not aborted;
    /// an outstanding move receives one explicit navigation cancel.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    /// Waits for the goal's terminal state.
    ///
    /// A closed state channel means the goal task died without reporting;
    /// it reads as [`GoalState::Aborted`].
    pub async fn wait_terminal(&mut self) -> GoalState {
        loop {
            let current = *self.state.borrow();
            if current.is_terminal() {
                return current;
            }
            if self.state.changed().await.is_err() {
                return GoalState::Aborted;
            }
        }
    }
}

impl fmt::Debug for GoalHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GoalHandle")
            .field("id", &self.id)
            .field("state", &self.state())
            .finish()
    }
}

/// Accepts search goals and runs each on its own task.
///
/// Collaborator handles are shared across goals. Nothing serializes
/// concurrent goals against the same backends; submitting a second goal
/// while one is active races both against the same collaborators.
pub struct SearchServer {
    pose: Arc<dyn PoseSource>,
    elevation: Arc<dyn ElevationService>,
    navigation: Arc<dyn NavigationClient>,
    config: SearchConfig,
    shutdown: CancellationToken,
    next_goal: AtomicU64,
}

impl SearchServer {
    pub fn new(
        pose: Arc<dyn PoseSource>,
        elevation: Arc<dyn ElevationService>,
        navigation: Arc<dyn NavigationClient>,
        config: SearchConfig,
    ) -> Self {
        Self {
            pose,
            elevation,
            navigation,
            config,
            shutdown: CancellationToken::new(),
            next_goal: AtomicU64::new(1),
        }
    }

    /// Accepts a goal and starts executing it immediately.
    ///
    /// Always accepts; there is no admission control. Returns without
    /// waiting on search progress. Each goal's cancellation token is a
    /// child of the server's shutdown token, so shutdown reads as
    /// cancellation inside the run.
    pub fn submit(&self, _request: SearchRequest) -> GoalHandle {
        let id = GoalId(self.next_goal.fetch_add(1, Ordering::SeqCst));
        let cancel = self.shutdown.child_token();
        let (state_tx, state_rx) = watch::channel(GoalState::Executing);

        let controller = SearchController::new(
            Arc::clone(&self.pose),
            Arc::clone(&self.elevation),
            Arc::clone(&self.navigation),
            self.config.clone(),
        );

        let run_cancel = cancel.clone();
        tokio::spawn(async move {
            info!(goal = %id, "Search goal accepted");

            // The run gets its own task so a panic surfaces as a JoinError
            // here instead of killing the goal task silently.
            let run = tokio::spawn(controller.run(run_cancel));
            let state = match run.await {
                Ok(SearchOutcome::Succeeded { peak }) => {
                    info!(goal = %id, x = peak.x, y = peak.y, "Search goal succeeded");
                    GoalState::Succeeded
                }
                Ok(SearchOutcome::Cancelled) => {
                    info!(goal = %id, "Search goal cancelled");
                    GoalState::Cancelled
                }
                Ok(SearchOutcome::Aborted) => {
                    info!(goal = %id, "Search goal aborted");
                    GoalState::Aborted
                }
                Err(join_error) => {
                    error!(goal = %id, error = %join_error, "Search run panicked");
                    GoalState::Aborted
                }
            };

            // The goal's single terminal transition. Receivers may already
            // be gone; that loses nothing.
            let _ = state_tx.send(state);
        });

        GoalHandle {
            id,
            state: state_rx,
            cancel,
        }
    }

    /// Cancels the server's root token.
    ///
    /// Every active goal observes it as cancellation at its next poll
    /// point. Goals submitted afterwards start already cancelled and stop
    /// at their first poll point.
    pub fn shutdown(&self) {
        info!("Shutting down search server");
        self.shutdown.cancel();
    }
}
