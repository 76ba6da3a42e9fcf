//! Hill-climb search module
//!
//! Drives the agent to a local maximum of the remotely sampled elevation
//! field. Each iteration samples the current position plus a fixed ring of
//! candidates, then either declares convergence or delegates one move to
//! the navigation host and waits it out.
//!
//! # Architecture
//!
//! ```ignore
//! CheckPreconditions
//!        |
//!        v
//! +-> SampleCurrent -> SampleCandidates -> Evaluate -+-> Converged (Succeeded)
//! |                                                  |
//! +------------------- Move <-----------------------+
//! ```
//!
//! Cancellation is cooperative: the token is checked at the top of every
//! iteration and at every poll quantum inside a remote wait. Any
//! collaborator failure aborts the run; nothing is retried, a new goal is
//! the recovery path.

mod candidates;

pub use candidates::probe_ring;

use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info};

use crate::coord::{MapPoint, BODY_FRAME, MAP_FRAME};
use crate::nav::{NavSubmission, NavigationClient, Navigator};
use crate::pose::{PoseError, PoseSource};
use crate::sampler::{ElevationSample, ElevationSampler, ElevationService, SampleOutcome};
use crate::wait::WaitOutcome;

/// Default number of ring candidates per iteration.
pub const DEFAULT_PROBE_COUNT: usize = 8;

/// Default ring radius in meters.
pub const DEFAULT_PROBE_RADIUS: f64 = 0.1;

/// Default poll quantum for remote waits.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Tuning knobs for one search run.
#[derive(Debug, Clone)]
pub struct SearchConfig {
    /// Number of candidates probed around the agent each iteration.
    /// Treated as at least 1.
    pub probe_count: usize,

    /// Distance from the agent to each candidate, in meters.
    pub probe_radius: f64,

    /// Poll quantum for every bounded remote wait. Bounds cancellation
    /// latency.
    pub poll_interval: Duration,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            probe_count: DEFAULT_PROBE_COUNT,
            probe_radius: DEFAULT_PROBE_RADIUS,
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }
}

/// Reasons a search run aborts.
#[derive(Debug, Error)]
pub enum SearchError {
    /// Precondition: the elevation service endpoint is unreachable.
    #[error("elevation service unavailable")]
    SamplerUnavailable,

    /// Precondition: the agent pose cannot be resolved.
    #[error("agent pose unavailable")]
    PoseUnavailable,

    /// Precondition: the navigation action host is unreachable.
    #[error("navigation host unavailable")]
    NavigatorUnavailable,

    /// A mid-run pose lookup failed.
    #[error(transparent)]
    Pose(#[from] PoseError),

    /// The elevation service failed to produce a sample.
    #[error("elevation sample failed at ({x:.3}, {y:.3})")]
    SampleFailed { x: f64, y: f64 },

    /// The navigation host rejected a submitted target.
    #[error("navigation goal rejected")]
    NavigationRejected,

    /// A move finished without reaching its target.
    #[error("navigation failed")]
    NavigationFailed,
}

/// Terminal outcome of one search run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SearchOutcome {
    /// The agent is parked at a local maximum.
    Succeeded { peak: MapPoint },

    /// Cancellation was observed at a poll point before convergence.
    Cancelled,

    /// A collaborator failed; the specific cause is in the log.
    Aborted,
}

/// One-shot hill-climb controller.
///
/// Owns its collaborator handles for the duration of a single run. All
/// steps within the run are strictly sequential; the only suspension
/// points are the bounded waits on remote calls.
pub struct SearchController {
    pose: Arc<dyn PoseSource>,
    sampler: ElevationSampler,
    navigator: Navigator,
    config: SearchConfig,
}

impl SearchController {
    pub fn new(
        pose: Arc<dyn PoseSource>,
        elevation: Arc<dyn ElevationService>,
        navigation: Arc<dyn NavigationClient>,
        config: SearchConfig,
    ) -> Self {
        let sampler = ElevationSampler::new(elevation, config.poll_interval);
        let navigator = Navigator::new(navigation, config.poll_interval);
        Self {
            pose,
            sampler,
            navigator,
            config,
        }
    }

    /// Runs the search to a terminal outcome.
    ///
    /// Consumes the controller: a run is one-shot, and a new goal builds a
    /// new controller. Failures are logged here and reported as
    /// [`SearchOutcome::Aborted`].
    pub async fn run(mut self, cancel: CancellationToken) -> SearchOutcome {
        match self.run_inner(&cancel).await {
            Ok(outcome) => outcome,
            Err(error) => {
                error!(%error, "Search aborted");
                SearchOutcome::Aborted
            }
        }
    }

    async fn run_inner(
        &mut self,
        cancel: &CancellationToken,
    ) -> Result<SearchOutcome, SearchError> {
        self.check_preconditions()?;

        loop {
            // Cooperative cancellation point; also where server shutdown is
            // observed, since goal tokens are children of the root token.
            if cancel.is_cancelled() {
                info!("Search cancelled");
                return Ok(SearchOutcome::Cancelled);
            }

            info!("Getting current position");
            let position = self.pose.lookup(MAP_FRAME, BODY_FRAME)?;

            info!("Sampling current elevation");
            let current = match self.sampler.sample(position, cancel).await {
                SampleOutcome::Value(value) => value,
                SampleOutcome::Cancelled => {
                    info!("Search cancelled");
                    return Ok(SearchOutcome::Cancelled);
                }
                SampleOutcome::ServiceFailure => {
                    return Err(SearchError::SampleFailed {
                        x: position.x,
                        y: position.y,
                    })
                }
            };
            info!(elevation = current, "Current elevation");

            let ring = probe_ring(
                position,
                self.config.probe_count.max(1),
                self.config.probe_radius,
            );

            info!("Sampling nearby elevations");
            let mut samples = Vec::with_capacity(ring.len());
            for candidate in &ring {
                match self.sampler.sample(*candidate, cancel).await {
                    SampleOutcome::Value(value) => samples.push(ElevationSample {
                        position: *candidate,
                        value,
                    }),
                    SampleOutcome::Cancelled => {
                        info!("Search cancelled");
                        return Ok(SearchOutcome::Cancelled);
                    }
                    SampleOutcome::ServiceFailure => {
                        return Err(SearchError::SampleFailed {
                            x: candidate.x,
                            y: candidate.y,
                        })
                    }
                }
            }
            // One sample per candidate.
            debug_assert_eq!(samples.len(), ring.len());

            let values: Vec<f64> = samples.iter().map(|s| s.value).collect();
            info!(elevations = ?values, "Elevations collected");

            // Leftmost strict maximum: a later tie never displaces an
            // earlier winner, which keeps tie-breaking deterministic.
            let mut best_index = 0;
            for (index, sample) in samples.iter().enumerate() {
                if sample.value > samples[best_index].value {
                    best_index = index;
                }
            }
            let best = samples[best_index];
            info!(elevation = best.value, "Max elevation");

            if best.value <= current {
                info!(x = position.x, y = position.y, "At peak");
                return Ok(SearchOutcome::Succeeded { peak: position });
            }

            info!("Moving to new position");
            if self.navigator.submit(best.position) == NavSubmission::Rejected {
                return Err(SearchError::NavigationRejected);
            }

            match self.navigator.await_completion(cancel).await {
                WaitOutcome::Ready(status) if status.is_success() => {
                    debug!("Move complete");
                }
                WaitOutcome::Ready(_) => return Err(SearchError::NavigationFailed),
                WaitOutcome::Cancelled => {
                    self.navigator.cancel_active();
                    info!("Search cancelled during move");
                    return Ok(SearchOutcome::Cancelled);
                }
            }
        }
    }

    /// Checks collaborator availability before any remote sampling.
    ///
    /// Order matters and is observable: the first unavailable collaborator
    /// is the one reported, and no remote calls are issued on failure.
    fn check_preconditions(&self) -> Result<(), SearchError> {
        if !self.sampler.is_ready() {
            error!("Elevation service must be available to run a search");
            return Err(SearchError::SamplerUnavailable);
        }
        if !self.pose.can_lookup(MAP_FRAME, BODY_FRAME) {
            error!("Agent position cannot be looked up");
            return Err(SearchError::PoseUnavailable);
        }
        if !self.navigator.is_available() {
            error!("Navigation action must be available to run a search");
            return Err(SearchError::NavigatorUnavailable);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nav::{NavGoal, NavHandle, NavId, NavStatus};
    use crate::sampler::{PendingSample, SampleRequest, SampleResponse};
    use parking_lot::Mutex;
    use std::collections::VecDeque;
    use std::sync::atomic::{AtomicU64, Ordering};
    use tokio::sync::{oneshot, watch};
    use tokio::time::sleep;

    const TEST_POLL: Duration = Duration::from_millis(10);
    const TAU_EIGHTH: f64 = std::f64::consts::TAU / 8.0;

    fn test_config() -> SearchConfig {
        SearchConfig {
            poll_interval: TEST_POLL,
            ..SearchConfig::default()
        }
    }

    /// One scripted reply per expected sample request, in request order.
    enum Reply {
        Value(f64),
        Failure,
        /// Keep the reply channel open and never answer.
        Hold,
    }

    struct ScriptedElevation {
        ready: bool,
        script: Mutex<VecDeque<Reply>>,
        requests: Mutex<Vec<SampleRequest>>,
        held: Mutex<Vec<oneshot::Sender<SampleResponse>>>,
    }

    impl ScriptedElevation {
        fn with_readiness(ready: bool, script: Vec<Reply>) -> Arc<Self> {
            Arc::new(Self {
                ready,
                script: Mutex::new(script.into()),
                requests: Mutex::new(Vec::new()),
                held: Mutex::new(Vec::new()),
            })
        }

        fn new(script: Vec<Reply>) -> Arc<Self> {
            Self::with_readiness(true, script)
        }

        fn unavailable() -> Arc<Self> {
            Self::with_readiness(false, Vec::new())
        }

        fn request_count(&self) -> usize {
            self.requests.lock().len()
        }
    }

    impl ElevationService for ScriptedElevation {
        fn is_ready(&self) -> bool {
            self.ready
        }

        fn request(&self, req: SampleRequest) -> PendingSample {
            self.requests.lock().push(req);
            let (tx, pending) = PendingSample::channel();

            match self.script.lock().pop_front() {
                Some(Reply::Value(elevation)) => {
                    let _ = tx.send(SampleResponse {
                        success: true,
                        elevation,
                    });
                }
                Some(Reply::Failure) => {
                    let _ = tx.send(SampleResponse {
                        success: false,
                        elevation: 0.0,
                    });
                }
                Some(Reply::Hold) => self.held.lock().push(tx),
                None => {} // sender drops, reads as transport failure
            }

            pending
        }
    }

    /// How the mock navigation host treats each submitted goal.
    #[derive(Clone, Copy)]
    enum NavBehavior {
        Succeed,
        Fail,
        Reject,
        /// Accept and leave the operation Active forever.
        Hang,
    }

    struct ScriptedNav {
        available: bool,
        behavior: NavBehavior,
        next_id: AtomicU64,
        submitted: Mutex<Vec<NavGoal>>,
        cancelled: Mutex<Vec<NavId>>,
        senders: Mutex<Vec<watch::Sender<NavStatus>>>,
    }

    impl ScriptedNav {
        fn new(behavior: NavBehavior) -> Arc<Self> {
            Arc::new(Self {
                available: true,
                behavior,
                next_id: AtomicU64::new(1),
                submitted: Mutex::new(Vec::new()),
                cancelled: Mutex::new(Vec::new()),
                senders: Mutex::new(Vec::new()),
            })
        }

        fn unavailable() -> Arc<Self> {
            Arc::new(Self {
                available: false,
                behavior: NavBehavior::Succeed,
                next_id: AtomicU64::new(1),
                submitted: Mutex::new(Vec::new()),
                cancelled: Mutex::new(Vec::new()),
                senders: Mutex::new(Vec::new()),
            })
        }
    }

    impl NavigationClient for ScriptedNav {
        fn is_available(&self) -> bool {
            self.available
        }

        fn submit(&self, goal: NavGoal) -> Option<NavHandle> {
            self.submitted.lock().push(goal);
            if matches!(self.behavior, NavBehavior::Reject) {
                return None;
            }

            let id = NavId(self.next_id.fetch_add(1, Ordering::SeqCst));
            let (tx, rx) = watch::channel(NavStatus::Active);
            match self.behavior {
                NavBehavior::Succeed => {
                    let _ = tx.send(NavStatus::Succeeded);
                }
                NavBehavior::Fail => {
                    let _ = tx.send(NavStatus::Failed);
                }
                NavBehavior::Hang => {}
                NavBehavior::Reject => unreachable!(),
            }
            self.senders.lock().push(tx);
            Some(NavHandle::new(id, rx))
        }

        fn cancel(&self, id: NavId) {
            self.cancelled.lock().push(id);
        }
    }

    struct StaticPose {
        can: bool,
        position: MapPoint,
    }

    impl StaticPose {
        fn at(x: f64, y: f64) -> Arc<Self> {
            Arc::new(Self {
                can: true,
                position: MapPoint::new(x, y),
            })
        }

        fn unavailable() -> Arc<Self> {
            Arc::new(Self {
                can: false,
                position: MapPoint::new(0.0, 0.0),
            })
        }
    }

    impl PoseSource for StaticPose {
        fn can_lookup(&self, _source: &str, _target: &str) -> bool {
            self.can
        }

        fn lookup(&self, _source: &str, _target: &str) -> Result<MapPoint, PoseError> {
            if self.can {
                Ok(self.position)
            } else {
                Err(PoseError::TransformUnavailable {
                    from_frame: MAP_FRAME.to_string(),
                    to_frame: BODY_FRAME.to_string(),
                })
            }
        }
    }

    /// Passes the precondition probe but fails every actual lookup.
    struct FailingLookupPose;

    impl PoseSource for FailingLookupPose {
        fn can_lookup(&self, _source: &str, _target: &str) -> bool {
            true
        }

        fn lookup(&self, _source: &str, _target: &str) -> Result<MapPoint, PoseError> {
            Err(PoseError::LookupFailed(
                "transform backend went away".to_string(),
            ))
        }
    }

    fn controller(
        pose: Arc<StaticPose>,
        elevation: Arc<ScriptedElevation>,
        nav: Arc<ScriptedNav>,
    ) -> SearchController {
        SearchController::new(pose, elevation, nav, test_config())
    }

    /// Scripts one full iteration: current elevation then the 8 candidates.
    fn iteration(current: f64, ring: [f64; 8]) -> Vec<Reply> {
        let mut script = vec![Reply::Value(current)];
        script.extend(ring.into_iter().map(Reply::Value));
        script
    }

    #[tokio::test]
    async fn test_converges_without_moving_when_ring_is_lower() {
        let elevation = ScriptedElevation::new(iteration(
            5.0,
            [1.0, 2.0, 3.0, 4.0, 4.5, 0.5, 1.5, 5.0],
        ));
        let nav = ScriptedNav::new(NavBehavior::Succeed);
        let ctl = controller(StaticPose::at(2.0, 3.0), elevation.clone(), nav.clone());

        let outcome = ctl.run(CancellationToken::new()).await;

        // Ties with the current elevation count as converged.
        assert_eq!(
            outcome,
            SearchOutcome::Succeeded {
                peak: MapPoint::new(2.0, 3.0)
            }
        );
        assert!(nav.submitted.lock().is_empty(), "No move on convergence");
        assert_eq!(elevation.request_count(), 9);
    }

    #[tokio::test]
    async fn test_moves_to_strict_maximum_exact_position() {
        let mut script = iteration(1.0, [0.0, 0.0, 0.0, 2.0, 0.0, 0.0, 0.0, 0.0]);
        script.extend(iteration(2.0, [0.0; 8]));
        let elevation = ScriptedElevation::new(script);
        let nav = ScriptedNav::new(NavBehavior::Succeed);
        let ctl = controller(StaticPose::at(0.0, 0.0), elevation, nav.clone());

        let outcome = ctl.run(CancellationToken::new()).await;

        assert!(matches!(outcome, SearchOutcome::Succeeded { .. }));
        let submitted = nav.submitted.lock();
        assert_eq!(submitted.len(), 1);

        // Index 3 sits at angle 3 * 45 degrees; the submitted target is the
        // generated candidate, not a recomputed point.
        let expected = MapPoint::new(0.0, 0.0).offset(3.0 * TAU_EIGHTH, 0.1);
        assert_eq!(submitted[0].target, expected);
        assert_eq!(submitted[0].frame, "map");
    }

    #[tokio::test]
    async fn test_tie_between_candidates_picks_lowest_index() {
        for _ in 0..2 {
            let mut script = iteration(1.0, [0.0, 5.0, 0.0, 5.0, 0.0, 0.0, 5.0, 0.0]);
            script.extend(iteration(5.0, [0.0; 8]));
            let elevation = ScriptedElevation::new(script);
            let nav = ScriptedNav::new(NavBehavior::Succeed);
            let ctl = controller(StaticPose::at(0.0, 0.0), elevation, nav.clone());

            let outcome = ctl.run(CancellationToken::new()).await;

            assert!(matches!(outcome, SearchOutcome::Succeeded { .. }));
            let submitted = nav.submitted.lock();
            let expected = MapPoint::new(0.0, 0.0).offset(TAU_EIGHTH, 0.1);
            assert_eq!(
                submitted[0].target, expected,
                "Earliest of the tied candidates must win, deterministically"
            );
        }
    }

    #[tokio::test]
    async fn test_cancel_before_first_iteration_samples_nothing() {
        let elevation = ScriptedElevation::new(iteration(1.0, [0.0; 8]));
        let nav = ScriptedNav::new(NavBehavior::Succeed);
        let ctl = controller(StaticPose::at(0.0, 0.0), elevation.clone(), nav);

        let cancel = CancellationToken::new();
        cancel.cancel();

        let outcome = ctl.run(cancel).await;

        assert_eq!(outcome, SearchOutcome::Cancelled);
        assert_eq!(elevation.request_count(), 0);
    }

    #[tokio::test]
    async fn test_cancel_during_sample_wait_submits_no_move() {
        let elevation = ScriptedElevation::new(vec![Reply::Hold]);
        let nav = ScriptedNav::new(NavBehavior::Succeed);
        let ctl = controller(StaticPose::at(0.0, 0.0), elevation.clone(), nav.clone());

        let cancel = CancellationToken::new();
        let token = cancel.clone();
        tokio::spawn(async move {
            sleep(Duration::from_millis(30)).await;
            token.cancel();
        });

        let outcome = ctl.run(cancel).await;

        assert_eq!(outcome, SearchOutcome::Cancelled);
        assert!(nav.submitted.lock().is_empty());
        assert_eq!(elevation.request_count(), 1);
    }

    #[tokio::test]
    async fn test_cancel_during_move_sends_one_nav_cancel() {
        let elevation =
            ScriptedElevation::new(iteration(1.0, [0.0, 0.0, 2.0, 0.0, 0.0, 0.0, 0.0, 0.0]));
        let nav = ScriptedNav::new(NavBehavior::Hang);
        let ctl = controller(StaticPose::at(0.0, 0.0), elevation, nav.clone());

        let cancel = CancellationToken::new();
        let token = cancel.clone();
        tokio::spawn(async move {
            sleep(Duration::from_millis(40)).await;
            token.cancel();
        });

        let outcome = ctl.run(cancel).await;

        assert_eq!(outcome, SearchOutcome::Cancelled);
        let cancelled = nav.cancelled.lock();
        assert_eq!(cancelled.len(), 1, "Exactly one remote cancel");
        assert_eq!(nav.submitted.lock().len(), 1);
    }

    #[tokio::test]
    async fn test_unavailable_elevation_service_aborts_without_requests() {
        let elevation = ScriptedElevation::unavailable();
        let nav = ScriptedNav::new(NavBehavior::Succeed);
        let ctl = controller(StaticPose::at(0.0, 0.0), elevation.clone(), nav);

        let outcome = ctl.run(CancellationToken::new()).await;

        assert_eq!(outcome, SearchOutcome::Aborted);
        assert_eq!(elevation.request_count(), 0);
    }

    #[tokio::test]
    async fn test_precondition_order_sampler_first() {
        // Everything is down; the sampler check is the one that reports.
        let mut ctl = controller(
            StaticPose::unavailable(),
            ScriptedElevation::unavailable(),
            ScriptedNav::unavailable(),
        );
        let err = ctl
            .run_inner(&CancellationToken::new())
            .await
            .expect_err("preconditions must fail");
        assert!(matches!(err, SearchError::SamplerUnavailable));
    }

    #[tokio::test]
    async fn test_precondition_order_pose_before_navigator() {
        let mut ctl = controller(
            StaticPose::unavailable(),
            ScriptedElevation::new(Vec::new()),
            ScriptedNav::unavailable(),
        );
        let err = ctl
            .run_inner(&CancellationToken::new())
            .await
            .expect_err("preconditions must fail");
        assert!(matches!(err, SearchError::PoseUnavailable));
    }

    #[tokio::test]
    async fn test_lookup_error_after_preconditions_aborts() {
        let elevation = ScriptedElevation::new(iteration(1.0, [0.0; 8]));
        let nav = ScriptedNav::new(NavBehavior::Succeed);
        let mut ctl = SearchController::new(
            Arc::new(FailingLookupPose),
            elevation.clone(),
            nav,
            test_config(),
        );

        let err = ctl
            .run_inner(&CancellationToken::new())
            .await
            .expect_err("lookup failure must surface");
        assert!(matches!(err, SearchError::Pose(_)));
        assert_eq!(elevation.request_count(), 0, "No sampling without a pose");
    }

    #[tokio::test]
    async fn test_lookup_error_maps_to_aborted_outcome() {
        let elevation = ScriptedElevation::new(iteration(1.0, [0.0; 8]));
        let nav = ScriptedNav::new(NavBehavior::Succeed);
        let ctl = SearchController::new(
            Arc::new(FailingLookupPose),
            elevation,
            nav,
            test_config(),
        );

        let outcome = ctl.run(CancellationToken::new()).await;

        assert_eq!(outcome, SearchOutcome::Aborted);
    }

    #[tokio::test]
    async fn test_unavailable_navigator_aborts_before_sampling() {
        let elevation = ScriptedElevation::new(iteration(1.0, [0.0; 8]));
        let ctl = controller(
            StaticPose::at(0.0, 0.0),
            elevation.clone(),
            ScriptedNav::unavailable(),
        );

        let outcome = ctl.run(CancellationToken::new()).await;

        assert_eq!(outcome, SearchOutcome::Aborted);
        assert_eq!(elevation.request_count(), 0);
    }

    #[tokio::test]
    async fn test_sample_failure_aborts_without_retry() {
        let elevation = ScriptedElevation::new(vec![Reply::Value(1.0), Reply::Failure]);
        let nav = ScriptedNav::new(NavBehavior::Succeed);
        let ctl = controller(StaticPose::at(0.0, 0.0), elevation.clone(), nav.clone());

        let outcome = ctl.run(CancellationToken::new()).await;

        assert_eq!(outcome, SearchOutcome::Aborted);
        // Candidate sampling short-circuits at the failure.
        assert_eq!(elevation.request_count(), 2);
        assert!(nav.submitted.lock().is_empty());
    }

    #[tokio::test]
    async fn test_rejected_move_aborts() {
        let elevation =
            ScriptedElevation::new(iteration(1.0, [3.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0]));
        let nav = ScriptedNav::new(NavBehavior::Reject);
        let ctl = controller(StaticPose::at(0.0, 0.0), elevation, nav.clone());

        let outcome = ctl.run(CancellationToken::new()).await;

        assert_eq!(outcome, SearchOutcome::Aborted);
        assert_eq!(nav.submitted.lock().len(), 1);
    }

    #[tokio::test]
    async fn test_failed_move_aborts_without_resampling() {
        let elevation =
            ScriptedElevation::new(iteration(1.0, [3.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0]));
        let nav = ScriptedNav::new(NavBehavior::Fail);
        let ctl = controller(StaticPose::at(0.0, 0.0), elevation.clone(), nav.clone());

        let outcome = ctl.run(CancellationToken::new()).await;

        assert_eq!(outcome, SearchOutcome::Aborted);
        assert_eq!(nav.submitted.lock().len(), 1, "No retry after failure");
        assert_eq!(
            elevation.request_count(),
            9,
            "No re-sampling after a failed move"
        );
    }

    #[tokio::test]
    async fn test_climbs_through_multiple_iterations() {
        let mut script = iteration(1.0, [2.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0]);
        script.extend(iteration(2.0, [0.0, 3.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0]));
        script.extend(iteration(3.0, [0.0; 8]));
        let elevation = ScriptedElevation::new(script);
        let nav = ScriptedNav::new(NavBehavior::Succeed);
        let ctl = controller(StaticPose::at(0.0, 0.0), elevation.clone(), nav.clone());

        let outcome = ctl.run(CancellationToken::new()).await;

        assert!(matches!(outcome, SearchOutcome::Succeeded { .. }));
        assert_eq!(nav.submitted.lock().len(), 2);
        assert_eq!(elevation.request_count(), 27);
    }

    #[test]
    fn test_config_defaults_match_constants() {
        let config = SearchConfig::default();
        assert_eq!(config.probe_count, 8);
        assert!((config.probe_radius - 0.1).abs() < 1e-12);
        assert_eq!(config.poll_interval, Duration::from_millis(100));
    }
}
