//! Pose lookup module
//!
//! Thin seam over the transform subsystem that resolves the agent's body
//! frame against the world frame. Lookups return the latest available pose,
//! never an extrapolated one; the search controller re-reads it every
//! iteration instead of caching.

use thiserror::Error;

use crate::coord::MapPoint;

/// Errors reported by a pose lookup.
#[derive(Debug, Error)]
pub enum PoseError {
    /// No transform between the two frames is currently available.
    #[error("transform from '{from_frame}' to '{to_frame}' unavailable")]
    TransformUnavailable {
        from_frame: String,
        to_frame: String,
    },

    /// The lookup backend failed.
    #[error("pose lookup failed: {0}")]
    LookupFailed(String),
}

/// Trait for resolving the agent's position in the world frame.
pub trait PoseSource: Send + Sync {
    /// Whether a transform from `source` to `target` can currently be
    /// resolved. Used as a precondition probe before a run starts.
    fn can_lookup(&self, source: &str, target: &str) -> bool;

    /// Resolves the position of `target`'s origin in the `source` frame,
    /// at the latest available time.
    fn lookup(&self, source: &str, target: &str) -> Result<MapPoint, PoseError>;
}
