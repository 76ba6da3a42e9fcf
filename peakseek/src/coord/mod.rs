//! Planar coordinate module
//!
//! Provides the world-frame position type shared by the sampler, the
//! navigation delegate and the search controller, plus the frame names
//! used when talking to the pose and navigation collaborators.

use std::fmt;

/// Fixed world frame every target and sample position is expressed in.
pub const MAP_FRAME: &str = "map";

/// Body frame of the agent, resolved against [`MAP_FRAME`] via pose lookup.
pub const BODY_FRAME: &str = "base_footprint";

/// A position on the world plane, in meters, in the [`MAP_FRAME`] frame.
///
/// Value semantics: two points compare equal when both coordinates are
/// bitwise equal, which is what tests rely on because candidate targets
/// are passed through unmodified rather than recomputed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MapPoint {
    pub x: f64,
    pub y: f64,
}

impl MapPoint {
    /// Creates a point from world-frame coordinates.
    #[inline]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another point.
    #[inline]
    pub fn distance_to(&self, other: &MapPoint) -> f64 {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        (dx * dx + dy * dy).sqrt()
    }

    /// Returns the point at `radius` meters from `self` along `angle`.
    ///
    /// # Arguments
    ///
    /// * `angle` - Direction in radians, measured from the +x axis
    /// * `radius` - Offset distance in meters
    #[inline]
    pub fn offset(&self, angle: f64, radius: f64) -> MapPoint {
        MapPoint {
            x: self.x + radius * angle.cos(),
            y: self.y + radius * angle.sin(),
        }
    }
}

impl fmt::Display for MapPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.3}, {:.3})", self.x, self.y)
    }
}
