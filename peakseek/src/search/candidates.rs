//! Candidate ring generation
//!
//! One search iteration probes a fixed ring of positions around the agent.
//! Generation order is part of the contract: the controller breaks elevation
//! ties by picking the earliest generated candidate, so the ring must come
//! back in angle order starting from the +x axis.

use std::f64::consts::TAU;

use crate::coord::MapPoint;

/// Generates `count` probe positions on a ring around `center`.
///
/// The i-th candidate sits at angle `i * (2π / count)` from the +x axis at
/// `radius` meters. Candidates are returned in generation order, never
/// sorted by value.
pub fn probe_ring(center: MapPoint, count: usize, radius: f64) -> Vec<MapPoint> {
    let step = TAU / count as f64;
    (0..count)
        .map(|i| center.offset(i as f64 * step, radius))
        .collect()
}
