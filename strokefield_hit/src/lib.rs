// Copyright 2025 the Strokefield Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Proximity hit testing for line segments.
//!
//! This crate provides the narrow-phase geometry for picking a drawn line
//! with a pointer, built on top of [`kurbo`]. It is intentionally decoupled
//! from any particular stroke store or event dispatcher.
//!
//! # Typical usage
//!
//! - Keep your finished strokes in whatever order your surface renders them.
//! - Call [`SampledProximity::first_hit`] with the pointer position; the
//!   returned index is the lowest-index segment passing within tolerance.
//!
//! ```
//! use strokefield_hit::SampledProximity;
//! use kurbo::{Line, Point};
//!
//! let proximity = SampledProximity::default();
//! let lines = [
//!     Line::new((0.0, 0.0), (100.0, 0.0)),
//!     Line::new((0.0, 100.0), (100.0, 100.0)),
//! ];
//!
//! let hit = proximity.first_hit(lines.iter().copied(), Point::new(50.0, 5.0));
//! assert_eq!(hit, Some(0));
//!
//! let miss = proximity.first_hit(lines.iter().copied(), Point::new(50.0, 50.0));
//! assert_eq!(miss, None);
//! ```
//!
//! # Sampled grid vs. continuous distance
//!
//! [`SampledProximity`] answers queries over a fixed grid of parametric
//! samples along each segment, which is the contract interactive surfaces
//! test against (a tolerance circle swept along sample points). The grid
//! never includes the parameter t = 1.0, so a query exactly on a segment's
//! terminal endpoint can miss; see [`SampledProximity::hits`]. Callers that
//! want continuous behavior instead can compare [`segment_distance`] against
//! their own tolerance.

#![no_std]

#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _;
use kurbo::{Line, Point};

/// Parameters for sampled proximity queries along line segments.
///
/// A query point hits a segment when any of `samples` evenly spaced points
/// along the segment lies strictly within `tolerance` of it.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SampledProximity {
    /// Distance in local units under which a sample counts as a hit.
    ///
    /// The comparison is strict: a sample exactly `tolerance` away misses.
    pub tolerance: f64,
    /// Number of parametric samples per segment.
    ///
    /// Samples are placed at t = i / samples for i in `0..samples`, covering
    /// `[0, 1)`. Must be non-zero; a zero sample count hits nothing.
    pub samples: u32,
}

impl Default for SampledProximity {
    /// The defaults used by interactive drawing surfaces: a 20-unit pick
    /// radius probed at 20 samples (t stepping by 0.05).
    fn default() -> Self {
        Self {
            tolerance: 20.0,
            samples: 20,
        }
    }
}

impl SampledProximity {
    /// Create proximity parameters with an explicit tolerance and sample count.
    pub const fn new(tolerance: f64, samples: u32) -> Self {
        Self { tolerance, samples }
    }

    /// Whether `pt` lies within tolerance of any sampled point on `seg`.
    ///
    /// Samples run over t in `[0, 1)`; the terminal endpoint (t = 1.0) is
    /// never probed, so a query exactly on it can miss when the preceding
    /// sample is at least `tolerance` away. This matches the sampled-grid
    /// contract; use [`segment_distance`] for the continuous alternative.
    ///
    /// Degenerate segments (`p0 == p1`) collapse every sample onto `p0`.
    pub fn hits(&self, seg: Line, pt: Point) -> bool {
        debug_assert!(self.samples > 0, "sample count must be non-zero");
        let step = 1.0 / f64::from(self.samples);
        for i in 0..self.samples {
            let t = f64::from(i) * step;
            let sx = seg.p0.x + (seg.p1.x - seg.p0.x) * t;
            let sy = seg.p0.y + (seg.p1.y - seg.p0.y) * t;
            let dx = pt.x - sx;
            let dy = pt.y - sy;
            if (dx * dx + dy * dy).sqrt() < self.tolerance {
                return true;
            }
        }
        false
    }

    /// Index of the first segment that [`hits`](Self::hits) `pt`.
    ///
    /// First match wins: segments are probed in iteration order and the scan
    /// stops at the first qualifying one, with no search for the closest.
    /// Returns `None` when no segment qualifies (including an empty input).
    /// O(segments × samples) per query.
    pub fn first_hit(&self, segs: impl IntoIterator<Item = Line>, pt: Point) -> Option<usize> {
        segs.into_iter().position(|seg| self.hits(seg, pt))
    }
}

/// Exact distance from `pt` to the closest point on `seg`.
///
/// Uses a clamped projection onto the segment, so the endpoints are included
/// (unlike the sampled grid). Degenerate segments report the distance to
/// their single point.
pub fn segment_distance(seg: Line, pt: Point) -> f64 {
    let v = seg.p1 - seg.p0;
    let w = pt - seg.p0;
    let len2 = v.length_squared();
    let t = if len2 > 0.0 { w.dot(v) / len2 } else { 0.0 };
    let t = t.clamp(0.0, 1.0);
    let nearest = seg.p0 + t * v;
    (pt - nearest).length()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hit_near_segment_interior() {
        let p = SampledProximity::default();
        let seg = Line::new((0.0, 0.0), (100.0, 0.0));
        assert!(p.hits(seg, Point::new(50.0, 5.0)));
    }

    #[test]
    fn miss_beyond_tolerance() {
        let p = SampledProximity::default();
        let seg = Line::new((0.0, 0.0), (100.0, 0.0));
        // Closest samples to (50, 25) are at x = 50 (25 away) and its
        // neighbors at x = 45 / 55 (farther): all outside the pick radius.
        assert!(!p.hits(seg, Point::new(50.0, 25.0)));
    }

    #[test]
    fn tolerance_comparison_is_strict() {
        let p = SampledProximity::default();
        let seg = Line::new((0.0, 0.0), (100.0, 0.0));
        // Sample at (50, 0) is exactly 20 away.
        assert!(!p.hits(seg, Point::new(50.0, 20.0)));
        assert!(p.hits(seg, Point::new(50.0, 19.999)));
    }

    #[test]
    fn terminal_endpoint_can_miss() {
        let p = SampledProximity::default();
        // Last sample is at t = 0.95, i.e. x = 380: exactly 20 units from the
        // endpoint, which the strict comparison rejects.
        let seg = Line::new((0.0, 0.0), (400.0, 0.0));
        assert!(!p.hits(seg, Point::new(400.0, 0.0)));
        assert!(p.hits(seg, Point::new(399.0, 0.0)));
        // The continuous distance has no such gap.
        assert_eq!(segment_distance(seg, Point::new(400.0, 0.0)), 0.0);
    }

    #[test]
    fn start_endpoint_is_sampled() {
        let p = SampledProximity::default();
        let seg = Line::new((0.0, 0.0), (400.0, 0.0));
        assert!(p.hits(seg, Point::new(0.0, 0.0)));
    }

    #[test]
    fn degenerate_segment_collapses_to_point() {
        let p = SampledProximity::default();
        let seg = Line::new((10.0, 10.0), (10.0, 10.0));
        assert!(p.hits(seg, Point::new(15.0, 10.0)));
        assert!(!p.hits(seg, Point::new(40.0, 10.0)));
    }

    #[test]
    fn first_hit_prefers_lowest_index() {
        let p = SampledProximity::default();
        // Both segments pass within tolerance of the query point.
        let segs = [
            Line::new((0.0, 0.0), (100.0, 0.0)),
            Line::new((0.0, 10.0), (100.0, 10.0)),
        ];
        // The second is closer, but the scan stops at the first match.
        let hit = p.first_hit(segs.iter().copied(), Point::new(50.0, 8.0));
        assert_eq!(hit, Some(0));
    }

    #[test]
    fn first_hit_empty_input() {
        let p = SampledProximity::default();
        assert_eq!(p.first_hit(core::iter::empty(), Point::new(0.0, 0.0)), None);
    }

    #[test]
    fn first_hit_skips_misses() {
        let p = SampledProximity::default();
        let segs = [
            Line::new((0.0, 0.0), (100.0, 0.0)),
            Line::new((0.0, 500.0), (100.0, 500.0)),
            Line::new((0.0, 1000.0), (100.0, 1000.0)),
        ];
        let hit = p.first_hit(segs.iter().copied(), Point::new(50.0, 505.0));
        assert_eq!(hit, Some(1));
    }

    #[test]
    fn segment_distance_interior_and_clamped() {
        let seg = Line::new((0.0, 0.0), (10.0, 0.0));
        assert_eq!(segment_distance(seg, Point::new(5.0, 3.0)), 3.0);
        // Beyond p1: clamps to the endpoint.
        assert_eq!(segment_distance(seg, Point::new(13.0, 4.0)), 5.0);
        // Before p0: clamps the other way.
        assert_eq!(segment_distance(seg, Point::new(-3.0, 4.0)), 5.0);
    }

    #[test]
    fn segment_distance_degenerate() {
        let seg = Line::new((2.0, 2.0), (2.0, 2.0));
        assert_eq!(segment_distance(seg, Point::new(2.0, 7.0)), 5.0);
    }
}
