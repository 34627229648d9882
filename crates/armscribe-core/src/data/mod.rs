//! Data models for points, segments, poses and waypoints
//!
//! This module provides:
//! - Raw points read from a point file
//! - Segments ("letters") of drawable points
//! - Poses, orientations and the calibration frame (see [`pose`])
//! - Waypoints with their visualization role (see [`waypoint`])

pub mod pose;
pub mod waypoint;

use serde::{Deserialize, Serialize};
use std::fmt;

/// A point read from one line of the input file, already scaled
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RawPoint {
    /// X coordinate
    pub x: f64,
    /// Y coordinate
    pub y: f64,
    /// Z coordinate
    pub z: f64,
}

impl RawPoint {
    /// Create a new point
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        debug_assert!(
            x.is_finite() && y.is_finite() && z.is_finite(),
            "RawPoint coordinates must be finite: x={x}, y={y}, z={z}"
        );
        Self { x, y, z }
    }

    /// Multiply every coordinate by `factor`
    pub fn scaled(&self, factor: f64) -> Self {
        Self::new(self.x * factor, self.y * factor, self.z * factor)
    }

    /// Get all coordinates as a tuple
    pub fn as_tuple(&self) -> (f64, f64, f64) {
        (self.x, self.y, self.z)
    }
}

impl fmt::Display for RawPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.4}, {:.4}, {:.4})", self.x, self.y, self.z)
    }
}

/// One contiguous drawable unit ("letter") of the trajectory
///
/// A segment always holds at least one point; [`Segment::new`] refuses to
/// build an empty one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    label: Option<String>,
    points: Vec<RawPoint>,
}

impl Segment {
    /// Seal a list of points into a segment. Returns `None` for an empty list.
    pub fn new(label: Option<String>, points: Vec<RawPoint>) -> Option<Self> {
        if points.is_empty() {
            return None;
        }
        Some(Self { label, points })
    }

    /// Label taken from the marker line that opened the segment
    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    /// Points in input order
    pub fn points(&self) -> &[RawPoint] {
        &self.points
    }

    /// Number of points (never zero)
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Always false; present for API symmetry with collections
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// First point of the segment
    pub fn first(&self) -> &RawPoint {
        &self.points[0]
    }

    /// Last point of the segment
    pub fn last(&self) -> &RawPoint {
        &self.points[self.points.len() - 1]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_segment_rejects_empty() {
        assert!(Segment::new(Some("A".into()), Vec::new()).is_none());
    }

    #[test]
    fn test_segment_first_last() {
        let seg = Segment::new(
            None,
            vec![RawPoint::new(1.0, 2.0, 0.0), RawPoint::new(3.0, 4.0, 0.0)],
        )
        .unwrap();
        assert_eq!(seg.len(), 2);
        assert_eq!(seg.first().x, 1.0);
        assert_eq!(seg.last().y, 4.0);
        assert!(seg.label().is_none());
    }

    #[test]
    fn test_raw_point_scaled() {
        let p = RawPoint::new(1.0, -2.0, 0.5).scaled(45.0);
        assert_eq!(p.as_tuple(), (45.0, -90.0, 22.5));
    }
}
