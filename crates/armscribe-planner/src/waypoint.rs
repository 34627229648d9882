//! Waypoint synthesis
//!
//! Each segment becomes `len + 2` waypoints: a lifted pose above its first
//! point, every point on the surface, and a lifted pose above its last point.

use armscribe_core::{CalibrationFrame, ColorRole, Segment, Waypoint};

use crate::pose_mapper::PoseMapper;

/// Role of the content point at `index` in a segment of `len` points.
///
/// A single-point segment is both first and last; end wins.
pub fn content_role(index: usize, len: usize) -> ColorRole {
    if index + 1 == len {
        ColorRole::SegmentEnd
    } else if index == 0 {
        ColorRole::SegmentStart
    } else {
        ColorRole::Content
    }
}

/// Turns segments into an ordered waypoint list
#[derive(Debug, Clone, Copy)]
pub struct WaypointSynthesizer {
    mapper: PoseMapper,
}

impl WaypointSynthesizer {
    /// Synthesizer mapping points through `frame`
    pub fn new(frame: CalibrationFrame) -> Self {
        Self {
            mapper: PoseMapper::new(frame),
        }
    }

    /// The pose mapper, e.g. for the initial pose
    pub fn mapper(&self) -> &PoseMapper {
        &self.mapper
    }

    /// Waypoints for one segment
    pub fn segment_waypoints(&self, segment: &Segment) -> Vec<Waypoint> {
        let points = segment.points();
        let mut waypoints = Vec::with_capacity(points.len() + 2);

        waypoints.push(Waypoint::new(
            self.mapper.lifted(segment.first()),
            ColorRole::Transition,
        ));
        for (i, point) in points.iter().enumerate() {
            waypoints.push(Waypoint::new(
                self.mapper.on_surface(point),
                content_role(i, points.len()),
            ));
        }
        waypoints.push(Waypoint::new(
            self.mapper.lifted(segment.last()),
            ColorRole::Transition,
        ));

        waypoints
    }

    /// Waypoints for every segment, in order
    pub fn synthesize(&self, segments: &[Segment]) -> Vec<Waypoint> {
        segments
            .iter()
            .flat_map(|segment| self.segment_waypoints(segment))
            .collect()
    }
}
