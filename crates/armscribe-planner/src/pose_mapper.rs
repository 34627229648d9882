//! Raw point to world pose mapping.

use armscribe_core::{CalibrationFrame, Pose, RawPoint};

/// Map a raw point into the calibration frame.
///
/// Position is the point plus the frame origin, raised by the lift distance
/// when `lifted` is set. Orientation is always the frame's.
pub fn map_point(point: &RawPoint, frame: &CalibrationFrame, lifted: bool) -> Pose {
    Pose::new(frame.locate(point, lifted), frame.orientation)
}

/// Holds a calibration frame and maps points through it
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PoseMapper {
    frame: CalibrationFrame,
}

impl PoseMapper {
    /// Mapper for the given calibration frame
    pub fn new(frame: CalibrationFrame) -> Self {
        Self { frame }
    }

    /// The calibration frame in use
    pub fn frame(&self) -> &CalibrationFrame {
        &self.frame
    }

    /// Pose with the pen on the surface
    pub fn on_surface(&self, point: &RawPoint) -> Pose {
        map_point(point, &self.frame, false)
    }

    /// Pose above the point by the lift distance
    pub fn lifted(&self, point: &RawPoint) -> Pose {
        map_point(point, &self.frame, true)
    }

    /// Where the arm goes before any waypoint: the origin, lifted
    pub fn initial_pose(&self) -> Pose {
        Pose::new(
            self.frame.origin.raised(self.frame.lift_distance),
            self.frame.orientation,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use armscribe_core::{Orientation, Position};

    fn frame() -> CalibrationFrame {
        CalibrationFrame::new(
            Position::new(53.8, 261.3, 57.0),
            Orientation::new(0.35, 0.0, -0.94, 0.007),
            20.0,
        )
    }

    #[test]
    fn test_map_point() {
        let pose = map_point(&RawPoint::new(1.0, 2.0, 0.0), &frame(), false);
        assert!((pose.position.x - 54.8).abs() < 1e-9);
        assert!((pose.position.y - 263.3).abs() < 1e-9);
        assert!((pose.position.z - 57.0).abs() < 1e-9);
        assert_eq!(pose.orientation, frame().orientation);
    }

    #[test]
    fn test_lifted_adds_lift_distance() {
        let mapper = PoseMapper::new(frame());
        let p = RawPoint::new(1.0, 2.0, 3.0);
        let dz = mapper.lifted(&p).position.z - mapper.on_surface(&p).position.z;
        assert!((dz - 20.0).abs() < 1e-9);
    }

    #[test]
    fn test_initial_pose() {
        let pose = PoseMapper::new(frame()).initial_pose();
        assert_eq!(pose.position, Position::new(53.8, 261.3, 77.0));
    }
}
