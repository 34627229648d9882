//! Spatial poses and the calibration frame that produces them.

use nalgebra::{Isometry3, Translation3, UnitQuaternion, Vector3};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::RawPoint;

/// Below this, an orientation vector is treated as parallel to the Z axis.
const POLE_EPSILON: f64 = 1e-4;

/// Cartesian position in millimetres
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    /// X-axis position
    pub x: f64,
    /// Y-axis position
    pub y: f64,
    /// Z-axis position
    pub z: f64,
}

impl Position {
    /// Create a new position
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Return a copy raised by `dz` along Z
    pub fn raised(&self, dz: f64) -> Self {
        Self::new(self.x, self.y, self.z + dz)
    }
}

/// End-effector orientation expressed as an orientation vector in degrees
///
/// `(ox, oy, oz)` is the direction the tool's Z axis points in; `theta_degrees`
/// is the rotation about that direction.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Orientation {
    /// X component of the pointing direction
    pub ox: f64,
    /// Y component of the pointing direction
    pub oy: f64,
    /// Z component of the pointing direction
    pub oz: f64,
    /// Rotation about the pointing direction, in degrees
    pub theta_degrees: f64,
}

impl Default for Orientation {
    fn default() -> Self {
        Self {
            ox: 0.0,
            oy: 0.0,
            oz: 1.0,
            theta_degrees: 0.0,
        }
    }
}

impl Orientation {
    /// Create a new orientation vector
    pub fn new(ox: f64, oy: f64, oz: f64, theta_degrees: f64) -> Self {
        Self {
            ox,
            oy,
            oz,
            theta_degrees,
        }
    }

    /// Length of the direction part
    pub fn norm(&self) -> f64 {
        (self.ox * self.ox + self.oy * self.oy + self.oz * self.oz).sqrt()
    }

    /// Direction too short to normalise; treated as +Z
    pub fn is_degenerate(&self) -> bool {
        self.norm() <= f64::EPSILON
    }

    /// Convert to a unit quaternion.
    ///
    /// The direction is normalised first; its latitude is the rotation about
    /// Y and its longitude the rotation about Z, composed Z-Y-Z with theta.
    /// A zero direction is treated as +Z.
    pub fn to_quaternion(&self) -> UnitQuaternion<f64> {
        let (ox, oy, oz) = if self.is_degenerate() {
            (0.0, 0.0, 1.0)
        } else {
            let norm = self.norm();
            (self.ox / norm, self.oy / norm, self.oz / norm)
        };

        let lat = oz.clamp(-1.0, 1.0).acos();
        let lon = if 1.0 - oz.abs() > POLE_EPSILON {
            oy.atan2(ox)
        } else {
            0.0
        };
        let theta = self.theta_degrees.to_radians();

        UnitQuaternion::from_axis_angle(&Vector3::z_axis(), lon)
            * UnitQuaternion::from_axis_angle(&Vector3::y_axis(), lat)
            * UnitQuaternion::from_axis_angle(&Vector3::z_axis(), theta)
    }
}

/// A 6-DOF end-effector pose
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Pose {
    /// Where the end effector is
    pub position: Position,
    /// How it is oriented
    pub orientation: Orientation,
}

impl Pose {
    /// Create a new pose
    pub fn new(position: Position, orientation: Orientation) -> Self {
        Self {
            position,
            orientation,
        }
    }

    /// The pose as an SE(3) transform
    pub fn to_isometry(&self) -> Isometry3<f64> {
        Isometry3::from_parts(
            Translation3::new(self.position.x, self.position.y, self.position.z),
            self.orientation.to_quaternion(),
        )
    }
}

impl fmt::Display for Pose {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "X:{:.3} Y:{:.3} Z:{:.3} OX:{:.4} OY:{:.4} OZ:{:.4} Th:{:.4}",
            self.position.x,
            self.position.y,
            self.position.z,
            self.orientation.ox,
            self.orientation.oy,
            self.orientation.oz,
            self.orientation.theta_degrees
        )
    }
}

/// Fixed calibration applied to every point of a run
///
/// `origin` is the end-effector position with the pen touching the paper at
/// the place writing should start.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CalibrationFrame {
    /// Offset added to every point
    pub origin: Position,
    /// Orientation used for every pose
    pub orientation: Orientation,
    /// Height above the paper used for pen-up poses
    pub lift_distance: f64,
}

impl CalibrationFrame {
    /// Create a new calibration frame
    pub fn new(origin: Position, orientation: Orientation, lift_distance: f64) -> Self {
        Self {
            origin,
            orientation,
            lift_distance,
        }
    }

    /// Position of a raw point in this frame, optionally lifted
    pub fn locate(&self, point: &RawPoint, lifted: bool) -> Position {
        let lift = if lifted { self.lift_distance } else { 0.0 };
        Position::new(
            point.x + self.origin.x,
            point.y + self.origin.y,
            point.z + self.origin.z + lift,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOLERANCE: f64 = 1e-9;

    fn assert_vec_close(actual: Vector3<f64>, expected: Vector3<f64>) {
        assert!(
            (actual - expected).norm() < 1e-6,
            "expected {:?}, got {:?}",
            expected,
            actual
        );
    }

    #[test]
    fn test_identity_orientation() {
        let q = Orientation::default().to_quaternion();
        assert!(q.angle().abs() < TOLERANCE);
    }

    #[test]
    fn test_degenerate_direction() {
        assert!(Orientation::new(0.0, 0.0, 0.0, 0.0).is_degenerate());
        assert!(Orientation::new(1e-20, 0.0, 0.0, 0.0).is_degenerate());
        assert!(!Orientation::new(1e-3, 0.0, 0.0, 0.0).is_degenerate());

        let q = Orientation::new(1e-20, 0.0, 0.0, 0.0).to_quaternion();
        assert!(q.angle().abs() < TOLERANCE);
    }

    #[test]
    fn test_pointing_down() {
        let q = Orientation::new(0.0, 0.0, -1.0, 0.0).to_quaternion();
        assert_vec_close(q * Vector3::z(), Vector3::new(0.0, 0.0, -1.0));
    }

    #[test]
    fn test_tool_axis_follows_vector() {
        let ov = Orientation::new(
            0.348899278145762,
            0.0000407496998468827,
            -0.937160228407803,
            0.0073,
        );
        let q = ov.to_quaternion();
        let n = ov.norm();
        assert_vec_close(q * Vector3::z(), Vector3::new(ov.ox / n, ov.oy / n, ov.oz / n));
    }

    #[test]
    fn test_theta_rotates_about_tool_axis() {
        let q = Orientation::new(0.0, 0.0, 1.0, 90.0).to_quaternion();
        assert_vec_close(q * Vector3::x(), Vector3::y());
    }

    #[test]
    fn test_locate_adds_origin_and_lift() {
        let frame = CalibrationFrame::new(
            Position::new(10.0, 20.0, 30.0),
            Orientation::default(),
            5.0,
        );
        let p = RawPoint::new(1.0, 2.0, 3.0);
        assert_eq!(frame.locate(&p, false), Position::new(11.0, 22.0, 33.0));
        assert_eq!(frame.locate(&p, true), Position::new(11.0, 22.0, 38.0));
    }

    #[test]
    fn test_isometry_translation() {
        let pose = Pose::new(Position::new(1.0, 2.0, 3.0), Orientation::default());
        let iso = pose.to_isometry();
        assert_vec_close(iso.translation.vector, Vector3::new(1.0, 2.0, 3.0));
    }
}
