//! # Armscribe Core
//!
//! Core types for armscribe.
//! Provides the data model shared by the planner and the motion layer
//! (points, segments, poses, waypoints) and the error taxonomy.

pub mod data;
pub mod error;

pub use data::{
    pose::{CalibrationFrame, Orientation, Pose, Position},
    waypoint::{ColorRole, Waypoint},
    RawPoint, Segment,
};

pub use error::{ConnectionError, Error, InputError, MotionError, Result, VisualizationError};
