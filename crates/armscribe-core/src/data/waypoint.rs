//! Waypoints: poses in visiting order, tagged with a visualization role.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::pose::Pose;

/// Visualization role of a waypoint. Carries no physical meaning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColorRole {
    /// First content point of a segment (pen touches down)
    SegmentStart,
    /// Last content point of a segment (pen about to lift)
    SegmentEnd,
    /// Pen-up pose entering or leaving a segment
    Transition,
    /// Interior content point traced on the surface
    Content,
}

impl fmt::Display for ColorRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SegmentStart => write!(f, "segment-start"),
            Self::SegmentEnd => write!(f, "segment-end"),
            Self::Transition => write!(f, "transition"),
            Self::Content => write!(f, "content"),
        }
    }
}

/// One pose to visit, with its role
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Waypoint {
    /// Target pose
    pub pose: Pose,
    /// Visualization role
    pub role: ColorRole,
}

impl Waypoint {
    /// Create a new waypoint
    pub fn new(pose: Pose, role: ColorRole) -> Self {
        Self { pose, role }
    }
}
