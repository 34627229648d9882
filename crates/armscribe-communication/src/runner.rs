//! Trajectory runner
//!
//! Drives a motion service through the initial pose and then every
//! waypoint in order. Each move is awaited before the next is submitted.

use armscribe_core::{Error, MotionError, Pose, Result, Waypoint};
use tracing::{error, info};

use crate::robot::{MotionConstraints, MotionService, MoveRequest, PoseInFrame};

/// What to do when a waypoint move fails
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FailurePolicy {
    /// Stop at the failed waypoint and report it; nothing after it is sent
    #[default]
    AbortOnFirstFailure,
}

/// Static parameters of a run
#[derive(Debug, Clone, PartialEq)]
pub struct RunnerConfig {
    /// Arm component name
    pub component: String,
    /// Frame every destination is expressed in
    pub reference_frame: String,
    /// Constraints applied to waypoint moves
    pub constraints: MotionConstraints,
    /// Reaction to a failed waypoint move
    pub policy: FailurePolicy,
}

impl RunnerConfig {
    /// Configuration for `component` in the world frame with the given
    /// orientation tolerance
    pub fn new(component: impl Into<String>, orientation_tolerance: f64) -> Self {
        Self {
            component: component.into(),
            reference_frame: "world".to_string(),
            constraints: MotionConstraints::orientation(orientation_tolerance),
            policy: FailurePolicy::default(),
        }
    }
}

/// Summary of a finished run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunReport {
    /// Waypoint moves completed, not counting the initial move
    pub waypoints_completed: usize,
    /// Moves the service reported as not actually moving
    pub reported_unmoved: usize,
}

/// Sends a planned trajectory to a motion service
pub struct TrajectoryRunner<'a> {
    motion: &'a dyn MotionService,
    config: RunnerConfig,
}

impl<'a> TrajectoryRunner<'a> {
    /// Runner over `motion`
    pub fn new(motion: &'a dyn MotionService, config: RunnerConfig) -> Self {
        Self { motion, config }
    }

    pub fn config(&self) -> &RunnerConfig {
        &self.config
    }

    fn request(&self, pose: &Pose, constraints: Option<MotionConstraints>) -> MoveRequest {
        MoveRequest {
            component: self.config.component.clone(),
            destination: PoseInFrame {
                frame: self.config.reference_frame.clone(),
                pose: *pose,
            },
            constraints,
        }
    }

    /// Move to `initial` without constraints, then through `waypoints`
    pub async fn run(&self, initial: &Pose, waypoints: &[Waypoint]) -> Result<RunReport> {
        let mut report = RunReport {
            waypoints_completed: 0,
            reported_unmoved: 0,
        };

        info!("Moving to initial pose {}", initial);
        match self.motion.move_to(&self.request(initial, None)).await {
            Ok(result) => {
                info!(moved = result.moved, "Initial move done");
                if !result.moved {
                    report.reported_unmoved += 1;
                }
            }
            Err(e @ Error::Connection(_)) => {
                error!("Session lost during initial move: {}", e);
                return Err(e);
            }
            Err(e) => {
                error!("Initial move failed: {}", e);
                return Err(MotionError::InitialMoveFailed {
                    reason: e.to_string(),
                }
                .into());
            }
        }

        let total = waypoints.len();
        for (index, waypoint) in waypoints.iter().enumerate() {
            info!(
                index,
                total,
                role = %waypoint.role,
                "Moving to {}",
                waypoint.pose
            );
            let request = self.request(&waypoint.pose, Some(self.config.constraints));

            match self.motion.move_to(&request).await {
                Ok(result) => {
                    info!(index, moved = result.moved, "Move done");
                    if !result.moved {
                        report.reported_unmoved += 1;
                    }
                    report.waypoints_completed += 1;
                }
                // A dropped session keeps its own error; there is nothing to resume
                Err(e @ Error::Connection(_)) => {
                    error!(
                        index,
                        completed = report.waypoints_completed,
                        "Session lost, aborting trajectory: {}",
                        e
                    );
                    return Err(e);
                }
                Err(e) => match self.config.policy {
                    FailurePolicy::AbortOnFirstFailure => {
                        error!(
                            index,
                            completed = report.waypoints_completed,
                            "Move failed, aborting trajectory: {}",
                            e
                        );
                        return Err(MotionError::MoveFailed {
                            index,
                            completed: report.waypoints_completed,
                            reason: e.to_string(),
                        }
                        .into());
                    }
                },
            }
        }

        info!(
            completed = report.waypoints_completed,
            "Trajectory finished"
        );
        Ok(report)
    }
}
