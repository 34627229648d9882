//! Robot session and motion service abstractions
//!
//! A [`RobotConnector`] dials a controller and authenticates, yielding a
//! [`RobotConnection`]. The connection hands out named [`MotionService`]s
//! which accept one [`MoveRequest`] at a time.

pub mod protocol;
pub mod simulated;
pub mod tcp;

use std::fmt;
use std::sync::Arc;

use armscribe_core::{Pose, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// API key credentials for a controller session
///
/// The secret never appears in `Debug` output or logs.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    key_id: String,
    key: String,
}

impl Credentials {
    /// Create credentials from a key id and its secret
    pub fn new(key_id: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            key_id: key_id.into(),
            key: key.into(),
        }
    }

    /// The public key id
    pub fn key_id(&self) -> &str {
        &self.key_id
    }

    pub(crate) fn secret(&self) -> &str {
        &self.key
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("key_id", &self.key_id)
            .field("key", &"<redacted>")
            .finish()
    }
}

/// A pose expressed in a named reference frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PoseInFrame {
    /// Reference frame name, e.g. "world"
    pub frame: String,
    /// The pose in that frame
    pub pose: Pose,
}

/// Constraints attached to a move
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct MotionConstraints {
    /// Maximum deviation from the target orientation along the path, in degrees
    #[serde(skip_serializing_if = "Option::is_none")]
    pub orientation_tolerance: Option<f64>,
}

impl MotionConstraints {
    /// Constraint holding the orientation within `tolerance` degrees
    pub fn orientation(tolerance: f64) -> Self {
        Self {
            orientation_tolerance: Some(tolerance),
        }
    }
}

/// One move submitted to a motion service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoveRequest {
    /// Name of the arm component to move
    pub component: String,
    /// Target pose
    pub destination: PoseInFrame,
    /// Optional path constraints
    #[serde(skip_serializing_if = "Option::is_none")]
    pub constraints: Option<MotionConstraints>,
}

/// What the motion service reported for a completed move
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MoveResult {
    /// Whether the arm reported that it moved
    pub moved: bool,
    /// Controller-side execution id, if one was assigned
    #[serde(skip_serializing_if = "Option::is_none")]
    pub execution_id: Option<String>,
}

/// Motion planning service that moves an arm component to a pose
#[async_trait]
pub trait MotionService: Send + Sync {
    /// Service name
    fn name(&self) -> &str;

    /// Move to the requested pose. Resolves once the controller has
    /// finished or refused the move.
    async fn move_to(&self, request: &MoveRequest) -> Result<MoveResult>;
}

/// An authenticated controller session
#[async_trait]
pub trait RobotConnection: Send + Sync {
    /// Look up a motion service by name
    async fn motion_service(&self, name: &str) -> Result<Arc<dyn MotionService>>;

    /// Close the session. Closing twice is a no-op.
    async fn close(&mut self) -> Result<()>;
}

/// Dials and authenticates controller sessions
#[async_trait]
pub trait RobotConnector: Send + Sync {
    /// Open a session to `address` using `credentials`
    async fn connect(
        &self,
        address: &str,
        credentials: &Credentials,
    ) -> Result<Box<dyn RobotConnection>>;
}
