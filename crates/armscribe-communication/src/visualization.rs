//! Pose visualizers
//!
//! A [`VisualizationSink`] receives the planned poses with one colour per
//! pose before anything moves, so the operator can inspect the path.

use armscribe_core::{Pose, Result, VisualizationError};
use async_trait::async_trait;
use serde::Serialize;
use serde_json::json;
use tokio::sync::Mutex;
use tracing::{debug, info};

use crate::robot::protocol::{JsonLineChannel, Reply};

/// Receives planned poses for display
#[async_trait]
pub trait VisualizationSink: Send + Sync {
    /// Remove everything previously drawn
    async fn remove_all(&self) -> Result<()>;

    /// Draw `poses` with the parallel list of `colors` (`#RRGGBB`).
    /// With `clear`, previous drawings are dropped first.
    async fn draw_poses(&self, poses: &[Pose], colors: &[String], clear: bool) -> Result<()>;
}

fn check_lengths(poses: &[Pose], colors: &[String]) -> Result<()> {
    if poses.len() != colors.len() {
        return Err(VisualizationError::LengthMismatch {
            poses: poses.len(),
            colors: colors.len(),
        }
        .into());
    }
    Ok(())
}

/// Visualizer that only writes the poses to the log
#[derive(Debug, Clone, Copy, Default)]
pub struct LogVisualizer;

#[async_trait]
impl VisualizationSink for LogVisualizer {
    async fn remove_all(&self) -> Result<()> {
        debug!("Visualizer cleared");
        Ok(())
    }

    async fn draw_poses(&self, poses: &[Pose], colors: &[String], clear: bool) -> Result<()> {
        check_lengths(poses, colors)?;
        for (index, (pose, color)) in poses.iter().zip(colors).enumerate() {
            debug!(index, color = %color, "{}", pose);
        }
        info!(count = poses.len(), clear, "Drew planned poses");
        Ok(())
    }
}

#[derive(Serialize)]
struct PosePayload<'a> {
    #[serde(flatten)]
    pose: &'a Pose,
    /// Unit quaternion as `[w, x, y, z]`
    quaternion: [f64; 4],
}

impl<'a> PosePayload<'a> {
    fn new(pose: &'a Pose) -> Self {
        let q = pose.orientation.to_quaternion();
        Self {
            pose,
            quaternion: [q.w, q.i, q.j, q.k],
        }
    }
}

/// Visualizer service reached over a JSON-lines TCP connection
pub struct TcpVisualizer {
    channel: Mutex<JsonLineChannel>,
}

impl TcpVisualizer {
    /// Dial the visualizer at `address`
    pub async fn connect(address: &str) -> Result<Self> {
        info!("Connecting to visualizer at {}", address);
        let channel = JsonLineChannel::connect(address).await?;
        Ok(Self::from_channel(channel))
    }

    /// Use an established channel
    pub fn from_channel(channel: JsonLineChannel) -> Self {
        Self {
            channel: Mutex::new(channel),
        }
    }

    async fn call<P: Serialize + Send>(&self, method: &str, params: P) -> Result<()> {
        let mut channel = self.channel.lock().await;
        match channel.call(method, params).await? {
            Reply::Ok(_) => Ok(()),
            Reply::Refused(reason) => Err(VisualizationError::Rejected { reason }.into()),
        }
    }
}

#[async_trait]
impl VisualizationSink for TcpVisualizer {
    async fn remove_all(&self) -> Result<()> {
        self.call("viz.remove_all", json!({})).await
    }

    async fn draw_poses(&self, poses: &[Pose], colors: &[String], clear: bool) -> Result<()> {
        check_lengths(poses, colors)?;
        let payload: Vec<PosePayload<'_>> = poses.iter().map(PosePayload::new).collect();
        self.call(
            "viz.draw_poses",
            json!({
                "poses": payload,
                "colors": colors,
                "clear": clear,
            }),
        )
        .await?;
        info!(count = poses.len(), "Sent planned poses to visualizer");
        Ok(())
    }
}
