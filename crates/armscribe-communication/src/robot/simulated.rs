//! In-process robot used for dry runs
//!
//! Accepts every move (unless told to fail one), logs it and records it so
//! the submitted sequence can be inspected afterwards.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use armscribe_core::{ConnectionError, MotionError, Result};
use async_trait::async_trait;
use parking_lot::Mutex;
use tracing::info;

use super::{Credentials, MotionService, MoveRequest, MoveResult, RobotConnection, RobotConnector};

#[derive(Debug, Default)]
struct SimulatedState {
    moves: Mutex<Vec<MoveRequest>>,
    connects: AtomicUsize,
    closes: AtomicUsize,
    fail_at: Option<usize>,
}

/// A robot that only exists in memory
///
/// Clones share state, so a test can keep one handle and give another to
/// the pipeline.
#[derive(Debug, Clone, Default)]
pub struct SimulatedRobot {
    state: Arc<SimulatedState>,
}

impl SimulatedRobot {
    /// Create a robot that accepts every move
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a robot that refuses the move request with 0-based index
    /// `request_index`, counting the initial move
    pub fn failing_at(request_index: usize) -> Self {
        Self {
            state: Arc::new(SimulatedState {
                fail_at: Some(request_index),
                ..SimulatedState::default()
            }),
        }
    }

    /// Every move request received so far, including a refused one
    pub fn moves(&self) -> Vec<MoveRequest> {
        self.state.moves.lock().clone()
    }

    /// Number of sessions opened
    pub fn connect_count(&self) -> usize {
        self.state.connects.load(Ordering::SeqCst)
    }

    /// Number of sessions closed
    pub fn close_count(&self) -> usize {
        self.state.closes.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl RobotConnector for SimulatedRobot {
    async fn connect(
        &self,
        address: &str,
        credentials: &Credentials,
    ) -> Result<Box<dyn RobotConnection>> {
        self.state.connects.fetch_add(1, Ordering::SeqCst);
        info!(
            key_id = credentials.key_id(),
            "Simulated connection to {}",
            if address.is_empty() { "<none>" } else { address }
        );
        Ok(Box::new(SimulatedConnection {
            robot: self.clone(),
            open: true,
        }))
    }
}

struct SimulatedConnection {
    robot: SimulatedRobot,
    open: bool,
}

#[async_trait]
impl RobotConnection for SimulatedConnection {
    async fn motion_service(&self, name: &str) -> Result<Arc<dyn MotionService>> {
        if !self.open {
            return Err(ConnectionError::Closed.into());
        }
        Ok(Arc::new(SimulatedMotion {
            name: name.to_string(),
            robot: self.robot.clone(),
        }))
    }

    async fn close(&mut self) -> Result<()> {
        if self.open {
            self.open = false;
            self.robot.state.closes.fetch_add(1, Ordering::SeqCst);
            info!("Simulated connection closed");
        }
        Ok(())
    }
}

/// Motion service of a [`SimulatedRobot`]
pub struct SimulatedMotion {
    name: String,
    robot: SimulatedRobot,
}

#[async_trait]
impl MotionService for SimulatedMotion {
    fn name(&self) -> &str {
        &self.name
    }

    async fn move_to(&self, request: &MoveRequest) -> Result<MoveResult> {
        let index = {
            let mut moves = self.robot.state.moves.lock();
            moves.push(request.clone());
            moves.len() - 1
        };

        if self.robot.state.fail_at == Some(index) {
            return Err(MotionError::Rejected {
                reason: format!("simulated failure on request {}", index),
            }
            .into());
        }

        info!(
            component = %request.component,
            frame = %request.destination.frame,
            constrained = request.constraints.is_some(),
            "Simulated move to {}",
            request.destination.pose
        );
        Ok(MoveResult {
            moved: true,
            execution_id: Some(format!("sim-{}", index)),
        })
    }
}
