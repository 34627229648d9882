//! # Armscribe Communication
//!
//! Everything that talks to the outside world while a plan is executed:
//! the robot session and its motion service, the pose visualizer, the
//! operator confirmation gate and the trajectory runner that drives moves
//! strictly one after another.
//!
//! Two transports are provided: a JSON-lines TCP client for a real
//! controller and an in-process simulated robot for dry runs.

pub mod gate;
pub mod robot;
pub mod runner;
pub mod visualization;

pub use gate::{is_affirmative, AutoGate, ConfirmationGate, PromptGate};
pub use robot::{
    protocol::JsonLineChannel,
    simulated::{SimulatedMotion, SimulatedRobot},
    tcp::{TcpConnector, TcpMotionService, TcpRobotClient},
    Credentials, MotionConstraints, MotionService, MoveRequest, MoveResult, PoseInFrame,
    RobotConnection, RobotConnector,
};
pub use runner::{FailurePolicy, RunReport, RunnerConfig, TrajectoryRunner};
pub use visualization::{LogVisualizer, TcpVisualizer, VisualizationSink};
