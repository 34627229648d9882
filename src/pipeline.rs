//! The two-phase run
//!
//! Phase one plans the trajectory from the point file and sends it to the
//! visualizer. Nothing physical happens until the confirmation gate
//! accepts. Phase two opens the controller session, drives the trajectory
//! and always closes the session, whether or not the moves succeeded.

use armscribe_communication::{
    ConfirmationGate, Credentials, RobotConnection, RobotConnector, RunReport, RunnerConfig,
    TrajectoryRunner, VisualizationSink,
};
use armscribe_core::Result;
use armscribe_planner::{plan_from_file, Plan};
use armscribe_settings::{Config, PaletteSettings};
use tracing::{error, info, warn};

/// Question asked before any motion
pub const CONFIRM_PROMPT: &str = "Poses drawn. Move the arm through them?";

/// How a run ended without error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The operator declined; no motion was issued
    Declined,
    /// Every waypoint was reached
    Completed(RunReport),
}

/// Plan the configured point file
pub fn plan(config: &Config) -> Result<Plan> {
    info!("Planning from {}", config.text.input_path.display());
    plan_from_file(&config.text.input_path, &config.planner_options())
}

/// One palette colour per waypoint, parallel to the waypoint list
pub fn colors_for(plan: &Plan, palette: &PaletteSettings) -> Vec<String> {
    plan.waypoints
        .iter()
        .map(|w| palette.color_for(w.role).to_string())
        .collect()
}

/// Clear the visualizer and draw every planned pose
pub async fn visualize(
    sink: &dyn VisualizationSink,
    plan: &Plan,
    palette: &PaletteSettings,
) -> Result<()> {
    sink.remove_all().await?;
    sink.draw_poses(&plan.poses(), &colors_for(plan, palette), true).await
}

/// Connect, drive the plan, and close the session on every path
pub async fn execute(
    config: &Config,
    plan: &Plan,
    connector: &dyn RobotConnector,
) -> Result<RunReport> {
    let credentials = Credentials::new(
        config.connection.api_key_id.clone(),
        config.connection.api_key.clone(),
    );
    let mut connection = connector
        .connect(&config.connection.address, &credentials)
        .await?;

    let result = drive(connection.as_ref(), config, plan).await;

    if let Err(e) = connection.close().await {
        warn!("Failed to close robot connection: {}", e);
    }
    result
}

async fn drive(
    connection: &dyn RobotConnection,
    config: &Config,
    plan: &Plan,
) -> Result<RunReport> {
    let motion = connection
        .motion_service(&config.connection.motion_service)
        .await?;

    let mut runner_config =
        RunnerConfig::new(config.arm.resource_name.clone(), config.arm.orientation_tolerance);
    runner_config.reference_frame = config.connection.reference_frame.clone();

    TrajectoryRunner::new(motion.as_ref(), runner_config)
        .run(&plan.initial_pose, &plan.waypoints)
        .await
}

/// Run both phases with the given collaborators
pub async fn run(
    config: &Config,
    visualizer: &dyn VisualizationSink,
    gate: &mut dyn ConfirmationGate,
    connector: &dyn RobotConnector,
) -> Result<Outcome> {
    let plan = plan(config)?;

    visualize(visualizer, &plan, &config.palette).await?;

    if !gate.confirm(CONFIRM_PROMPT)? {
        info!("Motion declined, exiting without moving");
        return Ok(Outcome::Declined);
    }

    match execute(config, &plan, connector).await {
        Ok(report) => Ok(Outcome::Completed(report)),
        Err(e) => {
            error!("Run aborted: {}", e);
            Err(e)
        }
    }
}
