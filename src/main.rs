use std::path::PathBuf;

use armscribe::{init_logging, Outcome, BUILD_DATE, VERSION};
use armscribe_communication::{
    LogVisualizer, PromptGate, RobotConnector, SimulatedRobot, TcpConnector, TcpVisualizer,
    VisualizationSink,
};
use armscribe_settings::Config;
use tracing::info;

fn main() -> anyhow::Result<()> {
    init_logging()?;
    info!("armscribe {} (built {})", VERSION, BUILD_DATE);

    let config_path = std::env::args_os().nth(1).map(PathBuf::from);
    let config = Config::load(config_path.as_deref())?;

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    let outcome = runtime.block_on(async {
        let visualizer: Box<dyn VisualizationSink> = match &config.connection.visualizer_address {
            Some(address) => Box::new(TcpVisualizer::connect(address).await?),
            None => Box::new(LogVisualizer),
        };
        let connector: Box<dyn RobotConnector> = if config.connection.dry_run {
            info!("Dry run: moves go to a simulated robot");
            Box::new(SimulatedRobot::new())
        } else {
            Box::new(TcpConnector)
        };
        let mut gate = PromptGate::stdio();

        armscribe::run(&config, visualizer.as_ref(), &mut gate, connector.as_ref()).await
    })?;

    match outcome {
        Outcome::Declined => info!("Nothing moved"),
        Outcome::Completed(report) => info!(
            waypoints = report.waypoints_completed,
            "Done tracing"
        ),
    }
    Ok(())
}
