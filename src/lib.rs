//! # Armscribe
//!
//! Traces handwriting-style point files with a robot arm.
//!
//! ## Architecture
//!
//! Armscribe is organized as a workspace with multiple crates:
//!
//! 1. **armscribe-core** - Points, segments, poses, waypoints and errors
//! 2. **armscribe-planner** - Point-file parsing, segmentation, pose mapping,
//!    pen-lift waypoint synthesis, text to point-file generation
//! 3. **armscribe-communication** - Robot session, motion service,
//!    visualizer, confirmation gate, trajectory runner
//! 4. **armscribe-settings** - Configuration loading and validation
//! 5. **armscribe** - The pipeline and the binaries
//!
//! A run has two phases separated by an operator confirmation: planning
//! (parse, plan, visualize) touches nothing physical; execution connects to
//! the controller and moves the arm through every waypoint in order.

pub mod pipeline;

pub use armscribe_core::{Error, Result};
pub use armscribe_settings::Config;
pub use pipeline::{colors_for, execute, plan, run, visualize, Outcome, CONFIRM_PROMPT};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Build date (set at compile time)
pub const BUILD_DATE: &str = env!("BUILD_DATE");

/// Initialize logging with the default configuration
///
/// Sets up structured logging with:
/// - Console output with pretty formatting
/// - RUST_LOG environment variable support (INFO when unset)
pub fn init_logging() -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::EnvFilter;

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(tracing::Level::INFO.to_string()));

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stdout)
        .with_target(true)
        .with_level(true)
        .with_thread_ids(true)
        .with_thread_names(true)
        .with_line_number(true)
        .pretty();

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init()?;

    Ok(())
}
