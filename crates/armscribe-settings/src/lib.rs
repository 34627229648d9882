//! Armscribe Settings Crate
//!
//! Loads, validates and saves the run configuration: where the robot is,
//! how to authenticate, the calibration frame, the point file and how to
//! read it, and the visualization palette.

pub mod config;
pub mod error;

pub use config::{
    default_config_path, ArmSettings, CalibrationSettings, Config, ConnectionSettings,
    GlyphSettings, PaletteSettings, ParserSettings, TextSettings, CONFIG_ENV, ENV_ADDRESS,
    ENV_API_KEY, ENV_API_KEY_ID,
};
pub use error::{ConfigError, SettingsError, SettingsResult};
