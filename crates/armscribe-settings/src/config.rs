//! Configuration for armscribe
//!
//! Provides configuration file handling, defaults and validation.
//! Supports JSON and TOML file formats.
//!
//! Configuration is organized into sections:
//! - Connection (controller address, API key, service names, dry run)
//! - Arm (actuator name, orientation tolerance)
//! - Calibration (surface origin, pen orientation, lift distance)
//! - Text (point file and scale)
//! - Parser (delimiters, comment handling, segmentation)
//! - Palette (colour per waypoint role)
//! - Glyphs (font and layout for generating point files)

use std::fmt;
use std::path::{Path, PathBuf};

use armscribe_core::{CalibrationFrame, ColorRole, Orientation, Position};
use armscribe_planner::{
    CommentPolicy, GlyphLayout, ParserConfig, PlannerOptions, SegmentationMode,
    SegmentationPolicy,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{ConfigError, SettingsError, SettingsResult};

/// Environment variable naming the configuration file
pub const CONFIG_ENV: &str = "ARMSCRIBE_CONFIG";
/// Overrides `connection.address`
pub const ENV_ADDRESS: &str = "ARMSCRIBE_ADDRESS";
/// Overrides `connection.api_key_id`
pub const ENV_API_KEY_ID: &str = "ARMSCRIBE_API_KEY_ID";
/// Overrides `connection.api_key`
pub const ENV_API_KEY: &str = "ARMSCRIBE_API_KEY";

/// Robot controller connection settings
#[derive(Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConnectionSettings {
    /// Controller address, `host:port`
    pub address: String,
    /// API key id
    pub api_key_id: String,
    /// API key secret
    pub api_key: String,
    /// Name of the motion planning service
    pub motion_service: String,
    /// Frame every destination pose is expressed in
    pub reference_frame: String,
    /// Visualizer address; poses are only logged when absent
    pub visualizer_address: Option<String>,
    /// Drive a simulated robot instead of dialing the controller
    pub dry_run: bool,
}

impl Default for ConnectionSettings {
    fn default() -> Self {
        Self {
            address: String::new(),
            api_key_id: String::new(),
            api_key: String::new(),
            motion_service: "builtin".to_string(),
            reference_frame: "world".to_string(),
            visualizer_address: None,
            dry_run: false,
        }
    }
}

impl fmt::Debug for ConnectionSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectionSettings")
            .field("address", &self.address)
            .field("api_key_id", &self.api_key_id)
            .field("api_key", &"<redacted>")
            .field("motion_service", &self.motion_service)
            .field("reference_frame", &self.reference_frame)
            .field("visualizer_address", &self.visualizer_address)
            .field("dry_run", &self.dry_run)
            .finish()
    }
}

/// Arm settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArmSettings {
    /// Arm component name on the controller
    pub resource_name: String,
    /// Allowed orientation deviation while tracing, in degrees
    pub orientation_tolerance: f64,
}

impl Default for ArmSettings {
    fn default() -> Self {
        Self {
            resource_name: String::new(),
            orientation_tolerance: 1.0,
        }
    }
}

/// Where the writing surface is and how the pen is held
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CalibrationSettings {
    /// Origin X in millimetres
    pub x: f64,
    /// Origin Y in millimetres
    pub y: f64,
    /// Origin Z in millimetres (pen touching the surface)
    pub z: f64,
    /// Orientation vector X
    pub ox: f64,
    /// Orientation vector Y
    pub oy: f64,
    /// Orientation vector Z
    pub oz: f64,
    /// Rotation about the orientation vector, degrees
    pub theta_degrees: f64,
    /// Height of pen-up poses above the surface, millimetres
    pub lift_distance: f64,
}

impl Default for CalibrationSettings {
    fn default() -> Self {
        Self {
            x: 53.81019226834298,
            y: 261.357484082354,
            z: 57.03686307529803,
            ox: 0.348899278145762,
            oy: 0.0000407496998468827,
            oz: -0.937160228407803,
            theta_degrees: 0.007265004379393861,
            lift_distance: 20.0,
        }
    }
}

impl CalibrationSettings {
    /// The calibration frame these settings describe
    pub fn frame(&self) -> CalibrationFrame {
        CalibrationFrame::new(
            Position::new(self.x, self.y, self.z),
            Orientation::new(self.ox, self.oy, self.oz, self.theta_degrees),
            self.lift_distance,
        )
    }
}

/// Point file settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TextSettings {
    /// Point file to trace
    pub input_path: PathBuf,
    /// Multiplier applied to every coordinate in the file
    pub scale: f64,
}

impl Default for TextSettings {
    fn default() -> Self {
        Self {
            input_path: PathBuf::from("./generate_points/points3d.txt"),
            scale: 45.0,
        }
    }
}

/// How the point file is read and grouped
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParserSettings {
    /// Field separator
    pub delimiter: String,
    /// Lines starting with this are comments
    pub comment_prefix: String,
    /// Comments starting with this mark a segment boundary
    pub segment_marker_prefix: String,
    /// Whether markers are honoured or every comment is skipped
    pub comment_policy: CommentPolicy,
    /// Marker-delimited segments or one flat segment
    pub segmentation: SegmentationMode,
    /// Drop points whose planar coordinates are integer literals
    pub anchor_filtering: bool,
}

impl Default for ParserSettings {
    fn default() -> Self {
        let parser = ParserConfig::default();
        let policy = SegmentationPolicy::default();
        Self {
            delimiter: parser.delimiter,
            comment_prefix: parser.comment_prefix,
            segment_marker_prefix: parser.segment_marker_prefix,
            comment_policy: parser.comment_policy,
            segmentation: policy.mode,
            anchor_filtering: policy.anchor_filtering,
        }
    }
}

/// Visualization colour per waypoint role, `#RRGGBB`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PaletteSettings {
    /// First point of a segment
    pub segment_start: String,
    /// Last point of a segment
    pub segment_end: String,
    /// Lifted approach and retreat poses
    pub transition: String,
    /// Interior points
    pub content: String,
}

impl Default for PaletteSettings {
    fn default() -> Self {
        Self {
            segment_start: "#66BB6A".to_string(),
            segment_end: "#42A5F5".to_string(),
            transition: "#FFCA28".to_string(),
            content: "#EF5350".to_string(),
        }
    }
}

impl PaletteSettings {
    /// Colour for a waypoint role
    pub fn color_for(&self, role: ColorRole) -> &str {
        match role {
            ColorRole::SegmentStart => &self.segment_start,
            ColorRole::SegmentEnd => &self.segment_end,
            ColorRole::Transition => &self.transition,
            ColorRole::Content => &self.content,
        }
    }

    fn entries(&self) -> [(&'static str, &str); 4] {
        [
            ("palette.segment_start", &self.segment_start),
            ("palette.segment_end", &self.segment_end),
            ("palette.transition", &self.transition),
            ("palette.content", &self.content),
        ]
    }
}

/// Font and layout for the point file generator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GlyphSettings {
    /// System font family, or a generic name (`Sans`, `Serif`, `Monospace`)
    pub font_family: String,
    /// Font file to use instead of a system lookup
    pub font_path: Option<PathBuf>,
    /// Uniform glyph scale
    pub font_size: f64,
    /// Advance along X between letters
    pub spacing: f64,
}

impl Default for GlyphSettings {
    fn default() -> Self {
        let layout = GlyphLayout::default();
        Self {
            font_family: "Sans".to_string(),
            font_path: None,
            font_size: layout.font_size,
            spacing: layout.spacing,
        }
    }
}

impl GlyphSettings {
    /// Layout handed to the point writer
    pub fn layout(&self) -> GlyphLayout {
        GlyphLayout {
            font_size: self.font_size,
            spacing: self.spacing,
        }
    }
}

/// Complete run configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    /// Controller address, credentials and service names
    pub connection: ConnectionSettings,
    /// Arm component and motion constraints
    pub arm: ArmSettings,
    /// Where the drawing surface sits
    pub calibration: CalibrationSettings,
    /// Point file location and scale
    pub text: TextSettings,
    /// Point file format
    pub parser: ParserSettings,
    /// Colours per waypoint role
    pub palette: PaletteSettings,
    /// Text-to-points generator
    pub glyphs: GlyphSettings,
}

/// `<platform config dir>/armscribe/config.toml`
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("armscribe").join("config.toml"))
}

enum Format {
    Json,
    Toml,
}

fn format_of(path: &Path) -> SettingsResult<Format> {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some("json") => Ok(Format::Json),
        Some("toml") => Ok(Format::Toml),
        other => Err(ConfigError::UnsupportedFormat(other.unwrap_or("<none>").to_string()).into()),
    }
}

impl Config {
    /// Create new config with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a config file (JSON or TOML) without validating it
    pub fn read_from_file(path: &Path) -> SettingsResult<Self> {
        let format = format_of(path)?;
        let content = std::fs::read_to_string(path).map_err(|e| SettingsError::LoadError {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;

        let config = match format {
            Format::Json => serde_json::from_str(&content)?,
            Format::Toml => toml::from_str(&content)?,
        };
        Ok(config)
    }

    /// Load and validate a config file (JSON or TOML)
    pub fn load_from_file(path: &Path) -> SettingsResult<Self> {
        let config = Self::read_from_file(path)?;
        config.validate()?;
        Ok(config)
    }

    /// Save config to file (JSON or TOML)
    pub fn save_to_file(&self, path: &Path) -> SettingsResult<()> {
        self.validate()?;

        let content = match format_of(path)? {
            Format::Json => serde_json::to_string_pretty(self)?,
            Format::Toml => toml::to_string_pretty(self)?,
        };

        std::fs::write(path, content).map_err(|e| SettingsError::SaveError {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;

        Ok(())
    }

    /// Resolve the config file to use: `explicit`, else `ARMSCRIBE_CONFIG`,
    /// else the platform default if it exists
    pub fn locate(explicit: Option<&Path>) -> Option<PathBuf> {
        if let Some(path) = explicit {
            return Some(path.to_path_buf());
        }
        if let Some(path) = std::env::var_os(CONFIG_ENV).filter(|p| !p.is_empty()) {
            return Some(PathBuf::from(path));
        }
        default_config_path().filter(|p| p.is_file())
    }

    /// Load the run configuration: read the located file (or start from
    /// defaults), apply environment overrides, validate
    pub fn load(explicit: Option<&Path>) -> SettingsResult<Self> {
        let mut config = match Self::locate(explicit) {
            Some(path) => {
                info!("Loading configuration from {}", path.display());
                Self::read_from_file(&path)?
            }
            None => {
                info!("No configuration file found, using defaults");
                Self::default()
            }
        };
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// Replace connection fields from `ARMSCRIBE_*` environment variables
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides_from(|key| std::env::var(key).ok());
    }

    /// Replace connection fields from a variable lookup. Empty values are
    /// ignored.
    pub fn apply_overrides_from<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let fields: [(&str, &mut String); 3] = [
            (ENV_ADDRESS, &mut self.connection.address),
            (ENV_API_KEY_ID, &mut self.connection.api_key_id),
            (ENV_API_KEY, &mut self.connection.api_key),
        ];
        for (key, field) in fields {
            if let Some(value) = lookup(key).filter(|v| !v.is_empty()) {
                debug!("Overriding connection setting from {}", key);
                *field = value;
            }
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> SettingsResult<()> {
        if !self.connection.dry_run {
            let required = [
                ("connection.address", &self.connection.address),
                ("connection.api_key_id", &self.connection.api_key_id),
                ("connection.api_key", &self.connection.api_key),
                ("arm.resource_name", &self.arm.resource_name),
            ];
            for (key, value) in required {
                if value.trim().is_empty() {
                    return Err(ConfigError::MissingKey(key.to_string()).into());
                }
            }
        }

        if self.connection.motion_service.trim().is_empty() {
            return Err(ConfigError::MissingKey("connection.motion_service".to_string()).into());
        }
        if self.connection.reference_frame.trim().is_empty() {
            return Err(ConfigError::MissingKey("connection.reference_frame".to_string()).into());
        }

        if !(self.text.scale.is_finite() && self.text.scale > 0.0) {
            return Err(out_of_range("text.scale", self.text.scale));
        }

        let cal = &self.calibration;
        let finite = [cal.x, cal.y, cal.z, cal.ox, cal.oy, cal.oz, cal.theta_degrees];
        if finite.iter().any(|v| !v.is_finite()) {
            return Err(SettingsError::invalid(
                "calibration",
                "all values must be finite",
            ));
        }
        if !(cal.lift_distance.is_finite() && cal.lift_distance >= 0.0) {
            return Err(out_of_range(
                "calibration.lift_distance",
                cal.lift_distance,
            ));
        }
        if cal.frame().orientation.is_degenerate() {
            return Err(SettingsError::invalid(
                "calibration",
                "orientation vector must be non-zero",
            ));
        }

        let tolerance = self.arm.orientation_tolerance;
        if !(tolerance.is_finite() && tolerance >= 0.0) {
            return Err(out_of_range("arm.orientation_tolerance", tolerance));
        }

        for (key, color) in self.palette.entries() {
            if !is_hex_color(color) {
                return Err(SettingsError::invalid(
                    key,
                    format!("'{}' is not a #RRGGBB colour", color),
                ));
            }
        }

        let parser = &self.parser;
        for (key, value) in [
            ("parser.delimiter", &parser.delimiter),
            ("parser.comment_prefix", &parser.comment_prefix),
            ("parser.segment_marker_prefix", &parser.segment_marker_prefix),
        ] {
            if value.is_empty() {
                return Err(SettingsError::invalid(key, "must not be empty"));
            }
        }
        if !parser
            .segment_marker_prefix
            .starts_with(&parser.comment_prefix)
        {
            return Err(SettingsError::invalid(
                "parser.segment_marker_prefix",
                "must start with the comment prefix",
            ));
        }

        if !(self.glyphs.font_size.is_finite() && self.glyphs.font_size > 0.0) {
            return Err(out_of_range("glyphs.font_size", self.glyphs.font_size));
        }
        if !self.glyphs.spacing.is_finite() {
            return Err(out_of_range("glyphs.spacing", self.glyphs.spacing));
        }

        Ok(())
    }

    /// Planner options for this configuration
    pub fn planner_options(&self) -> PlannerOptions {
        PlannerOptions {
            parser: ParserConfig {
                delimiter: self.parser.delimiter.clone(),
                comment_prefix: self.parser.comment_prefix.clone(),
                segment_marker_prefix: self.parser.segment_marker_prefix.clone(),
                comment_policy: self.parser.comment_policy,
                scale: self.text.scale,
            },
            segmentation: SegmentationPolicy {
                mode: self.parser.segmentation,
                anchor_filtering: self.parser.anchor_filtering,
            },
            calibration: self.calibration.frame(),
        }
    }
}

fn out_of_range(key: &str, value: f64) -> SettingsError {
    ConfigError::ValueOutOfRange {
        key: key.to_string(),
        value: value.to_string(),
    }
    .into()
}

fn is_hex_color(s: &str) -> bool {
    s.len() == 7
        && s.starts_with('#')
        && s[1..].chars().all(|c| c.is_ascii_hexdigit())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid() -> Config {
        let mut config = Config::default();
        config.connection.address = "robot.local:8080".to_string();
        config.connection.api_key_id = "id".to_string();
        config.connection.api_key = "secret".to_string();
        config.arm.resource_name = "arm-1".to_string();
        config
    }

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.connection.motion_service, "builtin");
        assert_eq!(config.connection.reference_frame, "world");
        assert_eq!(config.arm.orientation_tolerance, 1.0);
        assert_eq!(config.text.scale, 45.0);
        assert_eq!(config.calibration.lift_distance, 20.0);
        assert_eq!(config.palette.content, "#EF5350");
        assert_eq!(config.parser.segment_marker_prefix, "# ---");
        assert!(config.parser.anchor_filtering);
    }

    #[test]
    fn test_defaults_only_valid_in_dry_run() {
        let mut config = Config::default();
        assert!(matches!(
            config.validate(),
            Err(SettingsError::Config(ConfigError::MissingKey(_)))
        ));
        config.connection.dry_run = true;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validation_rejects_bad_values() {
        let mut config = valid();
        assert!(config.validate().is_ok());

        config.text.scale = 0.0;
        assert!(config.validate().is_err());
        config.text.scale = f64::NAN;
        assert!(config.validate().is_err());

        let mut config = valid();
        config.calibration.lift_distance = -1.0;
        assert!(config.validate().is_err());

        let mut config = valid();
        config.calibration.ox = 0.0;
        config.calibration.oy = 0.0;
        config.calibration.oz = 0.0;
        assert!(config.validate().is_err());

        let mut config = valid();
        config.calibration.ox = 1e-20;
        config.calibration.oy = 0.0;
        config.calibration.oz = 0.0;
        assert!(config.validate().is_err());

        let mut config = valid();
        config.palette.transition = "yellow".to_string();
        assert!(config.validate().is_err());

        let mut config = valid();
        config.parser.segment_marker_prefix = "// ---".to_string();
        assert!(config.validate().is_err());

        let mut config = valid();
        config.parser.delimiter.clear();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_palette_lookup() {
        let palette = PaletteSettings::default();
        assert_eq!(palette.color_for(ColorRole::Content), "#EF5350");
        assert_eq!(palette.color_for(ColorRole::Transition), "#FFCA28");
    }

    #[test]
    fn test_hex_color() {
        assert!(is_hex_color("#a1B2c3"));
        assert!(!is_hex_color("a1B2c3"));
        assert!(!is_hex_color("#a1B2c"));
        assert!(!is_hex_color("#g1B2c3"));
    }

    #[test]
    fn test_env_overrides() {
        let mut config = Config::default();
        config.apply_overrides_from(|key| match key {
            ENV_ADDRESS => Some("10.0.0.2:8080".to_string()),
            ENV_API_KEY => Some("from-env".to_string()),
            ENV_API_KEY_ID => Some(String::new()),
            _ => None,
        });
        assert_eq!(config.connection.address, "10.0.0.2:8080");
        assert_eq!(config.connection.api_key, "from-env");
        assert_eq!(config.connection.api_key_id, "");
    }

    #[test]
    fn test_debug_redacts_api_key() {
        let config = valid();
        let dbg = format!("{:?}", config);
        assert!(!dbg.contains("secret"));
        assert!(dbg.contains("robot.local:8080"));
    }

    #[test]
    fn test_planner_options() {
        let mut config = valid();
        config.parser.segmentation = SegmentationMode::FlatList;
        config.parser.anchor_filtering = false;
        config.text.scale = 2.0;

        let options = config.planner_options();
        assert_eq!(options.parser.scale, 2.0);
        assert_eq!(options.segmentation, SegmentationPolicy::flat());
        assert_eq!(options.calibration.lift_distance, 20.0);
    }
}
