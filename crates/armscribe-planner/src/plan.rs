//! Point file to waypoint plan.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use armscribe_core::{CalibrationFrame, InputError, Pose, Result, Segment, Waypoint};
use tracing::info;

use crate::parser::{ParseStats, ParserConfig, PointRecordParser};
use crate::segment::{SegmentBuilder, SegmentationPolicy};
use crate::waypoint::WaypointSynthesizer;

/// Everything needed to plan a run
#[derive(Debug, Clone, PartialEq)]
pub struct PlannerOptions {
    /// How lines are read
    pub parser: ParserConfig,
    /// How records are grouped into segments
    pub segmentation: SegmentationPolicy,
    /// Where points land in the robot frame
    pub calibration: CalibrationFrame,
}

/// Result of planning: segments, waypoints and parse counters
#[derive(Debug, Clone, PartialEq)]
pub struct Plan {
    /// Segments in file order
    pub segments: Vec<Segment>,
    /// Waypoints in visiting order
    pub waypoints: Vec<Waypoint>,
    /// Pose reached before the first waypoint
    pub initial_pose: Pose,
    /// Parser counters
    pub stats: ParseStats,
}

impl Plan {
    /// Waypoint poses in visiting order
    pub fn poses(&self) -> Vec<Pose> {
        self.waypoints.iter().map(|w| w.pose).collect()
    }
}

/// Open the point file. Failure is fatal for the run.
pub fn open_point_source(path: &Path) -> Result<BufReader<File>> {
    let file = File::open(path).map_err(|e| InputError::Unreadable {
        source_name: path.display().to_string(),
        reason: e.to_string(),
    })?;
    Ok(BufReader::new(file))
}

/// Plan from any buffered reader
pub fn plan_from_reader<R: BufRead>(
    reader: R,
    source_name: &str,
    options: &PlannerOptions,
) -> Result<Plan> {
    let mut parser = PointRecordParser::from_reader(reader, options.parser.clone())
        .with_source_name(source_name);
    let segments = SegmentBuilder::build(options.segmentation, parser.by_ref())?;
    let stats = *parser.stats();

    let synthesizer = WaypointSynthesizer::new(options.calibration);
    let waypoints = synthesizer.synthesize(&segments);
    let initial_pose = synthesizer.mapper().initial_pose();

    info!(
        source = source_name,
        lines = stats.lines_read,
        points = stats.points,
        anchors = stats.anchors,
        markers = stats.markers,
        comments = stats.comments_skipped,
        dropped = stats.dropped,
        segments = segments.len(),
        waypoints = waypoints.len(),
        "Planned trajectory"
    );

    Ok(Plan {
        segments,
        waypoints,
        initial_pose,
        stats,
    })
}

/// Plan from a file on disk
pub fn plan_from_file(path: &Path, options: &PlannerOptions) -> Result<Plan> {
    let reader = open_point_source(path)?;
    plan_from_reader(reader, &path.display().to_string(), options)
}
