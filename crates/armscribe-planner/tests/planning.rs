use std::io::Write;

use armscribe_core::{CalibrationFrame, ColorRole, Orientation, Position};
use armscribe_planner::{
    plan_from_file, plan_from_reader, CommentPolicy, ParserConfig, PlannerOptions,
    SegmentationPolicy,
};

fn options() -> PlannerOptions {
    PlannerOptions {
        parser: ParserConfig::default(),
        segmentation: SegmentationPolicy::lettered(),
        calibration: CalibrationFrame::new(
            Position::new(100.0, 200.0, 50.0),
            Orientation::new(0.0, 0.0, -1.0, 0.0),
            20.0,
        ),
    }
}

#[test]
fn test_anchor_dropped_scenario() {
    let input = "x,y,z\n1,1,5\n1.0,2.0,3.0\n4.0,5.0,6.0\n# --- Letter: A\n";
    let plan = plan_from_reader(input.as_bytes(), "scenario", &options()).unwrap();

    assert_eq!(plan.segments.len(), 1);
    assert_eq!(plan.segments[0].len(), 2);
    assert_eq!(plan.waypoints.len(), 4);

    let roles: Vec<ColorRole> = plan.waypoints.iter().map(|w| w.role).collect();
    assert_eq!(
        roles,
        vec![
            ColorRole::Transition,
            ColorRole::SegmentStart,
            ColorRole::SegmentEnd,
            ColorRole::Transition,
        ]
    );

    assert_eq!(plan.waypoints[0].pose.position.z, 50.0 + 3.0 + 20.0);
    assert_eq!(plan.waypoints[1].pose.position.z, 50.0 + 3.0);
    assert_eq!(plan.waypoints[2].pose.position.z, 50.0 + 6.0);
    assert_eq!(plan.waypoints[3].pose.position.z, 50.0 + 6.0 + 20.0);
    assert_eq!(plan.stats.anchors, 1);
}

#[test]
fn test_malformed_line_does_not_stop_parsing() {
    let input = "x,y,z\n1.0,2.0\n3.5,4.5,0.0\n5.5,6.5,0.0\n";
    let plan = plan_from_reader(input.as_bytes(), "scenario", &options()).unwrap();
    assert_eq!(plan.stats.dropped, 1);
    assert_eq!(plan.segments[0].len(), 2);
    assert_eq!(plan.waypoints.len(), 4);
}

#[test]
fn test_latin1_comment_does_not_stop_parsing() {
    let input: &[u8] = b"x,y,z\n0.5,0.5,0.0\n# caf\xE9\n1.5,1.5,0.0\n2.5,2.5,0.0\n";
    let plan = plan_from_reader(input, "latin1", &options()).unwrap();
    assert_eq!(plan.stats.dropped, 1);
    assert_eq!(plan.stats.points, 3);
    assert_eq!(plan.segments.len(), 1);
    assert_eq!(plan.segments[0].len(), 3);
    assert_eq!(plan.waypoints.len(), 5);
}

#[test]
fn test_generated_file_layout() {
    let input = "x, y, z  # letter\n\
                 # --- Letter: H ---\n\
                 0.5000, 0.0000, 0.0000\n\
                 0.5000, 30.0000, 0.0000\n\
                 # --- Letter:   ---\n\
                 # --- Letter: i ---\n\
                 32.1000, 0.0000, 0.0000\n";
    let plan = plan_from_reader(input.as_bytes(), "generated", &options()).unwrap();
    let labels: Vec<Option<&str>> = plan.segments.iter().map(|s| s.label()).collect();
    assert_eq!(labels, vec![Some("H"), Some("i")]);
    assert_eq!(plan.waypoints.len(), 4 + 3);
}

#[test]
fn test_flat_variant() {
    let mut opts = options();
    opts.parser.comment_policy = CommentPolicy::Skip;
    opts.segmentation = SegmentationPolicy::flat();
    let input =
        "x,y,z\n1,1,5\n# --- Letter: A ---\n1.5,2.5,0.0\n# --- Letter: B ---\n3.5,4.5,0.0\n";
    let plan = plan_from_reader(input.as_bytes(), "flat", &opts).unwrap();
    assert_eq!(plan.segments.len(), 1);
    assert_eq!(plan.segments[0].len(), 3);
    assert_eq!(plan.stats.comments_skipped, 2);
}

#[test]
fn test_initial_pose_is_lifted_origin() {
    let plan = plan_from_reader("x,y,z\n".as_bytes(), "empty", &options()).unwrap();
    assert!(plan.waypoints.is_empty());
    assert_eq!(plan.initial_pose.position, Position::new(100.0, 200.0, 70.0));
}

#[test]
fn test_plan_from_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(file, "x,y,z\n0.5,0.5,0.0\n").unwrap();
    let plan = plan_from_file(file.path(), &options()).unwrap();
    assert_eq!(plan.waypoints.len(), 3);
}

#[test]
fn test_missing_file_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let err = plan_from_file(&dir.path().join("missing.txt"), &options()).unwrap_err();
    assert!(err.is_input_error());
}
