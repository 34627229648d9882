use armscribe_core::{CalibrationFrame, ColorRole, Orientation, Position, RawPoint, Segment};
use armscribe_planner::{
    plan_from_reader, ParserConfig, PlannerOptions, SegmentationPolicy, WaypointSynthesizer,
};
use proptest::prelude::*;

const LIFT: f64 = 15.0;

fn frame() -> CalibrationFrame {
    CalibrationFrame::new(Position::new(10.0, 20.0, 30.0), Orientation::default(), LIFT)
}

fn options() -> PlannerOptions {
    PlannerOptions {
        parser: ParserConfig::default(),
        segmentation: SegmentationPolicy::lettered(),
        calibration: frame(),
    }
}

/// A coordinate always written with a fractional part, so never an anchor
fn fractional() -> impl Strategy<Value = f64> {
    (-5000i32..5000).prop_map(|v| v as f64 / 10.0 + 0.05)
}

fn content_line() -> impl Strategy<Value = String> {
    (fractional(), fractional(), fractional())
        .prop_map(|(x, y, z)| format!("{:.2},{:.2},{:.2}", x, y, z))
}

#[derive(Debug, Clone)]
enum Line {
    Content(String),
    Marker,
}

fn body_line() -> impl Strategy<Value = Line> {
    prop_oneof![
        3 => content_line().prop_map(Line::Content),
        1 => Just(Line::Marker),
    ]
}

proptest! {
    #[test]
    fn header_is_never_a_point(
        header in content_line(),
        body in prop::collection::vec(content_line(), 0..10),
    ) {
        let input = format!("{}\n{}\n", header, body.join("\n"));
        let plan = plan_from_reader(input.as_bytes(), "prop", &options()).unwrap();
        prop_assert_eq!(plan.stats.points, body.len());
    }

    #[test]
    fn wrong_field_count_is_dropped(
        fields in prop::collection::vec(fractional(), 1..6)
            .prop_filter("not three", |f| f.len() != 3),
        tail in content_line(),
    ) {
        let bad: Vec<String> = fields.iter().map(|v| format!("{:.2}", v)).collect();
        let input = format!("x,y,z\n{}\n{}\n", bad.join(","), tail);
        let plan = plan_from_reader(input.as_bytes(), "prop", &options()).unwrap();
        prop_assert_eq!(plan.stats.dropped, 1);
        prop_assert_eq!(plan.stats.points, 1);
    }

    #[test]
    fn integer_planar_points_never_drawn(
        x in -1000i64..1000,
        y in -1000i64..1000,
        z in fractional(),
        body in prop::collection::vec(content_line(), 1..5),
    ) {
        let input = format!("x,y,z\n{},{},{:.2}\n{}\n", x, y, z, body.join("\n"));
        let plan = plan_from_reader(input.as_bytes(), "prop", &options()).unwrap();
        let drawn: usize = plan.segments.iter().map(|s| s.len()).sum();
        prop_assert_eq!(drawn, body.len());
        prop_assert_eq!(plan.stats.anchors, 1);
    }

    #[test]
    fn segment_count_matches_markers(lines in prop::collection::vec(body_line(), 0..30)) {
        let mut expected = 0;
        let mut pending = false;
        let mut text = String::from("x,y,z\n");
        for line in &lines {
            match line {
                Line::Content(l) => {
                    pending = true;
                    text.push_str(l);
                }
                Line::Marker => {
                    if pending {
                        expected += 1;
                    }
                    pending = false;
                    text.push_str("# --- Letter: ? ---");
                }
            }
            text.push('\n');
        }
        if pending {
            expected += 1;
        }

        let plan = plan_from_reader(text.as_bytes(), "prop", &options()).unwrap();
        prop_assert_eq!(plan.segments.len(), expected);
        prop_assert!(plan.segments.iter().all(|s| !s.is_empty()));
    }

    #[test]
    fn segment_yields_len_plus_two_waypoints(
        coords in prop::collection::vec((fractional(), fractional(), fractional()), 1..40),
    ) {
        let points: Vec<RawPoint> = coords
            .iter()
            .map(|&(x, y, z)| RawPoint::new(x, y, z))
            .collect();
        let segment = Segment::new(None, points.clone()).unwrap();
        let synth = WaypointSynthesizer::new(frame());
        let waypoints = synth.segment_waypoints(&segment);

        prop_assert_eq!(waypoints.len(), points.len() + 2);

        let last = waypoints.len() - 1;
        prop_assert_eq!(waypoints[0].role, ColorRole::Transition);
        prop_assert_eq!(waypoints[last].role, ColorRole::Transition);
        prop_assert_eq!(waypoints[0].pose.position.z, points[0].z + 30.0 + LIFT);
        prop_assert_eq!(waypoints[last].pose.position.z, points[points.len() - 1].z + 30.0 + LIFT);
        for (w, p) in waypoints[1..last].iter().zip(&points) {
            prop_assert_eq!(w.pose.position.z, p.z + 30.0);
            prop_assert!(w.role != ColorRole::Transition);
        }

        prop_assert_eq!(synth.segment_waypoints(&segment), waypoints);
    }
}
