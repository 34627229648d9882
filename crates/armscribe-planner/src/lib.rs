//! # Armscribe Planner
//!
//! Turns a point file into a waypoint plan:
//! 1. **parser** - lines to scaled points and segment markers
//! 2. **segment** - points grouped into letters, anchors filtered
//! 3. **pose_mapper** - points mapped through the calibration frame
//! 4. **waypoint** - pen-lift transitions and colour roles per letter
//!
//! **glyphs** produces point files from text.

pub mod glyphs;
pub mod parser;
pub mod plan;
pub mod pose_mapper;
pub mod segment;
pub mod waypoint;

pub use glyphs::{load_font, write_text_points, GlyphLayout, POINT_FILE_HEADER};
pub use parser::{CommentPolicy, ParseStats, ParserConfig, PointRecordParser, Record};
pub use plan::{open_point_source, plan_from_file, plan_from_reader, Plan, PlannerOptions};
pub use pose_mapper::{map_point, PoseMapper};
pub use segment::{SegmentBuilder, SegmentationMode, SegmentationPolicy};
pub use waypoint::{content_role, WaypointSynthesizer};
