//! Letter segmentation
//!
//! Groups parsed records into [`Segment`]s. In marker-delimited mode a marker
//! seals the current accumulator; in flat-list mode every point lands in one
//! segment. Anchor points are dropped when anchor filtering is on.

use armscribe_core::{RawPoint, Result, Segment};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::parser::Record;

/// How points are grouped
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SegmentationMode {
    /// Markers split the stream into letters
    #[default]
    MarkerDelimited,
    /// All points form a single segment; markers are ignored
    FlatList,
}

/// Grouping and filtering policy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SegmentationPolicy {
    /// How points are grouped
    pub mode: SegmentationMode,
    /// Drop anchor points instead of drawing them
    pub anchor_filtering: bool,
}

impl SegmentationPolicy {
    /// Letters separated by markers, anchors dropped
    pub fn lettered() -> Self {
        Self {
            mode: SegmentationMode::MarkerDelimited,
            anchor_filtering: true,
        }
    }

    /// One segment, every point drawn
    pub fn flat() -> Self {
        Self {
            mode: SegmentationMode::FlatList,
            anchor_filtering: false,
        }
    }
}

impl Default for SegmentationPolicy {
    fn default() -> Self {
        Self::lettered()
    }
}

/// Accumulates records into segments
#[derive(Debug)]
pub struct SegmentBuilder {
    policy: SegmentationPolicy,
    current: Vec<RawPoint>,
    current_label: Option<String>,
    segments: Vec<Segment>,
    anchors_skipped: usize,
}

impl SegmentBuilder {
    /// Create a builder with an empty accumulator
    pub fn new(policy: SegmentationPolicy) -> Self {
        Self {
            policy,
            current: Vec::new(),
            current_label: None,
            segments: Vec::new(),
            anchors_skipped: 0,
        }
    }

    /// Group a whole record stream. Stops at the first fatal error.
    pub fn build<I>(policy: SegmentationPolicy, records: I) -> Result<Vec<Segment>>
    where
        I: IntoIterator<Item = Result<Record>>,
    {
        let mut builder = Self::new(policy);
        for record in records {
            builder.push(record?);
        }
        Ok(builder.finish())
    }

    /// Feed one record
    pub fn push(&mut self, record: Record) {
        match record {
            Record::Point {
                point,
                anchor,
                line_number,
            } => {
                if anchor && self.policy.anchor_filtering {
                    self.anchors_skipped += 1;
                    warn!(line_number, "Skipping anchor point {}", point);
                    return;
                }
                self.current.push(point);
            }
            Record::Marker { label, line_number } => match self.policy.mode {
                SegmentationMode::MarkerDelimited => {
                    if self.current.is_empty() {
                        debug!(line_number, "Marker with no pending points");
                    } else {
                        self.seal();
                    }
                    self.current_label = label;
                }
                SegmentationMode::FlatList => {
                    debug!(line_number, "Ignoring marker in flat-list mode");
                }
            },
        }
    }

    /// Anchor points dropped so far
    pub fn anchors_skipped(&self) -> usize {
        self.anchors_skipped
    }

    /// Seal the last accumulator and return every segment in input order
    pub fn finish(mut self) -> Vec<Segment> {
        if !self.current.is_empty() {
            self.seal();
        }
        self.segments
    }

    fn seal(&mut self) {
        let points = std::mem::take(&mut self.current);
        let label = self.current_label.take();
        if let Some(segment) = Segment::new(label, points) {
            debug!(
                label = segment.label().unwrap_or("-"),
                points = segment.len(),
                "Sealed segment"
            );
            self.segments.push(segment);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn point(x: f64, y: f64, anchor: bool) -> Record {
        Record::Point {
            point: RawPoint::new(x, y, 0.0),
            anchor,
            line_number: 0,
        }
    }

    fn marker(label: &str) -> Record {
        Record::Marker {
            label: Some(label.to_string()),
            line_number: 0,
        }
    }

    #[test]
    fn test_markers_split_segments() {
        let mut b = SegmentBuilder::new(SegmentationPolicy::lettered());
        b.push(marker("A"));
        b.push(point(0.5, 0.5, false));
        b.push(point(1.5, 0.5, false));
        b.push(marker("B"));
        b.push(point(2.5, 0.5, false));
        let segments = b.finish();
        assert_eq!(segments.len(), 2);
        assert_eq!(segments[0].label(), Some("A"));
        assert_eq!(segments[0].len(), 2);
        assert_eq!(segments[1].label(), Some("B"));
        assert_eq!(segments[1].len(), 1);
    }

    #[test]
    fn test_consecutive_markers_emit_nothing() {
        let mut b = SegmentBuilder::new(SegmentationPolicy::lettered());
        b.push(marker("A"));
        b.push(marker("B"));
        b.push(marker("C"));
        assert!(b.finish().is_empty());
    }

    #[test]
    fn test_anchor_filtering() {
        let mut b = SegmentBuilder::new(SegmentationPolicy::lettered());
        b.push(point(1.0, 1.0, true));
        b.push(point(0.5, 0.5, false));
        assert_eq!(b.anchors_skipped(), 1);
        let segments = b.finish();
        assert_eq!(segments[0].points(), &[RawPoint::new(0.5, 0.5, 0.0)]);
    }

    #[test]
    fn test_segment_of_only_anchors_is_not_emitted() {
        let mut b = SegmentBuilder::new(SegmentationPolicy::lettered());
        b.push(point(0.0, 0.0, true));
        b.push(marker("A"));
        b.push(point(2.0, 3.0, true));
        assert!(b.finish().is_empty());
    }

    #[test]
    fn test_flat_list_keeps_anchors_and_ignores_markers() {
        let mut b = SegmentBuilder::new(SegmentationPolicy::flat());
        b.push(point(1.0, 1.0, true));
        b.push(marker("A"));
        b.push(point(0.5, 0.5, false));
        let segments = b.finish();
        assert_eq!(segments.len(), 1);
        assert_eq!(segments[0].len(), 2);
        assert_eq!(segments[0].label(), None);
    }
}
