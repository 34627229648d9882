//! Point file parser
//!
//! Turns the lines of a point file into [`Record`]s lazily, one pass over the
//! source. The first line is always a header. Comment lines either mark a
//! segment boundary or are skipped, depending on [`CommentPolicy`]. Lines that
//! do not hold exactly three numbers are logged and dropped; parsing never
//! stops for bad data, only for a source that cannot be read.

use std::io::{self, BufRead};

use armscribe_core::{Error, InputError, RawPoint, Result};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Number of fields in a point record
pub const POINT_FIELDS: usize = 3;

/// What to do with lines starting with the comment prefix
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CommentPolicy {
    /// Lines starting with the segment-marker prefix are segment boundaries;
    /// other comments are skipped
    #[default]
    SegmentMarkers,
    /// Every comment line is skipped
    Skip,
}

/// Parser configuration
#[derive(Debug, Clone, PartialEq)]
pub struct ParserConfig {
    /// Field delimiter
    pub delimiter: String,
    /// Prefix marking a comment line
    pub comment_prefix: String,
    /// Prefix marking a segment boundary (itself a comment)
    pub segment_marker_prefix: String,
    /// Comment handling
    pub comment_policy: CommentPolicy,
    /// Multiplier applied to every coordinate
    pub scale: f64,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            delimiter: ",".to_string(),
            comment_prefix: "#".to_string(),
            segment_marker_prefix: "# ---".to_string(),
            comment_policy: CommentPolicy::SegmentMarkers,
            scale: 1.0,
        }
    }
}

/// One meaningful line of the point file
#[derive(Debug, Clone, PartialEq)]
pub enum Record {
    /// A scaled point
    Point {
        /// The point, scaled
        point: RawPoint,
        /// Both planar fields were written as integer literals
        anchor: bool,
        /// 1-based line number
        line_number: usize,
    },
    /// A segment boundary
    Marker {
        /// Text of the marker, if any
        label: Option<String>,
        /// 1-based line number
        line_number: usize,
    },
}

/// Counters kept while parsing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ParseStats {
    /// Lines read, header included
    pub lines_read: usize,
    /// Point records emitted
    pub points: usize,
    /// Of those, anchor points
    pub anchors: usize,
    /// Segment markers emitted
    pub markers: usize,
    /// Comment lines skipped
    pub comments_skipped: usize,
    /// Lines dropped as malformed
    pub dropped: usize,
}

/// Lazy parser over a line source
pub struct PointRecordParser<L> {
    lines: L,
    config: ParserConfig,
    source_name: String,
    line_number: usize,
    stats: ParseStats,
    finished: bool,
}

impl<R: BufRead> PointRecordParser<io::Split<R>> {
    /// Parse the lines of a buffered reader
    ///
    /// Lines are split on raw bytes so a line that is not UTF-8 is dropped
    /// on its own instead of failing the read.
    pub fn from_reader(reader: R, config: ParserConfig) -> Self {
        Self::new(reader.split(b'\n'), config)
    }
}

impl<L, T> PointRecordParser<L>
where
    L: Iterator<Item = io::Result<T>>,
    T: Into<Vec<u8>>,
{
    /// Create a parser over any line iterator (`String` or raw byte lines)
    pub fn new(lines: L, config: ParserConfig) -> Self {
        Self {
            lines,
            config,
            source_name: "<input>".to_string(),
            line_number: 0,
            stats: ParseStats::default(),
            finished: false,
        }
    }

    /// Name used for the source in error messages
    pub fn with_source_name(mut self, name: impl Into<String>) -> Self {
        self.source_name = name.into();
        self
    }

    /// Counters so far
    pub fn stats(&self) -> &ParseStats {
        &self.stats
    }

    fn parse_line(&mut self, line: &str) -> Option<Record> {
        let line_number = self.line_number;

        if line.starts_with(self.config.comment_prefix.as_str()) {
            if self.config.comment_policy == CommentPolicy::SegmentMarkers
                && line.starts_with(self.config.segment_marker_prefix.as_str())
            {
                self.stats.markers += 1;
                let label = marker_label(&line[self.config.segment_marker_prefix.len()..]);
                debug!(line_number, ?label, "Segment marker");
                return Some(Record::Marker { label, line_number });
            }
            self.stats.comments_skipped += 1;
            warn!(line_number, "Skipping comment line: {}", line);
            return None;
        }

        let fields: Vec<&str> = line.split(self.config.delimiter.as_str()).collect();
        if fields.len() != POINT_FIELDS {
            self.stats.dropped += 1;
            let err = InputError::FieldCount {
                line_number,
                expected: POINT_FIELDS,
                found: fields.len(),
            };
            if line.trim().is_empty() {
                debug!(line_number, "Skipping blank line");
            } else {
                warn!(line_number, "Skipping malformed line: {} ({})", line, err);
            }
            return None;
        }

        match parse_fields(&fields, line_number) {
            Ok(values) => {
                let anchor = is_integer_literal(fields[0]) && is_integer_literal(fields[1]);
                let [x, y, z] = values.map(|v| v * self.config.scale);
                if !(x.is_finite() && y.is_finite() && z.is_finite()) {
                    self.stats.dropped += 1;
                    warn!(line_number, "Dropping point: overflows when scaled");
                    return None;
                }
                let point = RawPoint::new(x, y, z);
                self.stats.points += 1;
                if anchor {
                    self.stats.anchors += 1;
                }
                Some(Record::Point {
                    point,
                    anchor,
                    line_number,
                })
            }
            Err(err) => {
                self.stats.dropped += 1;
                warn!(line_number, "Dropping point: {}", err);
                None
            }
        }
    }
}

impl<L, T> Iterator for PointRecordParser<L>
where
    L: Iterator<Item = io::Result<T>>,
    T: Into<Vec<u8>>,
{
    type Item = Result<Record>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }

        loop {
            let line = match self.lines.next() {
                Some(Ok(line)) => line.into(),
                Some(Err(e)) => {
                    self.finished = true;
                    return Some(Err(Error::Input(InputError::Unreadable {
                        source_name: self.source_name.clone(),
                        reason: e.to_string(),
                    })));
                }
                None => {
                    self.finished = true;
                    return None;
                }
            };

            self.line_number += 1;
            self.stats.lines_read += 1;

            if self.line_number == 1 {
                debug!(header = %String::from_utf8_lossy(&line), "Skipping header");
                continue;
            }

            let line = match String::from_utf8(line) {
                Ok(line) => line,
                Err(e) => {
                    self.stats.dropped += 1;
                    let err = InputError::InvalidEncoding {
                        line_number: self.line_number,
                        reason: e.utf8_error().to_string(),
                    };
                    warn!(line_number = self.line_number, "Dropping line: {}", err);
                    continue;
                }
            };

            let line = line.trim_end_matches('\r');
            if let Some(record) = self.parse_line(line) {
                return Some(Ok(record));
            }
        }
    }
}

/// Parse all three fields before building anything, so a point is either
/// complete or absent.
fn parse_fields(fields: &[&str], line_number: usize) -> std::result::Result<[f64; 3], InputError> {
    let mut values = [0.0; POINT_FIELDS];
    for (field_index, field) in fields.iter().enumerate() {
        let text = field.trim();
        let value: f64 = text.parse().map_err(|e: std::num::ParseFloatError| {
            InputError::InvalidNumber {
                line_number,
                field_index,
                text: text.to_string(),
                reason: e.to_string(),
            }
        })?;
        if !value.is_finite() {
            return Err(InputError::InvalidNumber {
                line_number,
                field_index,
                text: text.to_string(),
                reason: "value is not finite".to_string(),
            });
        }
        values[field_index] = value;
    }
    Ok(values)
}

/// An optional sign followed by decimal digits only
pub fn is_integer_literal(field: &str) -> bool {
    let text = field.trim();
    let digits = text
        .strip_prefix('-')
        .or_else(|| text.strip_prefix('+'))
        .unwrap_or(text);
    !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit())
}

/// Text after the marker prefix, e.g. `" Letter: A ---"` gives `A`
fn marker_label(rest: &str) -> Option<String> {
    let text = rest.trim().trim_matches('-').trim();
    let text = text
        .strip_prefix("Letter:")
        .map(str::trim)
        .unwrap_or(text);
    if text.is_empty() {
        None
    } else {
        Some(text.to_string())
    }
}
