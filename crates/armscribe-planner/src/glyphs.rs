//! Text to point file
//!
//! Lays out each character of a string with a system font and writes the
//! outline vertices in the point-file format, one marker line per letter.

use std::fs;
use std::io::Write;
use std::path::Path;

use armscribe_core::{Error, Result};
use fontdb::{Database, Family, Query, Stretch, Style, Weight};
use rusttype::{point as rt_point, Font, OutlineBuilder, Scale};
use tracing::{debug, info};

/// Header line written at the top of every generated file
pub const POINT_FILE_HEADER: &str = "x, y, z  # letter";

/// Glyph size and per-letter advance
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GlyphLayout {
    /// Uniform glyph scale, in output units
    pub font_size: f64,
    /// Horizontal advance between letters
    pub spacing: f64,
}

impl Default for GlyphLayout {
    fn default() -> Self {
        Self {
            font_size: 45.0,
            spacing: 30.0,
        }
    }
}

/// Load a font from an explicit file, or look the family up among system fonts
pub fn load_font(family: &str, path: Option<&Path>) -> Result<Font<'static>> {
    if let Some(path) = path {
        let bytes = fs::read(path)
            .map_err(|e| Error::other(format!("Failed to read font {}: {}", path.display(), e)))?;
        return Font::try_from_vec(bytes)
            .ok_or_else(|| Error::other(format!("Invalid font file {}", path.display())));
    }

    let mut db = Database::new();
    db.load_system_fonts();

    let families: Vec<Family<'_>> = match family.trim() {
        "" | "Sans" => vec![Family::SansSerif],
        "Serif" => vec![Family::Serif],
        "Monospace" => vec![Family::Monospace],
        other => vec![Family::Name(other), Family::SansSerif],
    };
    let query = Query {
        families: &families,
        weight: Weight::NORMAL,
        stretch: Stretch::Normal,
        style: Style::Normal,
    };

    let face = db
        .query(&query)
        .and_then(|id| db.face(id))
        .ok_or_else(|| Error::other(format!("No system font found for family '{}'", family)))?;

    let font = match &face.source {
        fontdb::Source::File(path) | fontdb::Source::SharedFile(path, _) => {
            let bytes = fs::read(path)?;
            Font::try_from_vec(bytes)
        }
        fontdb::Source::Binary(bytes) => Font::try_from_vec(bytes.as_ref().as_ref().to_vec()),
    };
    font.ok_or_else(|| Error::other(format!("System font for '{}' could not be parsed", family)))
}

/// Outline vertices of one character, y pointing up, shifted by `x_offset`
pub fn glyph_vertices(font: &Font<'_>, ch: char, scale: Scale, x_offset: f64) -> Vec<(f64, f64)> {
    let glyph = font.glyph(ch).scaled(scale).positioned(rt_point(0.0, 0.0));
    let mut collector = VertexCollector::new(x_offset);
    if !glyph.build_outline(&mut collector) {
        debug!(?ch, "Glyph has no outline");
    }
    collector.vertices
}

/// Write `text` as a point file. Returns the number of point lines written.
pub fn write_text_points<W: Write>(
    font: &Font<'_>,
    text: &str,
    layout: &GlyphLayout,
    out: &mut W,
) -> Result<usize> {
    writeln!(out, "{}", POINT_FILE_HEADER)?;

    let scale = Scale::uniform(layout.font_size as f32);
    let mut x_offset = 0.0;
    let mut written = 0;

    for ch in text.chars() {
        info!("Writing points for letter {}", ch);
        writeln!(out, "# --- Letter: {} ---", ch)?;
        for (x, y) in glyph_vertices(font, ch, scale, x_offset) {
            writeln!(out, "{:.4}, {:.4}, {:.4}", x, y, 0.0)?;
            written += 1;
        }
        x_offset += layout.spacing;
    }

    Ok(written)
}

/// Collects on-curve vertices; curves are sampled, contours closed
/// back to their start.
struct VertexCollector {
    vertices: Vec<(f64, f64)>,
    current: (f64, f64),
    start: (f64, f64),
    x_offset: f64,
}

impl VertexCollector {
    fn new(x_offset: f64) -> Self {
        Self {
            vertices: Vec::new(),
            current: (0.0, 0.0),
            start: (0.0, 0.0),
            x_offset,
        }
    }

    fn push(&mut self, x: f64, y: f64) {
        self.current = (x, y);
        // rusttype outlines are y-down
        self.vertices.push((self.x_offset + x, -y));
    }
}

impl OutlineBuilder for VertexCollector {
    fn move_to(&mut self, x: f32, y: f32) {
        self.push(x as f64, y as f64);
        self.start = self.current;
    }

    fn line_to(&mut self, x: f32, y: f32) {
        self.push(x as f64, y as f64);
    }

    fn quad_to(&mut self, x1: f32, y1: f32, x: f32, y: f32) {
        let (x0, y0) = self.current;
        let (x1, y1, x, y) = (x1 as f64, y1 as f64, x as f64, y as f64);
        let mx = 0.25 * x0 + 0.5 * x1 + 0.25 * x;
        let my = 0.25 * y0 + 0.5 * y1 + 0.25 * y;
        self.push(mx, my);
        self.push(x, y);
    }

    fn curve_to(&mut self, x1: f32, y1: f32, x2: f32, y2: f32, x: f32, y: f32) {
        let (x0, y0) = self.current;
        let (x1, y1, x2, y2, x, y) = (
            x1 as f64, y1 as f64, x2 as f64, y2 as f64, x as f64, y as f64,
        );
        for t in [1.0 / 3.0, 2.0 / 3.0] {
            let u = 1.0 - t;
            let bx = u * u * u * x0 + 3.0 * u * u * t * x1 + 3.0 * u * t * t * x2 + t * t * t * x;
            let by = u * u * u * y0 + 3.0 * u * u * t * y1 + 3.0 * u * t * t * y2 + t * t * t * y;
            self.push(bx, by);
        }
        self.push(x, y);
    }

    fn close(&mut self) {
        let (x, y) = self.start;
        if self.current != self.start {
            self.push(x, y);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collector_flips_y_and_offsets_x() {
        let mut c = VertexCollector::new(30.0);
        c.move_to(1.0, -2.0);
        c.line_to(3.0, -4.0);
        assert_eq!(c.vertices, vec![(31.0, 2.0), (33.0, 4.0)]);
    }

    #[test]
    fn test_close_returns_to_start() {
        let mut c = VertexCollector::new(0.0);
        c.move_to(0.0, 0.0);
        c.line_to(10.0, 0.0);
        c.line_to(10.0, -10.0);
        c.close();
        assert_eq!(c.vertices.last(), Some(&(0.0, 0.0)));
        assert_eq!(c.vertices.len(), 4);
    }

    #[test]
    fn test_quad_sampled_on_curve() {
        let mut c = VertexCollector::new(0.0);
        c.move_to(0.0, 0.0);
        c.quad_to(5.0, -10.0, 10.0, 0.0);
        assert_eq!(c.vertices, vec![(0.0, 0.0), (5.0, 5.0), (10.0, 0.0)]);
    }

    #[test]
    fn test_curve_adds_three_vertices() {
        let mut c = VertexCollector::new(0.0);
        c.move_to(0.0, 0.0);
        c.curve_to(0.0, -3.0, 3.0, -3.0, 3.0, 0.0);
        assert_eq!(c.vertices.len(), 4);
        assert_eq!(c.vertices[3], (3.0, 0.0));
    }
}
