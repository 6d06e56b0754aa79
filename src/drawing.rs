//! Drawing file format
//!
//! Drawings are stored as UTF-8 JSON with a `.draw` suffix:
//! `{ "strokes": [ { "id", "points", "color", "width" }, ... ] }`.

use anyhow::{bail, Context};
use serde::{Deserialize, Serialize};

/// File suffix for drawing payloads (without the dot)
pub const DRAW_EXTENSION: &str = "draw";

/// A single point on a stroke, in canvas coordinates
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StrokePoint {
    pub x: f64,
    pub y: f64,
}

/// One drawn stroke: an ordered polyline with colour and width
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stroke {
    /// Stable id, assigned when the stroke is committed
    pub id: String,
    pub points: Vec<StrokePoint>,
    /// Any CSS colour string accepted by the host renderer
    pub color: String,
    /// Brush width in canvas units, strictly positive
    pub width: f64,
}

impl Stroke {
    pub fn new(id: impl Into<String>, points: Vec<StrokePoint>, color: impl Into<String>, width: f64) -> Self {
        Self {
            id: id.into(),
            points,
            color: color.into(),
            width,
        }
    }
}

/// The persisted payload of one drawing file
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DrawingFile {
    pub strokes: Vec<Stroke>,
}

impl DrawingFile {
    pub fn new(strokes: Vec<Stroke>) -> Self {
        Self { strokes }
    }

    /// Serialize to the on-disk JSON representation
    pub fn to_bytes(&self) -> anyhow::Result<Vec<u8>> {
        serde_json::to_vec(self).context("failed to serialize drawing")
    }

    /// Parse and validate a drawing payload.
    ///
    /// Rejects non-positive stroke widths; the renderer has no sensible
    /// interpretation for them.
    pub fn from_bytes(bytes: &[u8]) -> anyhow::Result<Self> {
        let drawing: DrawingFile =
            serde_json::from_slice(bytes).context("failed to parse drawing")?;
        for stroke in &drawing.strokes {
            if !(stroke.width > 0.0) {
                bail!("stroke {} has non-positive width {}", stroke.id, stroke.width);
            }
        }
        Ok(drawing)
    }
}

/// Whether a file name carries the drawing suffix
pub fn is_drawing_file(name: &str) -> bool {
    std::path::Path::new(name)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.eq_ignore_ascii_case(DRAW_EXTENSION))
        .unwrap_or(false)
}
