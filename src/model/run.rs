//! Text runs and reconstructed lines.

use serde::{Deserialize, Serialize};

use super::Rect;

/// A contiguous glyph sequence emitted by the PDF decoder.
///
/// Decoders split text at arbitrary points (mid-word included) and emit runs
/// in content-stream order, which is not necessarily reading order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextRun {
    /// The decoded text
    pub text: String,
    /// X position (left edge)
    pub x: f32,
    /// Y position (baseline)
    pub y: f32,
    /// Advance width reported by the decoder, if known
    pub width: Option<f32>,
    /// Effective font size, if known
    pub font_size: Option<f32>,
}

impl TextRun {
    /// Create a run without width information.
    pub fn new(text: impl Into<String>, x: f32, y: f32) -> Self {
        Self {
            text: text.into(),
            x,
            y,
            width: None,
            font_size: None,
        }
    }

    /// Set the reported advance width.
    pub fn with_width(mut self, width: f32) -> Self {
        self.width = Some(width);
        self
    }

    /// Set the effective font size.
    pub fn with_font_size(mut self, size: f32) -> Self {
        self.font_size = Some(size);
        self
    }

    /// Width of the run, falling back to `chars × avg_char_width` when the
    /// decoder did not report a usable width.
    pub fn estimated_width(&self, avg_char_width: f32) -> f32 {
        match self.width {
            Some(w) if w > 0.0 => w,
            _ => self.text.chars().count() as f32 * avg_char_width,
        }
    }

    /// Right edge of the run.
    pub fn end_x(&self, avg_char_width: f32) -> f32 {
        self.x + self.estimated_width(avg_char_width)
    }

    /// Horizontal extent of the run as a zero-height rectangle on its
    /// baseline.
    pub fn bounds(&self, avg_char_width: f32) -> Rect {
        Rect::new(self.x, self.y, self.end_x(avg_char_width), self.y)
    }
}

/// Runs sharing (approximately) one baseline, sorted left to right.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Line {
    /// Member runs, sorted by x ascending
    pub runs: Vec<TextRun>,
    /// Leftmost x
    pub x: f32,
    /// Baseline of the line (taken from its topmost run)
    pub y: f32,
    /// Reconstructed text with inter-run spacing
    pub text: String,
}

impl Line {
    /// Check if the line has no visible text.
    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }
}
