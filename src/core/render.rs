//! Drawing primitives the navigator paints through.
//!
//! The navigator never talks to a screen directly; anything that can fill
//! rectangles and draw text can host it.  Units are whatever the surface
//! uses (pixels on the device, cells in a terminal).

/// Two-tone palette of the device display.  The highlighted row is painted
/// with the colours swapped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Color {
    Black,
    White,
}

impl Color {
    pub fn inverse(self) -> Self {
        match self {
            Color::Black => Color::White,
            Color::White => Color::Black,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GlyphMetrics {
    pub width: u32,
    pub height: u32,
    pub baseline: u32,
}

/// Surface the navigator draws on.
pub trait Renderer {
    fn measure_glyph(&self, sample: &str) -> GlyphMetrics;
    fn fill_rect(&mut self, x: u32, y: u32, w: u32, h: u32, color: Color);
    /// `y` is the top of the text line.
    fn draw_text(&mut self, x: u32, y: u32, text: &str, color: Color);
    fn set_header(&mut self, title: &str);
    /// Width of the drawable area; highlight bars span all of it.
    fn surface_width(&self) -> u32;
}

/// Fixed geometry of a menu row on a given surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowMetrics {
    /// Gap above the first row.
    pub top_margin: u32,
    /// Added to the glyph height to get the row height.
    pub row_padding: u32,
    /// Horizontal offset of the label.
    pub text_indent: u32,
}

impl RowMetrics {
    /// Geometry of the original pixel display.
    pub const DEVICE: RowMetrics = RowMetrics {
        top_margin: 1,
        row_padding: 5,
        text_indent: 8,
    };

    /// One text cell per row, one cell of indent.
    pub const TERMINAL: RowMetrics = RowMetrics {
        top_margin: 0,
        row_padding: 0,
        text_indent: 1,
    };
}

impl Default for RowMetrics {
    fn default() -> Self {
        Self::DEVICE
    }
}
