//! Cell-grid [`Renderer`] the navigator paints into.
//!
//! The canvas keeps its contents between frames like a framebuffer does:
//! the navigator only repaints on transitions, and the terminal blits the
//! last painted state every frame.

use crate::core::render::{Color, GlyphMetrics, Renderer};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cell {
    pub ch: char,
    pub fg: Color,
    pub bg: Color,
}

impl Default for Cell {
    fn default() -> Self {
        Self {
            ch: ' ',
            fg: Color::White,
            bg: Color::Black,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Canvas {
    width: u16,
    height: u16,
    cells: Vec<Cell>,
    header: String,
}

impl Canvas {
    pub fn new(width: u16, height: u16) -> Self {
        let mut canvas = Self::default();
        canvas.resize(width, height);
        canvas
    }

    /// Resize and clear.  The header survives.
    pub fn resize(&mut self, width: u16, height: u16) {
        self.width = width;
        self.height = height;
        self.cells = vec![Cell::default(); width as usize * height as usize];
    }

    pub fn size(&self) -> (u16, u16) {
        (self.width, self.height)
    }

    pub fn header(&self) -> &str {
        &self.header
    }

    pub fn cell(&self, x: u16, y: u16) -> Option<&Cell> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.cells.get(y as usize * self.width as usize + x as usize)
    }

    /// Text of row `y` with trailing blanks removed.
    pub fn row_text(&self, y: u16) -> String {
        let text: String = (0..self.width)
            .filter_map(|x| self.cell(x, y))
            .map(|c| c.ch)
            .collect();
        text.trim_end().to_string()
    }

    fn cell_mut(&mut self, x: u32, y: u32) -> Option<&mut Cell> {
        if x >= self.width as u32 || y >= self.height as u32 {
            return None;
        }
        let idx = y as usize * self.width as usize + x as usize;
        self.cells.get_mut(idx)
    }
}

impl Renderer for Canvas {
    fn measure_glyph(&self, _sample: &str) -> GlyphMetrics {
        GlyphMetrics {
            width: 1,
            height: 1,
            baseline: 0,
        }
    }

    fn fill_rect(&mut self, x: u32, y: u32, w: u32, h: u32, color: Color) {
        for cy in y..y.saturating_add(h) {
            for cx in x..x.saturating_add(w) {
                let Some(cell) = self.cell_mut(cx, cy) else {
                    break;
                };
                *cell = Cell {
                    ch: ' ',
                    fg: color.inverse(),
                    bg: color,
                };
            }
        }
    }

    fn draw_text(&mut self, x: u32, y: u32, text: &str, color: Color) {
        for (i, ch) in text.chars().enumerate() {
            let Some(cell) = self.cell_mut(x + i as u32, y) else {
                break;
            };
            cell.ch = ch;
            cell.fg = color;
        }
    }

    fn set_header(&mut self, title: &str) {
        self.header = title.to_string();
    }

    fn surface_width(&self) -> u32 {
        self.width as u32
    }
}
