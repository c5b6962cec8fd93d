//! Ratatui widget that blits a [`Canvas`] into the terminal buffer.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    widgets::{Block, Widget},
};

use crate::core::render::Color;

use super::canvas::Canvas;
use super::theme::Theme;

/// Created fresh each frame; the header of the canvas becomes the title.
pub struct MenuScreen<'a> {
    canvas: &'a Canvas,
    block: Option<Block<'a>>,
}

impl<'a> MenuScreen<'a> {
    pub fn new(canvas: &'a Canvas) -> Self {
        Self {
            canvas,
            block: None,
        }
    }

    pub fn block(mut self, block: Block<'a>) -> Self {
        self.block = Some(block);
        self
    }
}

impl Widget for MenuScreen<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let inner = match self.block {
            Some(block) => {
                let inner = block.inner(area);
                block
                    .title(format!(" {} ", self.canvas.header()))
                    .title_style(Theme::title_style())
                    .render(area, buf);
                inner
            }
            None => area,
        };

        let (width, height) = self.canvas.size();
        for y in 0..height.min(inner.height) {
            for x in 0..width.min(inner.width) {
                let Some(cell) = self.canvas.cell(x, y) else {
                    continue;
                };
                let style = if cell.bg == Color::White {
                    Theme::selected_style()
                } else {
                    Theme::item_style()
                };
                buf[(inner.x + x, inner.y + y)]
                    .set_char(cell.ch)
                    .set_style(style);
            }
        }
    }
}
