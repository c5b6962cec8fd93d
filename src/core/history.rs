//! Bounded stack of saved navigation frames.

use super::error::NavError;
use super::menu::MenuId;

/// Default number of parent levels the navigator remembers.
pub const HISTORY_CAPACITY: usize = 5;

/// One level of navigation: which menu, which row is selected and which
/// row sits at the top of the viewport.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NavigationFrame {
    pub menu: MenuId,
    pub selected_index: usize,
    pub scroll_top: usize,
}

impl NavigationFrame {
    /// Fresh frame at the top of `menu`.
    pub fn top_of(menu: MenuId) -> Self {
        Self {
            menu,
            selected_index: 0,
            scroll_top: 0,
        }
    }
}

/// Capacity-checked LIFO of [`NavigationFrame`]s.
///
/// Pushing onto a full stack fails instead of overwriting the oldest
/// entry, so a `Back` always lands exactly where the user came from.
#[derive(Debug, Clone)]
pub struct History {
    frames: Vec<NavigationFrame>,
    capacity: usize,
}

impl History {
    pub fn new(capacity: usize) -> Self {
        Self {
            frames: Vec::with_capacity(capacity),
            capacity,
        }
    }

    pub fn push(&mut self, frame: NavigationFrame) -> Result<(), NavError> {
        if self.frames.len() >= self.capacity {
            return Err(NavError::HistoryOverflow {
                capacity: self.capacity,
            });
        }
        self.frames.push(frame);
        Ok(())
    }

    pub fn pop(&mut self) -> Option<NavigationFrame> {
        self.frames.pop()
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.frames.len() >= self.capacity
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Saved frames, outermost first.
    pub fn frames(&self) -> &[NavigationFrame] {
        &self.frames
    }
}

impl Default for History {
    fn default() -> Self {
        Self::new(HISTORY_CAPACITY)
    }
}
