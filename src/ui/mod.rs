//! UI / rendering layer — everything that touches Ratatui widgets.
//!
//! The navigator paints into a [`canvas::Canvas`]; this layer turns the
//! canvas into cells on the terminal.

pub mod canvas;
pub mod layout;
pub mod screen;
pub mod theme;
