//! Menu engine – menu definitions, validation, and the navigation state
//! machine.
//!
//! Nothing in this module depends on any TUI or rendering crate; drawing
//! goes through the [`render::Renderer`] trait.

pub mod catalog;
pub mod error;
pub mod history;
pub mod loader;
pub mod menu;
pub mod navigator;
pub mod render;
