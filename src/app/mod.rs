//! Application orchestration — state, event loop plumbing, and input handling.

pub mod actions;
pub mod event;
pub mod handler;
pub mod input;
pub mod state;
