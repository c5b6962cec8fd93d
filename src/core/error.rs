//! Error types for menu loading and navigation.

use thiserror::Error;

/// Structural problems found while loading a menu tree.  Always fatal: a
/// navigator is never built on top of a tree that failed validation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MenuError {
    #[error("malformed menu `{menu}`: {reason}")]
    Malformed { menu: String, reason: String },

    #[error("malformed menu file, line {line}: {reason}")]
    Syntax { line: usize, reason: String },
}

impl MenuError {
    pub(crate) fn malformed(menu: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Malformed {
            menu: menu.into(),
            reason: reason.into(),
        }
    }

    pub(crate) fn syntax(line: usize, reason: impl Into<String>) -> Self {
        Self::Syntax {
            line,
            reason: reason.into(),
        }
    }
}

/// Transitions the navigator refuses.  None of these leave the state
/// modified.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum NavError {
    #[error("menu history is full ({capacity} levels)")]
    HistoryOverflow { capacity: usize },
}
