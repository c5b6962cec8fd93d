//! Line-based menu file format.
//!
//! ```text
//! title = Podzilla
//! root = main
//!
//! [main]
//! Browse = link browse
//! Quit = action quit
//! Shuffle = value
//! Cancel = back
//! end
//! ```
//!
//! Each `[section]` is one menu and must be closed by an `end` line.
//! Entries are `label = kind [target]`, split at the last `=`.  A `#`
//! after whitespace starts a comment only once the kind has been given, so
//! `Track #1 = value` is a label, not a truncated line.

use super::error::MenuError;
use super::menu::{ActionRegistry, ItemKind, MenuTree, RawEntry, RawMenu, RawTree};

const SENTINEL: &str = "end";

impl MenuTree {
    /// Parse and validate a menu file.
    pub fn parse(text: &str, actions: &ActionRegistry) -> Result<Self, MenuError> {
        Self::from_raw(parse_raw(text)?, actions)
    }
}

/// Parse the file into its unvalidated form.  Only syntax is checked here;
/// structure (terminators, links, actions) is checked by
/// [`MenuTree::from_raw`].
pub fn parse_raw(text: &str) -> Result<RawTree, MenuError> {
    let mut raw = RawTree::default();

    for (idx, line) in text.lines().enumerate() {
        let line_no = idx + 1;
        let line = strip_comment(line).trim();
        if line.is_empty() {
            continue;
        }

        if let Some(rest) = line.strip_prefix('[') {
            let Some(name) = rest.strip_suffix(']') else {
                return Err(MenuError::syntax(line_no, "unclosed section header"));
            };
            let name = name.trim();
            if name.is_empty() {
                return Err(MenuError::syntax(line_no, "empty menu name"));
            }
            raw.menus.push(RawMenu {
                name: name.to_string(),
                entries: Vec::new(),
            });
            continue;
        }

        let Some(menu) = raw.menus.last_mut() else {
            parse_header_line(&mut raw, line, line_no)?;
            continue;
        };

        if line == SENTINEL {
            menu.entries.push(RawEntry::Sentinel);
            continue;
        }

        let Some((label, rhs)) = line.rsplit_once('=') else {
            return Err(MenuError::syntax(line_no, "expected `label = kind`"));
        };
        let mut words = rhs.split_whitespace();
        let kind = match words.next() {
            Some("action") => ItemKind::Leaf,
            Some("link") => ItemKind::SubMenuLink,
            Some("value") => ItemKind::ValueDisplay,
            Some("back") => ItemKind::GoBack,
            Some(other) => {
                return Err(MenuError::syntax(line_no, format!("unknown item kind `{other}`")));
            }
            None => return Err(MenuError::syntax(line_no, "missing item kind")),
        };
        let target = words.next();
        if words.next().is_some() {
            return Err(MenuError::syntax(line_no, "trailing words after target"));
        }

        menu.entries.push(RawEntry::item(label.trim(), kind, target));
    }

    Ok(raw)
}

fn parse_header_line(raw: &mut RawTree, line: &str, line_no: usize) -> Result<(), MenuError> {
    let Some((key, value)) = line.split_once('=') else {
        return Err(MenuError::syntax(line_no, "expected `key = value` before first menu"));
    };
    let value = value.trim().to_string();
    match key.trim() {
        "title" => raw.title = Some(value),
        "root" => raw.root = Some(value),
        other => {
            return Err(MenuError::syntax(line_no, format!("unknown setting `{other}`")));
        }
    }
    Ok(())
}

/// Drop a `#` comment that starts the line or follows whitespace.  On entry
/// lines a comment can only start after the kind, so labels may contain `#`.
fn strip_comment(line: &str) -> &str {
    if line.trim_start().starts_with('#') {
        return "";
    }
    let mut prev = ' ';
    for (pos, c) in line.char_indices() {
        if c == '#' && prev.is_whitespace() && comment_may_start_after(&line[..pos]) {
            return &line[..pos];
        }
        prev = c;
    }
    line
}

fn comment_may_start_after(head: &str) -> bool {
    let head = head.trim();
    if head.starts_with('[') || head == SENTINEL {
        return true;
    }
    match head.rsplit_once('=') {
        Some((_, value)) => !value.trim().is_empty(),
        None => false,
    }
}
