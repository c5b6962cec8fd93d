//! The navigation state machine.
//!
//! A [`Navigator`] owns the menu tree, the active [`NavigationFrame`], a
//! bounded [`History`] of parent frames and the [`Renderer`] it paints on.
//! Every key is processed to completion before the next one; a transition
//! that changes what is visible repaints the whole viewport exactly once,
//! and transitions that change nothing do not repaint at all.
//!
//! Invariants kept after every call:
//! - `selected_index < len(current menu)`
//! - `scroll_top <= selected_index < scroll_top + viewport_capacity`
//! - `history.len() <= history.capacity()`

use super::error::NavError;
use super::history::{History, NavigationFrame, HISTORY_CAPACITY};
use super::menu::{ItemKind, MenuDef, MenuItem, MenuTree};
use super::render::{Color, RowMetrics, Renderer};

/// Rows visible at once on the device.
pub const VIEWPORT_CAPACITY: usize = 5;

/// Glyph measured to derive the row height.
const ROW_SAMPLE: &str = "M";

/// Semantic keys, already mapped from raw input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NavKey {
    Activate,
    Back,
    Up,
    Down,
}

/// What a key did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// Selection (and maybe scroll) moved within the current menu.
    Moved,
    /// A child menu was opened.
    Entered,
    /// A parent frame was restored.
    Returned,
    /// A leaf callback ran.
    Invoked,
    /// The item has nothing bound to it.
    Inert,
    /// `Up` on the first item or `Down` on the last.
    AtBoundary,
    /// `Back` with an empty history.
    AtRoot,
    /// The transition was refused; state is unchanged.
    Rejected(NavError),
}

impl Transition {
    /// Whether the key counts as handled.  Selection keys that hit a
    /// boundary are left for the caller; activation and back always are.
    pub fn consumed(self) -> bool {
        !matches!(self, Transition::AtBoundary)
    }

    /// Whether the viewport was repainted.
    pub fn redrawn(self) -> bool {
        matches!(
            self,
            Transition::Moved | Transition::Entered | Transition::Returned
        )
    }
}

pub struct Navigator<R: Renderer> {
    tree: MenuTree,
    renderer: R,
    metrics: RowMetrics,
    viewport_capacity: usize,
    current: NavigationFrame,
    history: History,
    header: String,
    /// Derived from glyph metrics on the first paint.
    row_height: Option<u32>,
}

impl<R: Renderer> Navigator<R> {
    /// Start at the top of the root menu with an empty history.
    pub fn new(tree: MenuTree, renderer: R) -> Self {
        let current = NavigationFrame::top_of(tree.root());
        let header = tree.title().to_string();
        Self {
            tree,
            renderer,
            metrics: RowMetrics::default(),
            viewport_capacity: VIEWPORT_CAPACITY,
            current,
            history: History::new(HISTORY_CAPACITY),
            header,
            row_height: None,
        }
    }

    /// Number of visible rows (at least one).  Resets to the root frame.
    pub fn with_viewport(mut self, rows: usize) -> Self {
        self.viewport_capacity = rows.max(1);
        self.reset();
        self
    }

    pub fn with_metrics(mut self, metrics: RowMetrics) -> Self {
        self.metrics = metrics;
        self.row_height = None;
        self
    }

    fn reset(&mut self) {
        self.current = NavigationFrame::top_of(self.tree.root());
        while self.history.pop().is_some() {}
        self.header = self.tree.title().to_string();
    }

    // ── accessors ───────────────────────────────────────────────

    pub fn tree(&self) -> &MenuTree {
        &self.tree
    }

    pub fn current(&self) -> NavigationFrame {
        self.current
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn header(&self) -> &str {
        &self.header
    }

    pub fn viewport_capacity(&self) -> usize {
        self.viewport_capacity
    }

    pub fn current_menu(&self) -> &MenuDef {
        self.tree.menu(self.current.menu)
    }

    pub fn selected_item(&self) -> Option<&MenuItem> {
        self.current_menu().item(self.current.selected_index)
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn renderer_mut(&mut self) -> &mut R {
        &mut self.renderer
    }

    // ── entry points ────────────────────────────────────────────

    /// Process one key; returns whether it was consumed.
    pub fn handle_key_event(&mut self, key: NavKey) -> bool {
        self.apply(key).consumed()
    }

    /// Process one key and report exactly what happened.
    pub fn apply(&mut self, key: NavKey) -> Transition {
        let transition = match key {
            NavKey::Up => self.move_up(),
            NavKey::Down => self.move_down(),
            NavKey::Activate => self.activate(),
            NavKey::Back => self.back(),
        };
        tracing::debug!(
            ?key,
            ?transition,
            menu = %self.current_menu().name,
            selected = self.current.selected_index,
            scroll = self.current.scroll_top,
            depth = self.history.len(),
            "nav key"
        );
        transition
    }

    /// Paint header and viewport for the current state.
    pub fn render(&mut self) {
        self.renderer.set_header(&self.header);
        self.paint();
    }

    // ── transitions ─────────────────────────────────────────────

    fn move_up(&mut self) -> Transition {
        let frame = &mut self.current;
        if frame.selected_index == 0 {
            return Transition::AtBoundary;
        }
        if frame.selected_index == frame.scroll_top {
            frame.scroll_top -= 1;
        }
        frame.selected_index -= 1;
        self.paint();
        Transition::Moved
    }

    fn move_down(&mut self) -> Transition {
        let len = self.tree.menu(self.current.menu).len();
        let frame = &mut self.current;
        if frame.selected_index + 1 >= len {
            return Transition::AtBoundary;
        }
        frame.selected_index += 1;
        if frame.selected_index - frame.scroll_top >= self.viewport_capacity {
            frame.scroll_top += 1;
        }
        self.paint();
        Transition::Moved
    }

    fn activate(&mut self) -> Transition {
        let menu = self.tree.menu(self.current.menu);
        let Some(item) = menu.item(self.current.selected_index) else {
            return Transition::Inert;
        };

        match item.kind {
            ItemKind::SubMenuLink => {
                let Some(child) = item.child() else {
                    return Transition::Inert;
                };
                if let Err(err) = self.history.push(self.current) {
                    tracing::warn!(item = %item.label, "{err}; not entering sub-menu");
                    return Transition::Rejected(err);
                }
                self.header = item.label.clone();
                self.current = NavigationFrame::top_of(child);
                self.renderer.set_header(&self.header);
                self.paint();
                Transition::Entered
            }
            ItemKind::Leaf => match item.callback() {
                Some(action) => {
                    tracing::debug!(action = action.name(), "invoking leaf action");
                    action.invoke();
                    Transition::Invoked
                }
                None => Transition::Inert,
            },
            ItemKind::ValueDisplay => Transition::Inert,
            ItemKind::GoBack => self.back(),
        }
    }

    fn back(&mut self) -> Transition {
        let Some(frame) = self.history.pop() else {
            return Transition::AtRoot;
        };
        self.current = frame;
        self.header = self
            .selected_item()
            .map(|item| item.label.clone())
            .unwrap_or_else(|| self.tree.title().to_string());
        self.renderer.set_header(&self.header);
        self.paint();
        Transition::Returned
    }

    // ── painting ────────────────────────────────────────────────

    fn row_height(&mut self) -> u32 {
        if let Some(height) = self.row_height {
            return height;
        }
        let glyph = self.renderer.measure_glyph(ROW_SAMPLE);
        let height = glyph.height + self.metrics.row_padding;
        self.row_height = Some(height);
        height
    }

    /// Repaint every viewport row; rows past the end of the menu are blank.
    fn paint(&mut self) {
        let row_height = self.row_height();
        let width = self.renderer.surface_width();
        let text_offset = self.metrics.row_padding / 2;
        let menu = self.tree.menu(self.current.menu);

        for row in 0..self.viewport_capacity {
            let index = self.current.scroll_top + row;
            let y = self.metrics.top_margin + row as u32 * row_height;
            let background = if index == self.current.selected_index {
                Color::White
            } else {
                Color::Black
            };

            self.renderer.fill_rect(0, y, width, row_height, background);
            if let Some(item) = menu.item(index) {
                self.renderer.draw_text(
                    self.metrics.text_indent,
                    y + text_offset,
                    &item.label,
                    background.inverse(),
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::menu::{ActionRegistry, MenuId};
    use crate::core::render::GlyphMetrics;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    /// Records every draw call so tests can count repaints.
    #[derive(Default)]
    struct RecordingRenderer {
        fills: Vec<(u32, Color)>,
        texts: Vec<(u32, String, Color)>,
        headers: Vec<String>,
    }

    impl Renderer for RecordingRenderer {
        fn measure_glyph(&self, _sample: &str) -> GlyphMetrics {
            GlyphMetrics {
                width: 6,
                height: 10,
                baseline: 8,
            }
        }

        fn fill_rect(&mut self, _x: u32, y: u32, _w: u32, _h: u32, color: Color) {
            self.fills.push((y, color));
        }

        fn draw_text(&mut self, _x: u32, y: u32, text: &str, color: Color) {
            self.texts.push((y, text.to_string(), color));
        }

        fn set_header(&mut self, title: &str) {
            self.headers.push(title.to_string());
        }

        fn surface_width(&self) -> u32 {
            160
        }
    }

    impl RecordingRenderer {
        fn repaints(&self) -> usize {
            self.fills.len() / VIEWPORT_CAPACITY
        }
    }

    const DEVICE_MENU: &str = "\
title = Podzilla

[main]
Playlists = link
Browse = link browse
Extras = link extras
Settings = link settings
File Browser = action file_browser
Quit Podzilla = action quit
Reboot iPod = link reboot
end

[browse]
Artists = value
Albums = value
end

[extras]
Clock = link
end

[settings]
Shuffle = value
Backlight = action
end

[reboot]
Cancel = back
Absolutely = action reboot
end
";

    fn navigator_with(actions: &ActionRegistry) -> Navigator<RecordingRenderer> {
        let tree = MenuTree::parse(DEVICE_MENU, actions).unwrap();
        Navigator::new(tree, RecordingRenderer::default())
    }

    fn navigator() -> Navigator<RecordingRenderer> {
        let mut actions = ActionRegistry::new();
        actions.register("file_browser", || {});
        actions.register("quit", || {});
        actions.register("reboot", || {});
        navigator_with(&actions)
    }

    fn state(nav: &Navigator<RecordingRenderer>) -> (MenuId, usize, usize) {
        let f = nav.current();
        (f.menu, f.selected_index, f.scroll_top)
    }

    fn assert_invariants(nav: &Navigator<RecordingRenderer>) {
        let f = nav.current();
        assert!(f.selected_index < nav.current_menu().len());
        assert!(f.scroll_top <= f.selected_index);
        assert!(f.selected_index < f.scroll_top + nav.viewport_capacity());
        assert!(nav.history().len() <= nav.history().capacity());
    }

    #[test]
    fn scrolling_to_the_last_root_item() {
        let mut nav = navigator();
        for _ in 0..6 {
            assert!(nav.handle_key_event(NavKey::Down));
        }
        assert_eq!(nav.current().selected_index, 6);
        assert_eq!(nav.current().scroll_top, 2);

        let repaints = nav.renderer().repaints();
        assert!(!nav.handle_key_event(NavKey::Down));
        assert_eq!(nav.current().selected_index, 6);
        assert_eq!(nav.renderer().repaints(), repaints);
    }

    #[test]
    fn scroll_starts_when_selection_leaves_viewport() {
        let mut nav = navigator();
        for expected_top in [0, 0, 0, 0, 1, 2] {
            nav.apply(NavKey::Down);
            assert_eq!(nav.current().scroll_top, expected_top);
        }
        for expected_top in [2, 2, 2, 2, 1, 0] {
            nav.apply(NavKey::Up);
            assert_eq!(nav.current().scroll_top, expected_top);
        }
        assert_eq!(nav.current().selected_index, 0);
    }

    #[test]
    fn up_at_first_item_is_not_consumed_and_does_not_repaint() {
        let mut nav = navigator();
        assert_eq!(nav.apply(NavKey::Up), Transition::AtBoundary);
        assert!(!nav.handle_key_event(NavKey::Up));
        assert_eq!(nav.renderer().repaints(), 0);
    }

    #[test]
    fn up_then_down_is_identity_away_from_boundaries() {
        let mut nav = navigator();
        for _ in 0..6 {
            nav.apply(NavKey::Down);
            let before = state(&nav);
            nav.apply(NavKey::Up);
            nav.apply(NavKey::Down);
            assert_eq!(state(&nav), before);
        }
    }

    #[test]
    fn invariants_hold_under_arbitrary_key_sequences() {
        let keys = [NavKey::Up, NavKey::Down, NavKey::Activate, NavKey::Back];
        let mut nav = navigator();
        let mut seed: u32 = 0x2545_f491;
        for _ in 0..2_000 {
            seed = seed.wrapping_mul(1_664_525).wrapping_add(1_013_904_223);
            let key = keys[(seed >> 16) as usize % keys.len()];
            nav.apply(key);
            assert_invariants(&nav);
        }
    }

    #[test]
    fn entering_browse_and_back_restores_frame() {
        let mut nav = navigator();
        let root = nav.tree().root();
        nav.apply(NavKey::Down);

        assert_eq!(nav.apply(NavKey::Activate), Transition::Entered);
        assert_eq!(
            nav.history().frames(),
            &[NavigationFrame {
                menu: root,
                selected_index: 1,
                scroll_top: 0
            }]
        );
        assert_eq!(nav.current(), NavigationFrame::top_of(nav.tree().find("browse").unwrap()));
        assert_eq!(nav.header(), "Browse");

        assert_eq!(nav.apply(NavKey::Back), Transition::Returned);
        assert_eq!(state(&nav), (root, 1, 0));
        assert!(nav.history().is_empty());
        assert_eq!(nav.header(), "Browse");
    }

    #[test]
    fn go_back_item_restores_scrolled_frame() {
        let mut nav = navigator();
        for _ in 0..6 {
            nav.apply(NavKey::Down);
        }
        let before = state(&nav);
        assert_eq!(nav.apply(NavKey::Activate), Transition::Entered);
        assert_eq!(nav.header(), "Reboot iPod");

        // "Cancel" is a GoBack item.
        assert_eq!(nav.apply(NavKey::Activate), Transition::Returned);
        assert_eq!(state(&nav), before);
    }

    #[test]
    fn child_less_link_is_consumed_but_inert() {
        let mut nav = navigator();
        let before = state(&nav);
        assert_eq!(nav.apply(NavKey::Activate), Transition::Inert);
        assert!(nav.handle_key_event(NavKey::Activate));
        assert_eq!(state(&nav), before);
        assert!(nav.history().is_empty());
        assert_eq!(nav.renderer().repaints(), 0);
    }

    #[test]
    fn back_at_root_is_consumed_without_effect() {
        let mut nav = navigator();
        assert_eq!(nav.apply(NavKey::Back), Transition::AtRoot);
        assert!(nav.handle_key_event(NavKey::Back));
        assert_eq!(nav.renderer().repaints(), 0);
        assert!(nav.renderer().headers.is_empty());
    }

    #[test]
    fn leaf_action_runs_without_repaint() {
        let calls = Arc::new(AtomicUsize::new(0));
        let mut actions = ActionRegistry::new();
        let counter = Arc::clone(&calls);
        actions.register("file_browser", move || {
            counter.fetch_add(1, Ordering::SeqCst);
        });
        actions.register("quit", || {});
        actions.register("reboot", || {});
        let mut nav = navigator_with(&actions);

        for _ in 0..4 {
            nav.apply(NavKey::Down);
        }
        let repaints = nav.renderer().repaints();
        let before = state(&nav);

        assert_eq!(nav.apply(NavKey::Activate), Transition::Invoked);
        assert_eq!(nav.apply(NavKey::Activate), Transition::Invoked);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert_eq!(state(&nav), before);
        assert_eq!(nav.renderer().repaints(), repaints);
    }

    #[test]
    fn unbound_leaf_and_value_items_are_inert() {
        let mut nav = navigator();
        for _ in 0..3 {
            nav.apply(NavKey::Down);
        }
        nav.apply(NavKey::Activate);
        assert_eq!(nav.header(), "Settings");

        assert_eq!(nav.apply(NavKey::Activate), Transition::Inert); // Shuffle
        nav.apply(NavKey::Down);
        assert_eq!(nav.apply(NavKey::Activate), Transition::Inert); // Backlight
        assert_eq!(nav.history().len(), 1);
    }

    #[test]
    fn each_visible_transition_repaints_exactly_once() {
        let mut nav = navigator();
        nav.apply(NavKey::Down);
        assert_eq!(nav.renderer().repaints(), 1);
        nav.apply(NavKey::Activate);
        assert_eq!(nav.renderer().repaints(), 2);
        nav.apply(NavKey::Back);
        assert_eq!(nav.renderer().repaints(), 3);
        assert_eq!(nav.renderer().fills.len() % VIEWPORT_CAPACITY, 0);
    }

    #[test]
    fn render_highlights_selection_and_blanks_trailing_rows() {
        let mut nav = navigator();
        nav.apply(NavKey::Down);
        nav.apply(NavKey::Activate);
        let r = nav.renderer_mut();
        r.fills.clear();
        r.texts.clear();

        nav.render();
        let r = nav.renderer();
        assert_eq!(r.headers.last().map(String::as_str), Some("Browse"));
        // Row height is glyph height 10 plus padding 5, one unit of top margin.
        let ys: Vec<u32> = r.fills.iter().map(|(y, _)| *y).collect();
        assert_eq!(ys, [1, 16, 31, 46, 61]);
        assert_eq!(r.fills[0].1, Color::White);
        assert!(r.fills[1..].iter().all(|(_, c)| *c == Color::Black));

        let labels: Vec<&str> = r.texts.iter().map(|(_, t, _)| t.as_str()).collect();
        assert_eq!(labels, ["Artists", "Albums"]);
        assert_eq!(r.texts[0].2, Color::Black);
        assert_eq!(r.texts[1].2, Color::White);
    }

    #[test]
    fn glyph_metrics_are_measured_once() {
        struct Counting(RecordingRenderer, std::cell::Cell<usize>);
        impl Renderer for Counting {
            fn measure_glyph(&self, sample: &str) -> GlyphMetrics {
                self.1.set(self.1.get() + 1);
                self.0.measure_glyph(sample)
            }
            fn fill_rect(&mut self, x: u32, y: u32, w: u32, h: u32, color: Color) {
                self.0.fill_rect(x, y, w, h, color)
            }
            fn draw_text(&mut self, x: u32, y: u32, text: &str, color: Color) {
                self.0.draw_text(x, y, text, color)
            }
            fn set_header(&mut self, title: &str) {
                self.0.set_header(title)
            }
            fn surface_width(&self) -> u32 {
                self.0.surface_width()
            }
        }

        let tree = MenuTree::parse("[m]\nA = value\nB = value\nend\n", &ActionRegistry::new())
            .unwrap();
        let mut nav = Navigator::new(tree, Counting(RecordingRenderer::default(), Default::default()));
        nav.render();
        nav.apply(NavKey::Down);
        nav.apply(NavKey::Up);
        assert_eq!(nav.renderer().1.get(), 1);
    }

    fn chain(depth: usize) -> MenuTree {
        let mut text = String::new();
        for level in 0..depth {
            text.push_str(&format!("[m{level}]\nNext = link m{}\nend\n", level + 1));
        }
        text.push_str(&format!("[m{depth}]\nBottom = value\nend\n"));
        MenuTree::parse(&text, &ActionRegistry::new()).unwrap()
    }

    #[test]
    fn descending_past_history_capacity_is_rejected() {
        let tree = chain(6);
        assert_eq!(tree.max_depth(), 6);
        let mut nav = Navigator::new(tree, RecordingRenderer::default());

        for _ in 0..HISTORY_CAPACITY {
            assert_eq!(nav.apply(NavKey::Activate), Transition::Entered);
        }
        let before = state(&nav);
        let frames = nav.history().frames().to_vec();
        let repaints = nav.renderer().repaints();

        let t = nav.apply(NavKey::Activate);
        assert_eq!(
            t,
            Transition::Rejected(NavError::HistoryOverflow {
                capacity: HISTORY_CAPACITY
            })
        );
        assert!(t.consumed());
        assert_eq!(state(&nav), before);
        assert_eq!(nav.history().frames(), frames.as_slice());
        assert_eq!(nav.renderer().repaints(), repaints);

        for _ in 0..HISTORY_CAPACITY {
            assert_eq!(nav.apply(NavKey::Back), Transition::Returned);
        }
        assert_eq!(nav.current(), NavigationFrame::top_of(nav.tree().root()));
    }

    #[test]
    fn smaller_viewport_scrolls_earlier() {
        let mut nav = navigator().with_viewport(2);
        nav.apply(NavKey::Down);
        assert_eq!(nav.current().scroll_top, 0);
        nav.apply(NavKey::Down);
        assert_eq!(nav.current().scroll_top, 1);
        assert_invariants(&nav);
    }
}
