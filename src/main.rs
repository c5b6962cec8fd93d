//! A hierarchical menu navigator for small fixed-size displays.
//!
//! Run the binary to browse the stock device menu in the terminal, or pass
//! `--menu FILE` to load your own tree.  `--check` validates a menu file
//! without starting the UI.

mod app;
mod config;
mod core;
mod ui;

use std::fs::File;
use std::io::{self, stderr, Stderr};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    widgets::{Block, Borders, Paragraph},
    Terminal,
};
use tokio::sync::mpsc;

use crate::app::{
    actions::{stock_registry, AppCommand},
    event::{spawn_event_reader, AppEvent},
    handler,
    state::AppState,
};
use crate::core::{
    catalog::STOCK_MENU,
    history::HISTORY_CAPACITY,
    menu::{ActionRegistry, MenuTree},
    navigator::{Navigator, VIEWPORT_CAPACITY},
    render::RowMetrics,
};
use crate::ui::{canvas::Canvas, layout::AppLayout, screen::MenuScreen, theme::Theme};

// ───────────────────────────────────────── CLI ───────────────

#[derive(Parser, Debug)]
#[command(name = env!("CARGO_PKG_NAME"), about = "Hierarchical menu navigator")]
struct Cli {
    /// Menu file to load (defaults to the built-in device menu).
    #[arg(long)]
    menu: Option<PathBuf>,

    /// Validate the menu, print a summary and exit.
    #[arg(long)]
    check: bool,

    /// Number of visible menu rows.
    #[arg(long, default_value_t = VIEWPORT_CAPACITY as u16, value_parser = clap::value_parser!(u16).range(1..))]
    viewport: u16,

    /// Write logs to this file instead of stderr.
    #[arg(long)]
    log_file: Option<PathBuf>,
}

type Tui = Terminal<CrosstermBackend<Stderr>>;

// ───────────────────────────────────────── setup ─────────────

/// Logs are quiet unless `RUST_LOG` is set, and never go to stdout.
fn init_logging(log_file: Option<&Path>) -> Result<()> {
    let filter = tracing_subscriber::EnvFilter::from_default_env();
    match log_file {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("creating log file {}", path.display()))?;
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .init();
        }
        None => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(io::stderr)
                .init();
        }
    }
    Ok(())
}

fn load_tree(path: Option<&Path>, actions: &ActionRegistry) -> Result<MenuTree> {
    let tree = match path {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("reading menu file {}", path.display()))?;
            MenuTree::parse(&text, actions)
                .with_context(|| format!("loading menu file {}", path.display()))?
        }
        None => MenuTree::parse(STOCK_MENU, actions).context("loading built-in menu")?,
    };

    let depth = tree.max_depth();
    if depth > HISTORY_CAPACITY {
        tracing::warn!(
            depth,
            capacity = HISTORY_CAPACITY,
            "menu is deeper than the navigation history; the deepest levels are unreachable"
        );
    }
    tracing::info!(
        menus = tree.len(),
        actions = actions.len(),
        depth,
        "menu tree loaded"
    );
    Ok(tree)
}

fn print_summary(tree: &MenuTree) {
    println!(
        "{}: {} menus, max depth {}",
        tree.title(),
        tree.len(),
        tree.max_depth()
    );
    for menu in tree.menus() {
        println!("  [{}] {} items", menu.name, menu.len());
    }
}

// ───────────────────────────────────────── main ─────────────

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.log_file.as_deref())?;

    // Leaf actions report back through this channel.
    let (cmd_tx, mut cmd_rx) = mpsc::unbounded_channel::<AppCommand>();
    let actions = stock_registry(&cmd_tx);
    let tree = load_tree(cli.menu.as_deref(), &actions)?;

    if cli.check {
        print_summary(&tree);
        return Ok(());
    }

    let navigator = Navigator::new(tree, Canvas::default())
        .with_viewport(cli.viewport.into())
        .with_metrics(RowMetrics::TERMINAL);
    let mut state = AppState::new(navigator, config::AppConfig::load());

    // ── terminal setup ────────────────────────────────────────
    enable_raw_mode()?;
    let mut stderr_handle = stderr();
    execute!(stderr_handle, EnterAlternateScreen)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stderr()))?;

    let result = run(&mut terminal, &mut state, &mut cmd_rx).await;

    // ── teardown ──────────────────────────────────────────────
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    result?;

    if state.reboot_requested {
        println!("reboot requested");
    }
    Ok(())
}

async fn run(
    terminal: &mut Tui,
    state: &mut AppState,
    cmd_rx: &mut mpsc::UnboundedReceiver<AppCommand>,
) -> Result<()> {
    let mut events = spawn_event_reader(Duration::from_millis(100));
    let rows = u16::try_from(state.navigator.viewport_capacity()).unwrap_or(u16::MAX);

    loop {
        terminal.draw(|frame| {
            let layout = AppLayout::from_area(frame.area(), rows);
            let block = Block::default()
                .borders(Borders::ALL)
                .border_style(Theme::border_style());

            // The canvas tracks the pane size; a resize needs a full repaint.
            let inner = block.inner(layout.menu_area);
            if state.navigator.renderer().size() != (inner.width, inner.height) {
                state.navigator.renderer_mut().resize(inner.width, inner.height);
                state.navigator.render();
            }

            frame.render_widget(
                MenuScreen::new(state.navigator.renderer()).block(block),
                layout.menu_area,
            );

            let hint = state.config.status_bar_hint();
            let status_text = state.status_message.as_deref().unwrap_or(&hint);
            let status = Paragraph::new(status_text).style(Theme::status_bar_style());
            frame.render_widget(status, layout.status_area);
        })?;

        tokio::select! {
            biased;

            Some(event) = events.recv() => {
                match event {
                    AppEvent::Key(k) => handler::handle_key(state, k),
                    AppEvent::Resize(_, _) | AppEvent::Tick => {}
                }
            }

            Some(command) = cmd_rx.recv() => {
                handler::apply_command(state, command);
            }

            else => return Ok(()),
        }

        // Commands queued by a leaf action during the key just handled.
        while let Ok(command) = cmd_rx.try_recv() {
            handler::apply_command(state, command);
        }

        if state.should_quit {
            return Ok(());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn viewport_must_fit_the_pane() {
        let cli = Cli::try_parse_from(["menu-nav", "--viewport", "3"]).unwrap();
        assert_eq!(cli.viewport, 3);
        assert_eq!(Cli::try_parse_from(["menu-nav"]).unwrap().viewport, 5);
        assert!(Cli::try_parse_from(["menu-nav", "--viewport", "0"]).is_err());
        assert!(Cli::try_parse_from(["menu-nav", "--viewport", "70000"]).is_err());
    }
}
