//! People browser TUI main loop.

/// People browser state types.
pub mod state;
mod ui;

use std::collections::BTreeSet;
use std::io;

use anyhow::{Context, Result};
use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use moviedash_data::{Bounds, Profession};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;

use self::state::PeopleBrowserState;
use crate::context::AppContext;

/// Runs the people browser TUI.
///
/// `names` overrides the default selection of the starting categories.
///
/// # Errors
///
/// Returns an error if terminal setup or event handling fails.
#[allow(clippy::module_name_repetitions)]
pub fn run_people_browser(
    ctx: &AppContext,
    categories: &BTreeSet<Profession>,
    names: &[String],
    years: Bounds<u16>,
) -> Result<()> {
    let mut state = PeopleBrowserState::new(
        ctx.dataset(),
        ctx.default_people().clone(),
        categories,
        names,
        years,
    );

    enable_raw_mode().context("failed to enable raw mode")?;
    let mut stdout = io::stdout();
    crossterm::execute!(stdout, EnterAlternateScreen)
        .context("failed to enter alternate screen")?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("failed to create terminal")?;

    let result = run_event_loop(&mut terminal, &mut state);

    // Cleanup (always attempt even if event loop failed)
    disable_raw_mode().context("failed to disable raw mode")?;
    crossterm::execute!(io::stdout(), LeaveAlternateScreen)
        .context("failed to leave alternate screen")?;

    result
}

/// Main event loop.
fn run_event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    state: &mut PeopleBrowserState<'_>,
) -> Result<()> {
    loop {
        terminal
            .draw(|frame| ui::draw(frame, state))
            .context("failed to draw TUI")?;

        if event::poll(std::time::Duration::from_millis(100)).context("failed to poll events")?
            && let Event::Key(key) = event::read().context("failed to read event")?
            && key.kind == KeyEventKind::Press
            && handle_input(state, key.code, key.modifiers)
        {
            return Ok(());
        }
    }
}

/// Handles one key press. Returns `true` when the browser should close.
fn handle_input(state: &mut PeopleBrowserState<'_>, key: KeyCode, modifiers: KeyModifiers) -> bool {
    match key {
        KeyCode::Char('q') => return true,
        KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => return true,
        KeyCode::Tab => state.focus = state.focus.next(),
        KeyCode::Up | KeyCode::Char('k') => state.move_up(),
        KeyCode::Down | KeyCode::Char('j') => state.move_down(),
        KeyCode::Char(' ') | KeyCode::Enter => state.toggle_current(),
        _ => {}
    }
    false
}
