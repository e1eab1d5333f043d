//! Movie browser TUI main loop.

/// Movie browser state types.
pub mod state;
mod ui;

use std::io;

use anyhow::{Context, Result};
use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use moviedash_data::{Movie, similar_movies};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;

use self::state::{BrowserState, BrowserStats, InputMode, MovieRow};
use crate::context::AppContext;

/// Work requested by a key press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Action {
    /// Nothing to do.
    None,
    /// Leave the browser.
    Quit,
    /// Load OMDb metadata and outbound links for the selected movie.
    FetchMetadata,
    /// Load JustWatch offers for the selected movie.
    FetchOffers,
    /// Open the n-th outbound link (0 is IMDb) of the selected movie.
    OpenLink(usize),
}

/// Runs the movie browser TUI over `movies`.
///
/// # Errors
///
/// Returns an error if terminal setup or event handling fails.
#[allow(clippy::module_name_repetitions)]
pub async fn run_movie_browser(ctx: &AppContext, movies: &[&Movie]) -> Result<()> {
    let dataset = ctx.dataset();
    let rows: Vec<MovieRow> = movies
        .iter()
        .map(|m| MovieRow {
            code: m.code,
            title: m.title.clone(),
            year: m.year,
            rating: m.rating,
            votes: m.votes,
            runtime: m.runtime,
            genres: m.genres.clone(),
            similar: similar_movies(dataset, m.code)
                .into_iter()
                .map(|s| s.title.clone())
                .collect(),
        })
        .collect();

    let stats = BrowserStats {
        total_movies: dataset.movies().len(),
        last_updated: dataset.last_updated().to_string(),
    };
    let mut state = BrowserState::new(rows, stats, ctx.country());

    enable_raw_mode().context("failed to enable raw mode")?;
    let mut stdout = io::stdout();
    crossterm::execute!(stdout, EnterAlternateScreen)
        .context("failed to enter alternate screen")?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("failed to create terminal")?;

    let result = run_event_loop(&mut terminal, &mut state, ctx).await;

    // Cleanup (always attempt even if event loop failed)
    disable_raw_mode().context("failed to disable raw mode")?;
    crossterm::execute!(io::stdout(), LeaveAlternateScreen)
        .context("failed to leave alternate screen")?;

    result
}

/// Main event loop. Fetches run to completion before the next key is read.
async fn run_event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    state: &mut BrowserState,
    ctx: &AppContext,
) -> Result<()> {
    let mut main_area_height: u16 = 0;

    loop {
        terminal
            .draw(|frame| {
                main_area_height = ui::draw(frame, state);
            })
            .context("failed to draw TUI")?;

        let page_size = usize::from(main_area_height.saturating_sub(4));

        if event::poll(std::time::Duration::from_millis(100)).context("failed to poll events")?
            && let Event::Key(key) = event::read().context("failed to read event")?
            && key.kind == KeyEventKind::Press
        {
            let action = match state.input_mode {
                InputMode::Filter => handle_filter_input(state, key.code),
                InputMode::Normal => handle_normal_input(state, key.code, key.modifiers, page_size),
            };
            if action == Action::Quit {
                return Ok(());
            }
            if action != Action::None {
                state.status = Some(String::from("Loading..."));
                terminal
                    .draw(|frame| {
                        main_area_height = ui::draw(frame, state);
                    })
                    .context("failed to draw TUI")?;
                run_action(action, state, ctx).await;
            }
        }
    }
}

/// Handles key input in filter mode.
fn handle_filter_input(state: &mut BrowserState, key: KeyCode) -> Action {
    match key {
        KeyCode::Esc => {
            state.set_filter(String::new());
            state.input_mode = InputMode::Normal;
        }
        KeyCode::Enter => {
            state.input_mode = InputMode::Normal;
        }
        KeyCode::Backspace => {
            state.filter_pop();
        }
        KeyCode::Char(c) => {
            state.filter_push(c);
        }
        _ => {}
    }
    Action::None
}

/// Handles key input in normal mode.
fn handle_normal_input(
    state: &mut BrowserState,
    key: KeyCode,
    modifiers: KeyModifiers,
    page_size: usize,
) -> Action {
    state.status = None;
    match key {
        KeyCode::Char('q') => return Action::Quit,
        KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => return Action::Quit,
        KeyCode::Char('c') => state.cycle_country(),
        KeyCode::Up | KeyCode::Char('k') => state.move_up(),
        KeyCode::Down | KeyCode::Char('j') => state.move_down(),
        KeyCode::PageUp => state.page_up(page_size),
        KeyCode::PageDown => state.page_down(page_size),
        KeyCode::Char('/') => state.input_mode = InputMode::Filter,
        KeyCode::Enter if state.current_movie().is_some() => return Action::FetchMetadata,
        KeyCode::Char('w') if state.current_movie().is_some() => return Action::FetchOffers,
        KeyCode::Char('o') if state.current_movie().is_some() => return Action::OpenLink(0),
        KeyCode::Char(c @ '1'..='5') if state.current_movie().is_some() => {
            return link_index(c).map_or(Action::None, Action::OpenLink);
        }
        _ => {}
    }
    Action::None
}

/// Zero-based link index for a `1`-`5` key.
fn link_index(key: char) -> Option<usize> {
    let digit = key.to_digit(10)?.checked_sub(1)?;
    usize::try_from(digit).ok()
}

/// Performs a fetch or link action for the selected movie.
async fn run_action(action: Action, state: &mut BrowserState, ctx: &AppContext) {
    state.status = None;
    let Some(row) = state.current_movie() else {
        return;
    };
    let code = row.code;
    let title = row.title.clone();

    match action {
        Action::FetchMetadata => {
            match ctx.dataset().resolve_public_id(code) {
                Ok(public_id) => {
                    let metadata = ctx.metadata(public_id).await;
                    state.set_metadata(code, metadata);
                }
                Err(e) => {
                    state.status = Some(format!("{e:#}"));
                    return;
                }
            }
            load_links(state, ctx, code).await;
        }
        Action::FetchOffers => {
            let offers = ctx.offers(&title, state.country()).await;
            state.set_offers(code, offers);
        }
        Action::OpenLink(index) => {
            let loaded = state
                .current_detail()
                .is_some_and(|detail| detail.links.is_some());
            if !loaded {
                load_links(state, ctx, code).await;
            }
            let Some(link) = state
                .current_detail()
                .and_then(|detail| detail.links.as_ref())
                .and_then(|links| links.all().get(index).copied())
                .cloned()
            else {
                return;
            };
            tracing::debug!(site = link.site, url = %link.url, "Opening link");
            if let Err(e) = open::that(&link.url) {
                state.status = Some(format!("failed to open {}: {e}", link.url));
            }
        }
        Action::None | Action::Quit => {}
    }
}

/// Builds the outbound links of `code` for the browser's current country.
async fn load_links(state: &mut BrowserState, ctx: &AppContext, code: u32) {
    let Some(movie) = ctx.dataset().movie(code) else {
        return;
    };
    match ctx.links(movie, state.country()).await {
        Ok(links) => state.set_links(code, links),
        Err(e) => state.status = Some(format!("{e:#}")),
    }
}
