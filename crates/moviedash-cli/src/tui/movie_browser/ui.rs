//! TUI rendering logic for the movie browser.

use moviedash_api::omdb::MetadataField;
use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Row, Table, Wrap};

use super::state::{BrowserState, InputMode, MovieRow};
use crate::context::OfferLookup;

/// Formats a number with thousands separators (e.g. 169940 -> "169,940").
#[allow(clippy::arithmetic_side_effects)]
fn fmt_num(n: u64) -> String {
    let s = n.to_string();
    let mut result = String::with_capacity(s.len() + s.len() / 3);
    for (i, c) in s.chars().enumerate() {
        if i > 0 && (s.len() - i).is_multiple_of(3) {
            result.push(',');
        }
        result.push(c);
    }
    result
}

/// Draws the browser UI. Returns the main content area height for page size calculation.
#[allow(clippy::indexing_slicing)]
pub fn draw(frame: &mut Frame, state: &mut BrowserState) -> u16 {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4), // header (2 lines of stats)
            Constraint::Min(5),    // main content
            Constraint::Length(3), // footer
        ])
        .split(frame.area());

    draw_header(frame, chunks[0], state);

    let main_area = chunks[1];
    let pane_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
        .split(main_area);

    draw_movie_list(frame, pane_chunks[0], state);
    draw_detail(frame, pane_chunks[1], state);

    draw_footer(frame, chunks[2], state);

    main_area.height
}

/// Draws the header with filter input and movie count.
#[allow(clippy::indexing_slicing)]
fn draw_header(frame: &mut Frame, area: Rect, state: &BrowserState) {
    let header_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(area);

    let filter_style = if state.input_mode == InputMode::Filter {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default()
    };

    let filter = Paragraph::new(state.filter.clone())
        .style(filter_style)
        .block(Block::default().borders(Borders::ALL).title(" Filter: / "));
    frame.render_widget(filter, header_chunks[0]);

    let line1 = format!(
        "{} matching  (shown: {})",
        fmt_num(u64::try_from(state.movies.len()).unwrap_or(u64::MAX)),
        fmt_num(u64::try_from(state.filtered_movies().len()).unwrap_or(u64::MAX)),
    );
    let line2 = format!(
        "{} movies, updated {}",
        fmt_num(u64::try_from(state.stats.total_movies).unwrap_or(u64::MAX)),
        state.stats.last_updated
    );
    let count = Paragraph::new(vec![Line::from(line1), Line::from(line2)])
        .block(Block::default().borders(Borders::ALL).title(" Movies "));
    frame.render_widget(count, header_chunks[1]);
}

/// Draws the movie list pane (left).
fn draw_movie_list(frame: &mut Frame, area: Rect, state: &mut BrowserState) {
    let header = Row::new(vec!["Title", "Year", "Rating", "Votes", "Min", "Genres"])
        .style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )
        .bottom_margin(1);

    let rows: Vec<Row> = state
        .filtered_movies()
        .iter()
        .filter_map(|&idx| {
            let m = state.movies.get(idx)?;
            Some(Row::new(vec![
                m.title.clone(),
                m.year.to_string(),
                format!("{:.1}", m.rating),
                fmt_num(m.votes),
                m.runtime.map_or_else(|| String::from("--"), |r| r.to_string()),
                m.genres.clone(),
            ]))
        })
        .collect();

    let widths = [
        Constraint::Min(20),
        Constraint::Length(6),
        Constraint::Length(6),
        Constraint::Length(11),
        Constraint::Length(5),
        Constraint::Length(24),
    ];

    let table = Table::new(rows, widths)
        .header(header)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Movies ")
                .border_style(Style::default().fg(Color::Cyan)),
        )
        .row_highlight_style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        );

    frame.render_stateful_widget(table, area, &mut state.table_state);
}

/// Draws the detail pane (right): similar movies, metadata, offers and links.
fn draw_detail(frame: &mut Frame, area: Rect, state: &BrowserState) {
    let Some(movie) = state.current_movie() else {
        let empty = Paragraph::new("No movie selected")
            .block(Block::default().borders(Borders::ALL).title(" Details "));
        frame.render_widget(empty, area);
        return;
    };

    let title = format!(" {} ({}) ", movie.title, movie.year);
    let paragraph = Paragraph::new(detail_lines(movie, state))
        .wrap(Wrap { trim: true })
        .block(Block::default().borders(Borders::ALL).title(title));
    frame.render_widget(paragraph, area);
}

/// Text of the detail pane for `movie`.
fn detail_lines(movie: &MovieRow, state: &BrowserState) -> Vec<Line<'static>> {
    let label_style = Style::default().fg(Color::Yellow);
    let mut lines: Vec<Line> = Vec::new();

    let similar = if movie.similar.is_empty() {
        String::from("--")
    } else {
        movie.similar.join(", ")
    };
    lines.push(Line::from(vec![
        Span::styled("Similar: ", label_style),
        Span::raw(similar),
    ]));
    lines.push(Line::from(""));

    let detail = state.current_detail();
    match detail.and_then(|d| d.metadata.as_ref()) {
        Some(metadata) => {
            for (field, value) in metadata.iter() {
                if field == MetadataField::Poster {
                    continue;
                }
                lines.push(Line::from(vec![
                    Span::styled(format!("{}: ", field.label()), label_style),
                    Span::raw(value.to_owned()),
                ]));
            }
        }
        None => lines.push(Line::from("Enter: load metadata")),
    }
    lines.push(Line::from(""));

    match detail.and_then(|d| d.offers.as_ref()) {
        Some(OfferLookup::Found(table)) => {
            lines.push(Line::from(Span::styled(
                format!("Offers ({}):", table.country),
                label_style,
            )));
            for row in table.rows() {
                lines.push(Line::from(format!(
                    "  {:<9} {:<16} {}",
                    row.monetization_type, row.provider, row.quality_options
                )));
            }
        }
        Some(OfferLookup::NoData(message)) => lines.push(Line::from(message.clone())),
        None => lines.push(Line::from(format!(
            "w: where to watch ({})  c: change country",
            state.country()
        ))),
    }
    lines.push(Line::from(""));

    match detail.and_then(|d| d.links.as_ref()) {
        Some(links) => {
            lines.push(Line::from(Span::styled("Links:", label_style)));
            for (key, link) in (1_u8..).zip(links.all()) {
                lines.push(Line::from(format!("  {key} {:<16} {}", link.site, link.url)));
            }
        }
        None => lines.push(Line::from("Enter: load links")),
    }

    lines
}

/// Draws the footer with key hints or the status message.
fn draw_footer(frame: &mut Frame, area: Rect, state: &BrowserState) {
    let help_text = match (&state.input_mode, &state.status) {
        (InputMode::Filter, _) => Line::from("Type to filter | Esc: cancel | Enter: apply"),
        (InputMode::Normal, Some(status)) => Line::from(status.clone()),
        (InputMode::Normal, None) => Line::from(vec![Span::raw(
            "\u{2191}\u{2193}/j/k: move  PgUp/PgDn: page  /: filter  Enter: details  w: offers  c: country  o/1-5: open link  q: quit",
        )]),
    };

    let footer = Paragraph::new(help_text).block(Block::default().borders(Borders::ALL));
    frame.render_widget(footer, area);
}
