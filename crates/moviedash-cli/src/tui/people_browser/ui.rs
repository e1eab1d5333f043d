//! TUI rendering logic for the people browser.

use moviedash_data::Profession;
use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::symbols::Marker;
use ratatui::text::Line;
use ratatui::widgets::{
    Axis, Block, Borders, Chart, Dataset as Series, GraphType, List, ListItem, Paragraph, Row,
    Table,
};

use super::state::{Focus, PeopleBrowserState};

/// Colors assigned to chart series in label order.
const SERIES_COLORS: [Color; 6] = [
    Color::Cyan,
    Color::Magenta,
    Color::Green,
    Color::Yellow,
    Color::Blue,
    Color::Red,
];

/// Draws the people browser UI.
#[allow(clippy::indexing_slicing)]
pub fn draw(frame: &mut Frame, state: &mut PeopleBrowserState<'_>) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // header
            Constraint::Min(10),   // main content
            Constraint::Length(3), // footer
        ])
        .split(frame.area());

    draw_header(frame, chunks[0], state);

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(35), Constraint::Percentage(65)])
        .split(chunks[1]);

    let left = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(14), Constraint::Min(3)])
        .split(columns[0]);
    draw_categories(frame, left[0], state);
    draw_people(frame, left[1], state);

    let right = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(columns[1]);
    draw_movies(frame, right[0], state);
    draw_chart(frame, right[1], state);

    draw_footer(frame, chunks[2]);
}

/// Block with a highlighted border when `focused`.
fn pane(title: &str, focused: bool) -> Block<'_> {
    let border = if focused {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default()
    };
    Block::default()
        .borders(Borders::ALL)
        .title(title)
        .border_style(border)
}

/// Checkbox prefix for a toggle row.
const fn checkbox(on: bool) -> &'static str {
    if on { "[x] " } else { "[ ] " }
}

/// Draws the selection summary.
fn draw_header(frame: &mut Frame, area: Rect, state: &PeopleBrowserState<'_>) {
    let years = state.years();
    let range = match (years.min, years.max) {
        (Some(min), Some(max)) => format!("{min}..{max}"),
        (Some(min), None) => format!("{min}.."),
        (None, Some(max)) => format!("..{max}"),
        (None, None) => String::from("all years"),
    };
    let text = format!(
        "{} selected of {} people  |  {} movies  |  {range}",
        state.selected().len(),
        state.choices().len(),
        state.rows().len(),
    );
    let header =
        Paragraph::new(text).block(Block::default().borders(Borders::ALL).title(" People "));
    frame.render_widget(header, area);
}

/// Draws the category toggles.
fn draw_categories(frame: &mut Frame, area: Rect, state: &mut PeopleBrowserState<'_>) {
    let items: Vec<ListItem> = Profession::ALL
        .iter()
        .map(|p| {
            let on = state.categories().contains(p);
            ListItem::new(format!("{}{}", checkbox(on), p.label()))
        })
        .collect();

    let list = List::new(items)
        .block(pane(" Categories ", state.focus == Focus::Categories))
        .highlight_style(Style::default().add_modifier(Modifier::REVERSED));
    frame.render_stateful_widget(list, area, &mut state.category_state);
}

/// Draws the person toggles.
fn draw_people(frame: &mut Frame, area: Rect, state: &mut PeopleBrowserState<'_>) {
    let items: Vec<ListItem> = state
        .choices()
        .into_iter()
        .map(|label| {
            let on = state.selected().contains(label);
            ListItem::new(format!("{}{label}", checkbox(on)))
        })
        .collect();

    let list = List::new(items)
        .block(pane(" Names ", state.focus == Focus::People))
        .highlight_style(Style::default().add_modifier(Modifier::REVERSED));
    frame.render_stateful_widget(list, area, &mut state.people_state);
}

/// Draws the movie table.
fn draw_movies(frame: &mut Frame, area: Rect, state: &mut PeopleBrowserState<'_>) {
    let header = Row::new(vec!["Person", "Title", "Year", "Rating"])
        .style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )
        .bottom_margin(1);

    let rows: Vec<Row> = state
        .rows()
        .iter()
        .map(|r| {
            Row::new(vec![
                r.label.clone(),
                r.title.clone(),
                r.year.to_string(),
                format!("{:.1}", r.rating),
            ])
        })
        .collect();

    let widths = [
        Constraint::Min(18),
        Constraint::Min(20),
        Constraint::Length(6),
        Constraint::Length(6),
    ];

    let table = Table::new(rows, widths)
        .header(header)
        .block(pane(" Movies ", state.focus == Focus::Movies))
        .row_highlight_style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        );
    frame.render_stateful_widget(table, area, &mut state.table_state);
}

/// Year axis bounds covering every point, padded by one year.
#[allow(clippy::arithmetic_side_effects)]
fn year_bounds(series: &[(String, Vec<(f64, f64)>)]) -> [f64; 2] {
    let years = series.iter().flat_map(|(_, points)| points.iter().map(|p| p.0));
    let (min, max) = years.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), y| {
        (lo.min(y), hi.max(y))
    });
    if min > max {
        return [0.0, 1.0];
    }
    [min - 1.0, max + 1.0]
}

/// Draws rating over year, one series per selected label.
fn draw_chart(frame: &mut Frame, area: Rect, state: &PeopleBrowserState<'_>) {
    let series = state.series();
    let [x_min, x_max] = year_bounds(&series);

    let datasets: Vec<Series> = series
        .iter()
        .zip(SERIES_COLORS.iter().cycle())
        .map(|((label, points), color)| {
            Series::default()
                .name(label.clone())
                .marker(Marker::Braille)
                .graph_type(GraphType::Scatter)
                .style(Style::default().fg(*color))
                .data(points)
        })
        .collect();

    let x_axis = Axis::default()
        .title("Year")
        .bounds([x_min, x_max])
        .labels([format!("{x_min:.0}"), format!("{x_max:.0}")]);
    let y_axis = Axis::default()
        .title("Rating")
        .bounds([0.0, 10.0])
        .labels(["0", "5", "10"]);

    let chart = Chart::new(datasets)
        .block(Block::default().borders(Borders::ALL).title(" Rating by year "))
        .x_axis(x_axis)
        .y_axis(y_axis);
    frame.render_widget(chart, area);
}

/// Draws the key hints.
fn draw_footer(frame: &mut Frame, area: Rect) {
    let help = Line::from(
        "Tab: switch pane  \u{2191}\u{2193}/j/k: move  Space/Enter: toggle  q: quit",
    );
    let footer = Paragraph::new(help).block(Block::default().borders(Borders::ALL));
    frame.render_widget(footer, area);
}

#[cfg(test)]
mod tests {
    #![allow(clippy::indexing_slicing)]

    use super::*;

    #[test]
    fn test_year_bounds_pad_points() {
        // Arrange
        let series = vec![
            (String::from("A"), vec![(2000.0, 8.4), (2014.0, 8.7)]),
            (String::from("B"), vec![(2012.0, 8.5)]),
        ];

        // Act
        let bounds = year_bounds(&series);

        // Assert
        assert!((bounds[0] - 1999.0).abs() < f64::EPSILON);
        assert!((bounds[1] - 2015.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_year_bounds_without_points() {
        // Arrange & Act
        let bounds = year_bounds(&[]);

        // Assert
        assert!((bounds[1] - 1.0).abs() < f64::EPSILON);
    }
}
