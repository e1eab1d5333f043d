//! Movie browser TUI state management.

use moviedash_api::justwatch::Country;
use moviedash_api::links::OutboundLinks;
use moviedash_api::omdb::MovieMetadata;
use ratatui::widgets::TableState;

use crate::context::OfferLookup;

/// A movie row for display.
#[derive(Debug, Clone)]
pub struct MovieRow {
    /// Internal movie code.
    pub code: u32,
    /// Title.
    pub title: String,
    /// Release year.
    pub year: u16,
    /// Rating.
    pub rating: f64,
    /// Vote count.
    pub votes: u64,
    /// Runtime in minutes.
    pub runtime: Option<u32>,
    /// Display genres.
    pub genres: String,
    /// Titles of similar movies, in canonical order.
    pub similar: Vec<String>,
}

/// Input mode for the browser.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    /// Normal navigation mode.
    Normal,
    /// Filter text input mode.
    Filter,
}

/// Summary statistics for the header.
#[derive(Debug, Clone)]
pub struct BrowserStats {
    /// Movies in the dataset.
    pub total_movies: usize,
    /// Dataset update marker.
    pub last_updated: String,
}

/// Live data fetched for one movie.
#[derive(Debug)]
pub struct DetailPane {
    /// Movie the data belongs to.
    pub code: u32,
    /// OMDb metadata, once requested.
    pub metadata: Option<MovieMetadata>,
    /// JustWatch offers, once requested.
    pub offers: Option<OfferLookup>,
    /// Outbound links, once requested.
    pub links: Option<OutboundLinks>,
}

impl DetailPane {
    const fn empty(code: u32) -> Self {
        Self {
            code,
            metadata: None,
            offers: None,
            links: None,
        }
    }
}

/// State for the movie browser TUI.
#[allow(clippy::module_name_repetitions)]
#[derive(Debug)]
pub struct BrowserState {
    /// Movies matching the command-line criteria, in canonical order.
    pub movies: Vec<MovieRow>,
    /// Summary statistics.
    pub stats: BrowserStats,
    /// Table state for the movie list (handles selection and scroll).
    pub table_state: TableState,
    /// Current input mode.
    pub input_mode: InputMode,
    /// Filter text.
    pub filter: String,
    /// Status line message.
    pub status: Option<String>,
    /// Country used for offers and the JustWatch link.
    country: Country,
    /// Fetched data for the selected movie.
    detail: Option<DetailPane>,
    /// Cached filtered movie indices.
    filtered_indices: Vec<usize>,
}

impl BrowserState {
    /// Creates a new state from movie rows.
    #[must_use]
    pub fn new(movies: Vec<MovieRow>, stats: BrowserStats, country: Country) -> Self {
        let filtered_indices: Vec<usize> = (0..movies.len()).collect();
        let mut table_state = TableState::default();
        if !movies.is_empty() {
            table_state.select(Some(0));
        }
        Self {
            movies,
            stats,
            table_state,
            input_mode: InputMode::Normal,
            filter: String::new(),
            status: None,
            country,
            detail: None,
            filtered_indices,
        }
    }

    /// Returns the cursor position.
    #[must_use]
    pub fn cursor(&self) -> usize {
        self.table_state.selected().unwrap_or(0)
    }

    /// Returns filtered movie indices.
    #[must_use]
    pub fn filtered_movies(&self) -> &[usize] {
        &self.filtered_indices
    }

    /// Returns the current movie row (if any).
    #[must_use]
    pub fn current_movie(&self) -> Option<&MovieRow> {
        let idx = self.filtered_indices.get(self.cursor())?;
        self.movies.get(*idx)
    }

    /// Fetched data for the current movie, if any.
    #[must_use]
    pub fn current_detail(&self) -> Option<&DetailPane> {
        let code = self.current_movie()?.code;
        self.detail.as_ref().filter(|d| d.code == code)
    }

    /// Stores metadata for `code`.
    pub fn set_metadata(&mut self, code: u32, metadata: MovieMetadata) {
        self.detail_for(code).metadata = Some(metadata);
    }

    /// Stores offers for `code`.
    pub fn set_offers(&mut self, code: u32, offers: OfferLookup) {
        self.detail_for(code).offers = Some(offers);
    }

    /// Stores outbound links for `code`.
    pub fn set_links(&mut self, code: u32, links: OutboundLinks) {
        self.detail_for(code).links = Some(links);
    }

    /// Country used for offer lookups.
    #[must_use]
    pub const fn country(&self) -> Country {
        self.country
    }

    /// Switches to the next country. Offers and links fetched for the
    /// previous country are dropped.
    pub fn cycle_country(&mut self) {
        self.country = self.country.next();
        if let Some(detail) = self.detail.as_mut() {
            detail.offers = None;
            detail.links = None;
        }
    }

    /// Detail slot for `code`, replacing data of any other movie.
    fn detail_for(&mut self, code: u32) -> &mut DetailPane {
        let detail = self.detail.get_or_insert_with(|| DetailPane::empty(code));
        if detail.code != code {
            *detail = DetailPane::empty(code);
        }
        detail
    }

    /// Moves cursor up.
    #[allow(clippy::arithmetic_side_effects)]
    pub fn move_up(&mut self) {
        let current = self.cursor();
        if current > 0 {
            self.table_state.select(Some(current - 1));
        }
    }

    /// Moves cursor down.
    #[allow(clippy::arithmetic_side_effects)]
    pub fn move_down(&mut self) {
        let current = self.cursor();
        if current + 1 < self.filtered_indices.len() {
            self.table_state.select(Some(current + 1));
        }
    }

    /// Scrolls up by a page.
    pub fn page_up(&mut self, page_size: usize) {
        let current = self.cursor();
        self.table_state
            .select(Some(current.saturating_sub(page_size)));
    }

    /// Scrolls down by a page.
    pub fn page_down(&mut self, page_size: usize) {
        let max = self.filtered_indices.len().saturating_sub(1);
        let current = self.cursor();
        self.table_state
            .select(Some(current.saturating_add(page_size).min(max)));
    }

    /// Updates the filter and rebuilds the cache.
    pub fn set_filter(&mut self, filter: String) {
        self.filter = filter;
        self.rebuild_filter_cache();
        self.select_first();
    }

    /// Appends a character to the filter.
    pub fn filter_push(&mut self, ch: char) {
        self.filter.push(ch);
        self.rebuild_filter_cache();
        self.select_first();
    }

    /// Removes the last character from the filter.
    pub fn filter_pop(&mut self) {
        self.filter.pop();
        self.rebuild_filter_cache();
        self.select_first();
    }

    /// Selects the first movie if available.
    fn select_first(&mut self) {
        if self.filtered_indices.is_empty() {
            self.table_state.select(None);
        } else {
            self.table_state.select(Some(0));
        }
    }

    /// Rebuilds the filtered movie indices cache.
    fn rebuild_filter_cache(&mut self) {
        if self.filter.is_empty() {
            self.filtered_indices = (0..self.movies.len()).collect();
        } else {
            let filter_lower = self.filter.to_lowercase();
            self.filtered_indices = self
                .movies
                .iter()
                .enumerate()
                .filter(|(_, m)| {
                    m.title.to_lowercase().contains(&filter_lower)
                        || m.genres.to_lowercase().contains(&filter_lower)
                        || m.year.to_string().contains(&filter_lower)
                })
                .map(|(i, _)| i)
                .collect();
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    fn row(code: u32, title: &str, year: u16, genres: &str) -> MovieRow {
        MovieRow {
            code,
            title: String::from(title),
            year,
            rating: 8.0,
            votes: 500_000,
            runtime: Some(120),
            genres: String::from(genres),
            similar: Vec::new(),
        }
    }

    fn make_state() -> BrowserState {
        let movies = vec![
            row(3, "The Departed", 2006, "crime,drama,thriller"),
            row(0, "Heat", 1995, "action,crime,drama"),
            row(4, "Zodiac", 2007, "crime,drama,mystery"),
        ];
        let stats = BrowserStats {
            total_movies: 9,
            last_updated: String::from("2021-11-14"),
        };
        BrowserState::new(movies, stats, Country::Us)
    }

    #[test]
    fn test_initial_state() {
        // Arrange & Act
        let state = make_state();

        // Assert
        assert_eq!(state.filtered_movies().len(), 3);
        assert_eq!(state.cursor(), 0);
        assert_eq!(state.current_movie().unwrap().title, "The Departed");
        assert!(state.current_detail().is_none());
    }

    #[test]
    fn test_empty_state_has_no_selection() {
        // Arrange & Act
        let state = BrowserState::new(
            Vec::new(),
            BrowserStats {
                total_movies: 0,
                last_updated: String::new(),
            },
            Country::Us,
        );

        // Assert
        assert!(state.table_state.selected().is_none());
        assert!(state.current_movie().is_none());
    }

    #[test]
    fn test_move_down_and_up() {
        // Arrange
        let mut state = make_state();

        // Act & Assert
        state.move_down();
        state.move_down();
        assert_eq!(state.cursor(), 2);

        state.move_down(); // at end, should not move
        assert_eq!(state.cursor(), 2);

        state.move_up();
        assert_eq!(state.cursor(), 1);
    }

    #[test]
    fn test_page_up_and_page_down() {
        // Arrange
        let mut state = make_state();

        // Act
        state.page_down(10);

        // Assert: clamped to last item
        assert_eq!(state.cursor(), 2);

        // Act
        state.page_up(10);

        // Assert
        assert_eq!(state.cursor(), 0);
    }

    #[test]
    fn test_filter_by_title_genre_and_year() {
        // Arrange
        let mut state = make_state();

        // Act & Assert
        state.set_filter(String::from("heat"));
        assert_eq!(state.current_movie().unwrap().code, 0);

        state.set_filter(String::from("MYSTERY"));
        assert_eq!(state.current_movie().unwrap().title, "Zodiac");

        state.set_filter(String::from("200"));
        assert_eq!(state.filtered_movies().len(), 2);

        state.filter_pop();
        state.filter_pop();
        state.filter_pop();
        assert_eq!(state.filtered_movies().len(), 3);
    }

    #[test]
    fn test_filter_no_match() {
        // Arrange
        let mut state = make_state();

        // Act
        state.set_filter(String::from("nonexistent"));

        // Assert
        assert!(state.filtered_movies().is_empty());
        assert!(state.current_movie().is_none());
    }

    #[test]
    fn test_detail_follows_selected_movie() {
        // Arrange
        let mut state = make_state();

        // Act
        state.set_metadata(3, MovieMetadata::unavailable());
        state.set_offers(3, OfferLookup::NoData(String::from("none")));

        // Assert
        let detail = state.current_detail().unwrap();
        assert!(detail.metadata.is_some());
        assert!(detail.offers.is_some());

        // Act: another movie is selected
        state.move_down();

        // Assert
        assert!(state.current_detail().is_none());
    }

    #[test]
    fn test_detail_replaced_for_new_movie() {
        // Arrange
        let mut state = make_state();
        state.set_metadata(3, MovieMetadata::unavailable());

        // Act
        state.move_down();
        state.set_offers(0, OfferLookup::NoData(String::from("none")));

        // Assert
        let detail = state.current_detail().unwrap();
        assert_eq!(detail.code, 0);
        assert!(detail.metadata.is_none());
        assert!(detail.offers.is_some());
    }

    #[test]
    fn test_cycle_country_drops_country_bound_data() {
        // Arrange
        let mut state = make_state();
        let links = OutboundLinks::new("tt0407887", "The Departed", Country::Us);
        state.set_metadata(3, MovieMetadata::unavailable());
        state.set_offers(3, OfferLookup::NoData(String::from("none")));
        state.set_links(3, links);

        // Act
        state.cycle_country();

        // Assert
        assert_eq!(state.country(), Country::Au);
        let detail = state.current_detail().unwrap();
        assert!(detail.metadata.is_some());
        assert!(detail.offers.is_none());
        assert!(detail.links.is_none());
    }

    #[test]
    fn test_cycle_country_wraps_around() {
        // Arrange
        let mut state = make_state();

        // Act
        for _ in 0..Country::ALL.len() {
            state.cycle_country();
        }

        // Assert
        assert_eq!(state.country(), Country::Us);
    }

    #[test]
    fn test_links_kept_with_detail() {
        // Arrange
        let mut state = make_state();
        let links = OutboundLinks::new("tt0407887", "The Departed", Country::Us);

        // Act
        state.set_links(3, links.clone());

        // Assert
        assert_eq!(state.current_detail().unwrap().links.as_ref(), Some(&links));
    }
}
