//! People browser TUI state management.

use std::collections::{BTreeMap, BTreeSet};

use moviedash_data::{Bounds, Dataset, DefaultPeople, PeopleView, Profession, filter_by_people};
use ratatui::widgets::{ListState, TableState};

/// A movie row reached through a selected person.
#[derive(Debug, Clone, PartialEq)]
pub struct PersonRow {
    /// Person label.
    pub label: String,
    /// Movie title.
    pub title: String,
    /// Release year.
    pub year: u16,
    /// Rating.
    pub rating: f64,
}

/// Pane receiving navigation keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    /// Profession category toggles.
    Categories,
    /// Person label toggles.
    People,
    /// Resulting movie table.
    Movies,
}

impl Focus {
    /// The pane after this one.
    #[must_use]
    pub const fn next(self) -> Self {
        match self {
            Self::Categories => Self::People,
            Self::People => Self::Movies,
            Self::Movies => Self::Categories,
        }
    }
}

/// State for the people browser TUI.
#[derive(Debug)]
pub struct PeopleBrowserState<'a> {
    dataset: &'a Dataset,
    defaults: DefaultPeople,
    years: Bounds<u16>,
    /// View over the current categories; rebuilt on every category change.
    view: PeopleView<'a>,
    selected: BTreeSet<String>,
    rows: Vec<PersonRow>,
    /// Focused pane.
    pub focus: Focus,
    /// Cursor over `Profession::ALL`.
    pub category_state: ListState,
    /// Cursor over the person labels.
    pub people_state: ListState,
    /// Selection and scroll of the movie table.
    pub table_state: TableState,
}

impl<'a> PeopleBrowserState<'a> {
    /// Creates the state for `categories`.
    ///
    /// An empty `names` selects the defaults of the category set.
    #[must_use]
    pub fn new(
        dataset: &'a Dataset,
        defaults: DefaultPeople,
        categories: &BTreeSet<Profession>,
        names: &[String],
        years: Bounds<u16>,
    ) -> Self {
        let view = PeopleView::new(dataset.people(), categories);
        let selected = if names.is_empty() {
            view.default_selection(&defaults).into_iter().collect()
        } else {
            names.iter().cloned().collect()
        };

        let mut state = Self {
            dataset,
            defaults,
            years,
            view,
            selected,
            rows: Vec::new(),
            focus: Focus::Categories,
            category_state: ListState::default().with_selected(Some(0)),
            people_state: ListState::default(),
            table_state: TableState::default(),
        };
        state.reset_people_cursor();
        state.refilter();
        state
    }

    /// Categories in view.
    #[must_use]
    pub const fn categories(&self) -> &BTreeSet<Profession> {
        self.view.categories()
    }

    /// Selectable person labels.
    #[must_use]
    pub fn choices(&self) -> Vec<&str> {
        self.view.choices()
    }

    /// Selected person labels.
    #[must_use]
    pub const fn selected(&self) -> &BTreeSet<String> {
        &self.selected
    }

    /// Release year range applied to the movies.
    #[must_use]
    pub const fn years(&self) -> Bounds<u16> {
        self.years
    }

    /// Movies of the selected people, in canonical order.
    #[must_use]
    pub fn rows(&self) -> &[PersonRow] {
        &self.rows
    }

    /// `(year, rating)` points per selected label, ordered by label.
    #[must_use]
    pub fn series(&self) -> Vec<(String, Vec<(f64, f64)>)> {
        let mut by_label: BTreeMap<&str, Vec<(f64, f64)>> = BTreeMap::new();
        for row in &self.rows {
            by_label
                .entry(row.label.as_str())
                .or_default()
                .push((f64::from(row.year), row.rating));
        }
        by_label
            .into_iter()
            .map(|(label, points)| (String::from(label), points))
            .collect()
    }

    /// Adds or removes `category`, then rebuilds the view and resets the
    /// selection to the defaults of the new category set.
    pub fn toggle_category(&mut self, category: Profession) {
        let mut categories = self.view.categories().clone();
        if !categories.remove(&category) {
            categories.insert(category);
        }

        self.view = PeopleView::new(self.dataset.people(), &categories);
        self.selected = self
            .view
            .default_selection(&self.defaults)
            .into_iter()
            .collect();
        tracing::debug!(
            categories = ?categories,
            selected = ?self.selected,
            "Categories changed, selection reset"
        );

        self.reset_people_cursor();
        self.refilter();
    }

    /// Toggles the category under the cursor.
    pub fn toggle_current_category(&mut self) {
        let category = self
            .category_state
            .selected()
            .and_then(|i| Profession::ALL.get(i))
            .copied();
        if let Some(category) = category {
            self.toggle_category(category);
        }
    }

    /// Adds or removes `label` from the selection.
    pub fn toggle_person(&mut self, label: &str) {
        if !self.selected.remove(label) {
            self.selected.insert(String::from(label));
        }
        self.refilter();
    }

    /// Toggles the person under the cursor.
    pub fn toggle_current_person(&mut self) {
        let label = self
            .people_state
            .selected()
            .and_then(|i| self.view.choices().get(i).map(|l| String::from(*l)));
        if let Some(label) = label {
            self.toggle_person(&label);
        }
    }

    /// Toggles the item under the cursor of the focused pane.
    pub fn toggle_current(&mut self) {
        match self.focus {
            Focus::Categories => self.toggle_current_category(),
            Focus::People => self.toggle_current_person(),
            Focus::Movies => {}
        }
    }

    /// Moves the cursor of the focused pane up.
    pub fn move_up(&mut self) {
        match self.focus {
            Focus::Categories => step_back(&mut self.category_state),
            Focus::People => step_back(&mut self.people_state),
            Focus::Movies => {
                let current = self.table_state.selected().unwrap_or(0);
                self.table_state.select(Some(current.saturating_sub(1)));
            }
        }
    }

    /// Moves the cursor of the focused pane down.
    pub fn move_down(&mut self) {
        match self.focus {
            Focus::Categories => step_forward(&mut self.category_state, Profession::ALL.len()),
            Focus::People => {
                let len = self.view.choices().len();
                step_forward(&mut self.people_state, len);
            }
            Focus::Movies => {
                let max = self.rows.len().saturating_sub(1);
                let current = self.table_state.selected().unwrap_or(0);
                self.table_state
                    .select(Some(current.saturating_add(1).min(max)));
            }
        }
    }

    /// Points the person cursor at the first choice, if any.
    fn reset_people_cursor(&mut self) {
        let first = if self.view.choices().is_empty() {
            None
        } else {
            Some(0)
        };
        self.people_state.select(first);
    }

    /// Recomputes the movie rows from the selection.
    fn refilter(&mut self) {
        self.rows = filter_by_people(self.dataset, &self.view, &self.selected, self.years)
            .into_iter()
            .map(|row| PersonRow {
                label: row.label,
                title: row.movie.title.clone(),
                year: row.movie.year,
                rating: row.movie.rating,
            })
            .collect();
        let first = if self.rows.is_empty() { None } else { Some(0) };
        self.table_state.select(first);
    }
}

/// Moves a list cursor one step back.
fn step_back(state: &mut ListState) {
    if let Some(current) = state.selected() {
        state.select(Some(current.saturating_sub(1)));
    }
}

/// Moves a list cursor one step forward within `len` items.
fn step_forward(state: &mut ListState, len: usize) {
    if let Some(current) = state.selected() {
        let max = len.saturating_sub(1);
        state.select(Some(current.saturating_add(1).min(max)));
    }
}
