//! People table rows, the people view and the people filter.

use std::collections::{BTreeSet, HashMap, HashSet};
use std::fmt;
use std::path::Path;
use std::str::FromStr;

use anyhow::{Result, anyhow};
use serde::{Deserialize, Serialize};

use crate::dataset::Dataset;
use crate::filter::{Bounds, canonical_cmp};
use crate::movies::{Movie, deserialize_codes, read_csv};

/// Profession category of a person.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Profession {
    /// Director.
    Director,
    /// Actor.
    Actor,
    /// Actress.
    Actress,
    /// Producer.
    Producer,
    /// Writer.
    Writer,
    /// Appears as themselves.
    #[serde(rename = "self")]
    SelfAppearance,
    /// Editor.
    Editor,
    /// Cinematographer.
    Cinematographer,
    /// Composer.
    Composer,
    /// Production designer.
    ProductionDesigner,
    /// Archive footage.
    ArchiveFootage,
    /// Archive sound.
    ArchiveSound,
}

impl Profession {
    /// All professions in menu order.
    pub const ALL: [Self; 12] = [
        Self::Director,
        Self::Actor,
        Self::Actress,
        Self::Producer,
        Self::Writer,
        Self::SelfAppearance,
        Self::Editor,
        Self::Cinematographer,
        Self::Composer,
        Self::ProductionDesigner,
        Self::ArchiveFootage,
        Self::ArchiveSound,
    ];

    /// Identifier as stored in `people.csv`.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Director => "director",
            Self::Actor => "actor",
            Self::Actress => "actress",
            Self::Producer => "producer",
            Self::Writer => "writer",
            Self::SelfAppearance => "self",
            Self::Editor => "editor",
            Self::Cinematographer => "cinematographer",
            Self::Composer => "composer",
            Self::ProductionDesigner => "production_designer",
            Self::ArchiveFootage => "archive_footage",
            Self::ArchiveSound => "archive_sound",
        }
    }

    /// Human-readable label used for disambiguated names.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Director => "Director",
            Self::Actor => "Actor",
            Self::Actress => "Actress",
            Self::Producer => "Producer",
            Self::Writer => "Writer",
            Self::SelfAppearance => "Self",
            Self::Editor => "Editor",
            Self::Cinematographer => "Cinematographer",
            Self::Composer => "Composer",
            Self::ProductionDesigner => "Production Designer",
            Self::ArchiveFootage => "Archive Footage",
            Self::ArchiveSound => "Archive Sound",
        }
    }
}

impl fmt::Display for Profession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Profession {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        let normalized = s.trim().to_lowercase().replace([' ', '-'], "_");
        Self::ALL
            .into_iter()
            .find(|p| p.as_str() == normalized)
            .ok_or_else(|| anyhow!("unknown profession: {s}"))
    }
}

/// A single row of `people.csv`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Person {
    /// Name.
    #[serde(rename = "Name")]
    pub name: String,
    /// Profession category.
    #[serde(rename = "Category")]
    pub category: Profession,
    /// Associated movie codes.
    #[serde(rename = "tconst", deserialize_with = "deserialize_codes")]
    pub movies: Vec<u32>,
}

/// Loads `people.csv`.
pub(crate) fn load_people(path: &Path) -> Result<Vec<Person>> {
    read_csv(path)
}

/// Default selections used when a single category is in view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DefaultPeople {
    /// Default director.
    pub director: String,
    /// Default actor.
    pub actor: String,
    /// Default actress.
    pub actress: String,
}

impl Default for DefaultPeople {
    fn default() -> Self {
        Self {
            director: String::from("Christopher Nolan"),
            actor: String::from("Tom Hanks"),
            actress: String::from("Meryl Streep"),
        }
    }
}

/// A person row paired with its display label.
#[derive(Debug, Clone)]
pub struct ViewEntry<'a> {
    /// Display label: `"Name"` or `"Name - Category"`.
    pub label: String,
    /// The underlying person row.
    pub person: &'a Person,
}

/// People restricted to a set of categories, with display labels.
///
/// Labels are computed once per category set; build a new view whenever
/// the categories change.
#[derive(Debug, Clone)]
#[allow(clippy::module_name_repetitions)]
pub struct PeopleView<'a> {
    /// Categories in view.
    categories: BTreeSet<Profession>,
    /// Person rows in dataset order.
    entries: Vec<ViewEntry<'a>>,
}

impl<'a> PeopleView<'a> {
    /// Builds the view for `categories`.
    ///
    /// With more than one category selected, a name that occurs under more
    /// than one of them is labeled `"Name - Category"`.
    #[must_use]
    pub fn new(people: &'a [Person], categories: &BTreeSet<Profession>) -> Self {
        let subset: Vec<&'a Person> = people
            .iter()
            .filter(|p| categories.contains(&p.category))
            .collect();

        let mut categories_by_name: HashMap<&str, HashSet<Profession>> = HashMap::new();
        if categories.len() > 1 {
            for &person in &subset {
                categories_by_name
                    .entry(person.name.as_str())
                    .or_default()
                    .insert(person.category);
            }
        }

        let entries = subset
            .into_iter()
            .map(|person| {
                let ambiguous = categories_by_name
                    .get(person.name.as_str())
                    .is_some_and(|c| c.len() > 1);
                let label = if ambiguous {
                    format!("{} - {}", person.name, person.category.label())
                } else {
                    person.name.clone()
                };
                ViewEntry { label, person }
            })
            .collect();

        Self {
            categories: categories.clone(),
            entries,
        }
    }

    /// Categories in view.
    #[must_use]
    pub const fn categories(&self) -> &BTreeSet<Profession> {
        &self.categories
    }

    /// Person rows with their labels, in dataset order.
    #[must_use]
    pub fn entries(&self) -> &[ViewEntry<'a>] {
        &self.entries
    }

    /// Selectable labels in dataset order, without repeats.
    #[must_use]
    pub fn choices(&self) -> Vec<&str> {
        let mut seen = HashSet::new();
        self.entries
            .iter()
            .map(|e| e.label.as_str())
            .filter(|label| seen.insert(*label))
            .collect()
    }

    /// Initial selection for this category set.
    ///
    /// Exactly {director}, {actor} or {actress} selects the configured
    /// default; any other set selects the choices at positions 1 and 2.
    /// Defaults absent from the choices are dropped.
    #[must_use]
    pub fn default_selection(&self, defaults: &DefaultPeople) -> Vec<String> {
        let choices = self.choices();

        let single = if self.categories.len() == 1 {
            self.categories.first().copied()
        } else {
            None
        };
        let preferred = match single {
            Some(Profession::Director) => Some(&defaults.director),
            Some(Profession::Actor) => Some(&defaults.actor),
            Some(Profession::Actress) => Some(&defaults.actress),
            _ => None,
        };

        match preferred {
            Some(name) => choices
                .into_iter()
                .filter(|c| *c == name.as_str())
                .map(String::from)
                .collect(),
            None => choices.into_iter().skip(1).take(2).map(String::from).collect(),
        }
    }
}

/// A movie reached through a selected person.
#[derive(Debug, Clone, PartialEq)]
pub struct PersonMovie<'a> {
    /// Display label of the person.
    pub label: String,
    /// Profession under which the person is linked.
    pub category: Profession,
    /// The movie.
    pub movie: &'a Movie,
}

/// Movies of the selected people within a year range.
///
/// Each selected person row contributes one row per listed movie code;
/// codes missing from the movie table are dropped. Results are in
/// canonical order, then by label.
#[must_use]
pub fn filter_by_people<'d>(
    dataset: &'d Dataset,
    view: &PeopleView<'_>,
    selected: &BTreeSet<String>,
    years: Bounds<u16>,
) -> Vec<PersonMovie<'d>> {
    let mut rows: Vec<PersonMovie<'d>> = view
        .entries()
        .iter()
        .filter(|entry| selected.contains(&entry.label))
        .flat_map(|entry| {
            entry.person.movies.iter().filter_map(move |code| {
                let Some(movie) = dataset.movie(*code) else {
                    tracing::debug!(code, name = %entry.person.name, "Dropping unknown movie code");
                    return None;
                };
                Some(PersonMovie {
                    label: entry.label.clone(),
                    category: entry.person.category,
                    movie,
                })
            })
        })
        .filter(|row| years.contains(row.movie.year))
        .collect();

    rows.sort_by(|a, b| canonical_cmp(a.movie, b.movie).then_with(|| a.label.cmp(&b.label)));
    rows
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::indexing_slicing)]

    use super::*;
    use crate::dataset::test_support::sample_dataset;

    fn person(name: &str, category: Profession, movies: &[u32]) -> Person {
        Person {
            name: String::from(name),
            category,
            movies: movies.to_vec(),
        }
    }

    fn categories(list: &[Profession]) -> BTreeSet<Profession> {
        list.iter().copied().collect()
    }

    #[test]
    fn test_profession_from_str() {
        // Arrange & Act & Assert
        assert_eq!("director".parse::<Profession>().unwrap(), Profession::Director);
        assert_eq!(
            "Production Designer".parse::<Profession>().unwrap(),
            Profession::ProductionDesigner
        );
        assert_eq!("self".parse::<Profession>().unwrap(), Profession::SelfAppearance);
        assert!("gaffer".parse::<Profession>().is_err());
    }

    #[test]
    fn test_disambiguates_names_across_categories() {
        // Arrange
        let people = vec![
            person("Jane Doe", Profession::Director, &[1]),
            person("Jane Doe", Profession::Actor, &[2]),
            person("John Smith", Profession::Actor, &[3]),
        ];

        // Act
        let view = PeopleView::new(
            &people,
            &categories(&[Profession::Director, Profession::Actor]),
        );

        // Assert
        assert_eq!(
            view.choices(),
            vec!["Jane Doe - Director", "Jane Doe - Actor", "John Smith"]
        );
    }

    #[test]
    fn test_single_category_uses_plain_names() {
        // Arrange
        let people = vec![
            person("Jane Doe", Profession::Director, &[1]),
            person("Jane Doe", Profession::Actor, &[2]),
        ];

        // Act
        let view = PeopleView::new(&people, &categories(&[Profession::Director]));

        // Assert
        assert_eq!(view.choices(), vec!["Jane Doe"]);
        assert_eq!(view.entries().len(), 1);
    }

    #[test]
    fn test_labels_recomputed_when_categories_change() {
        // Arrange
        let people = vec![
            person("Jane Doe", Profession::Director, &[1]),
            person("Jane Doe", Profession::Writer, &[2]),
            person("Jane Doe", Profession::Actor, &[3]),
        ];

        // Act
        let narrow = PeopleView::new(
            &people,
            &categories(&[Profession::Director, Profession::Actor]),
        );
        let wide = PeopleView::new(
            &people,
            &categories(&[Profession::Director, Profession::Composer]),
        );

        // Assert
        assert_eq!(narrow.choices().len(), 2);
        assert_eq!(wide.choices(), vec!["Jane Doe"]);
    }

    #[test]
    fn test_default_selection_single_categories() {
        // Arrange
        let people = vec![
            person("Someone Else", Profession::Director, &[]),
            person("Christopher Nolan", Profession::Director, &[]),
            person("Tom Hanks", Profession::Actor, &[]),
            person("Meryl Streep", Profession::Actress, &[]),
        ];
        let defaults = DefaultPeople::default();

        // Act
        let director = PeopleView::new(&people, &categories(&[Profession::Director]));
        let actor = PeopleView::new(&people, &categories(&[Profession::Actor]));
        let actress = PeopleView::new(&people, &categories(&[Profession::Actress]));

        // Assert
        assert_eq!(director.default_selection(&defaults), vec!["Christopher Nolan"]);
        assert_eq!(actor.default_selection(&defaults), vec!["Tom Hanks"]);
        assert_eq!(actress.default_selection(&defaults), vec!["Meryl Streep"]);
    }

    #[test]
    fn test_default_selection_other_sets_take_positions_one_and_two() {
        // Arrange
        let people = vec![
            person("A", Profession::Writer, &[]),
            person("B", Profession::Writer, &[]),
            person("C", Profession::Editor, &[]),
            person("D", Profession::Editor, &[]),
        ];

        // Act
        let view = PeopleView::new(
            &people,
            &categories(&[Profession::Writer, Profession::Editor]),
        );

        // Assert
        assert_eq!(
            view.default_selection(&DefaultPeople::default()),
            vec!["B", "C"]
        );
    }

    #[test]
    fn test_default_selection_missing_default_is_dropped() {
        // Arrange
        let people = vec![person("Somebody", Profession::Director, &[])];

        // Act
        let view = PeopleView::new(&people, &categories(&[Profession::Director]));

        // Assert
        assert!(view.default_selection(&DefaultPeople::default()).is_empty());
    }

    #[test]
    fn test_filter_by_people_flattens_and_orders() {
        // Arrange
        let dataset = sample_dataset();
        let view = PeopleView::new(dataset.people(), &categories(&[Profession::Director]));
        let selected = BTreeSet::from([String::from("Christopher Nolan")]);

        // Act
        let rows = filter_by_people(&dataset, &view, &selected, Bounds::unbounded());

        // Assert
        let titles: Vec<&str> = rows.iter().map(|r| r.movie.title.as_str()).collect();
        assert_eq!(titles, vec!["Inception", "Interstellar", "Memento"]);
        assert!(rows.iter().all(|r| r.label == "Christopher Nolan"));
    }

    #[test]
    fn test_filter_by_people_applies_year_range() {
        // Arrange
        let dataset = sample_dataset();
        let view = PeopleView::new(dataset.people(), &categories(&[Profession::Director]));
        let selected = BTreeSet::from([String::from("Christopher Nolan")]);

        // Act
        let rows = filter_by_people(&dataset, &view, &selected, Bounds::new(2005, 2012));

        // Assert
        let titles: Vec<&str> = rows.iter().map(|r| r.movie.title.as_str()).collect();
        assert_eq!(titles, vec!["Inception"]);
    }

    #[test]
    fn test_filter_by_people_drops_unknown_codes() {
        // Arrange
        let dataset = sample_dataset();
        let view = PeopleView::new(dataset.people(), &categories(&[Profession::Actor]));
        let selected = BTreeSet::from([String::from("Tom Hanks")]);

        // Act
        let rows = filter_by_people(&dataset, &view, &selected, Bounds::unbounded());

        // Assert: Tom Hanks lists code 99, which is not in the movie table
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].movie.title, "Cast Away");
    }

    #[test]
    fn test_filter_by_people_disambiguated_rows() {
        // Arrange
        let dataset = sample_dataset();
        let view = PeopleView::new(
            dataset.people(),
            &categories(&[Profession::Director, Profession::Writer]),
        );
        let selected = BTreeSet::from([String::from("Christopher Nolan - Writer")]);

        // Act
        let rows = filter_by_people(&dataset, &view, &selected, Bounds::unbounded());

        // Assert
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].category, Profession::Writer);
        assert_eq!(rows[0].movie.title, "Memento");
    }
}
