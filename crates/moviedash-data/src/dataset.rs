//! In-memory dataset loaded from the data directory.

use std::collections::HashMap;
use std::path::Path;

use anyhow::{Context, Result, bail};
use chrono::NaiveDate;
use tracing::instrument;

use crate::encoder::TconstEncoder;
use crate::filter::canonical_cmp;
use crate::genres::GenreTable;
use crate::movies::{Movie, load_movies};
use crate::people::{Person, load_people};

/// Movie table file name.
pub const MOVIES_FILE: &str = "movies.csv";
/// People table file name.
pub const PEOPLE_FILE: &str = "people.csv";
/// Genre membership table file name.
pub const GENRES_FILE: &str = "genres.csv";
/// Fitted identifier encoder file name.
pub const ENCODER_FILE: &str = "label_encoder_tconst.json";
/// "Last updated" marker file name.
pub const DATE_UPDATE_FILE: &str = "date_update.txt";

/// Read-only movie dataset.
#[derive(Debug, Clone)]
pub struct Dataset {
    /// Movies in file order.
    movies: Vec<Movie>,
    /// Index into `movies` by internal code.
    by_code: HashMap<u32, usize>,
    /// Genre membership.
    genres: GenreTable,
    /// People rows in file order.
    people: Vec<Person>,
    /// Internal code to IMDb id mapping.
    encoder: TconstEncoder,
    /// Date the tables were built.
    last_updated: NaiveDate,
}

impl Dataset {
    /// Loads all tables from `dir`.
    ///
    /// # Errors
    ///
    /// Returns an error if any file is missing or malformed, or the tables
    /// are inconsistent (see [`Dataset::from_parts`]).
    #[instrument(skip_all, fields(dir = %dir.display()))]
    pub fn load(dir: &Path) -> Result<Self> {
        let movies = load_movies(&dir.join(MOVIES_FILE)).context("failed to load movies")?;
        let genres =
            GenreTable::load(&dir.join(GENRES_FILE)).context("failed to load genre table")?;
        let people = load_people(&dir.join(PEOPLE_FILE)).context("failed to load people")?;
        let encoder = TconstEncoder::load(&dir.join(ENCODER_FILE))
            .context("failed to load identifier encoder")?;
        let last_updated = load_date_update(&dir.join(DATE_UPDATE_FILE))?;

        let dataset = Self::from_parts(movies, genres, people, encoder, last_updated)?;

        tracing::info!(
            movies = dataset.movies.len(),
            people = dataset.people.len(),
            genre_combinations = dataset.genres.len(),
            last_updated = %dataset.last_updated,
            "Dataset loaded"
        );

        Ok(dataset)
    }

    /// Assembles a dataset from parsed tables.
    ///
    /// # Errors
    ///
    /// Returns an error if two movies share a code or a movie's genre label
    /// has no row in the genre table.
    pub fn from_parts(
        movies: Vec<Movie>,
        genres: GenreTable,
        people: Vec<Person>,
        encoder: TconstEncoder,
        last_updated: NaiveDate,
    ) -> Result<Self> {
        let mut by_code = HashMap::with_capacity(movies.len());
        for (idx, movie) in movies.iter().enumerate() {
            if genres.row(movie.genres_label).is_none() {
                bail!(
                    "movie {} ({}) has genre label {} with no genre row",
                    movie.code,
                    movie.title,
                    movie.genres_label
                );
            }
            if by_code.insert(movie.code, idx).is_some() {
                bail!("duplicate movie code {}", movie.code);
            }
        }

        Ok(Self {
            movies,
            by_code,
            genres,
            people,
            encoder,
            last_updated,
        })
    }

    /// All movies in file order.
    #[must_use]
    pub fn movies(&self) -> &[Movie] {
        &self.movies
    }

    /// All people rows in file order.
    #[must_use]
    pub fn people(&self) -> &[Person] {
        &self.people
    }

    /// Genre membership table.
    #[must_use]
    pub const fn genres(&self) -> &GenreTable {
        &self.genres
    }

    /// Sorted genre names.
    #[must_use]
    pub fn genre_options(&self) -> &[String] {
        self.genres.genres()
    }

    /// Identifier encoder.
    #[must_use]
    pub const fn encoder(&self) -> &TconstEncoder {
        &self.encoder
    }

    /// Date the tables were built.
    #[must_use]
    pub const fn last_updated(&self) -> NaiveDate {
        self.last_updated
    }

    /// Looks up a movie by internal code.
    #[must_use]
    pub fn movie(&self, code: u32) -> Option<&Movie> {
        self.by_code
            .get(&code)
            .and_then(|idx| self.movies.get(*idx))
    }

    /// All movies with exactly this title, in canonical order.
    #[must_use]
    pub fn find_by_title(&self, title: &str) -> Vec<&Movie> {
        let mut found: Vec<&Movie> = self.movies.iter().filter(|m| m.title == title).collect();
        found.sort_by(|a, b| canonical_cmp(a, b));
        found
    }

    /// Decodes a movie code to its IMDb id.
    ///
    /// # Errors
    ///
    /// Returns an error if the code lies outside the encoder domain.
    pub fn resolve_public_id(&self, code: u32) -> Result<&str> {
        self.encoder.inverse_transform(code)
    }
}

/// Reads the `YYYY-MM-DD` marker in `date_update.txt`.
fn load_date_update(path: &Path) -> Result<NaiveDate> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    NaiveDate::parse_from_str(content.trim(), "%Y-%m-%d")
        .with_context(|| format!("invalid date in {}: {:?}", path.display(), content.trim()))
}
