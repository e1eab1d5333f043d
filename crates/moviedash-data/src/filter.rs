//! Criteria-based movie filtering and the canonical result order.

use std::cmp::Ordering;
use std::collections::BTreeSet;

use anyhow::{Result, bail};
use tracing::instrument;

use crate::dataset::Dataset;
use crate::movies::Movie;

/// Inclusive range with optional ends.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds<T> {
    /// Lower bound (inclusive).
    pub min: Option<T>,
    /// Upper bound (inclusive).
    pub max: Option<T>,
}

impl<T: PartialOrd + Copy> Bounds<T> {
    /// Range `[min, max]`.
    #[must_use]
    pub const fn new(min: T, max: T) -> Self {
        Self {
            min: Some(min),
            max: Some(max),
        }
    }

    /// Range with no ends.
    #[must_use]
    pub const fn unbounded() -> Self {
        Self {
            min: None,
            max: None,
        }
    }

    /// Range `[min, inf)`.
    #[must_use]
    pub const fn at_least(min: T) -> Self {
        Self {
            min: Some(min),
            max: None,
        }
    }

    /// Returns `true` if `value` lies within both ends.
    #[must_use]
    pub fn contains(&self, value: T) -> bool {
        self.min.is_none_or(|min| value >= min) && self.max.is_none_or(|max| value <= max)
    }
}

impl<T: PartialOrd + Copy> Default for Bounds<T> {
    fn default() -> Self {
        Self::unbounded()
    }
}

/// Conjunction of range and genre conditions.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MovieCriteria {
    /// Release year range.
    pub year: Bounds<u16>,
    /// Rating range.
    pub rating: Bounds<f64>,
    /// Vote count range.
    pub votes: Bounds<u64>,
    /// Runtime range in minutes. A movie with no runtime only passes an
    /// unbounded range.
    pub runtime: Bounds<u32>,
    /// Genres the movie must all be tagged with.
    pub genres: BTreeSet<String>,
}

impl MovieCriteria {
    /// Returns `true` if `movie` satisfies every range condition.
    fn ranges_match(&self, movie: &Movie) -> bool {
        let runtime_ok = match movie.runtime {
            Some(minutes) => self.runtime.contains(minutes),
            None => self.runtime.min.is_none() && self.runtime.max.is_none(),
        };
        self.year.contains(movie.year)
            && self.rating.contains(movie.rating)
            && self.votes.contains(movie.votes)
            && runtime_ok
    }
}

/// Orders movies by rating desc, then title desc, then code asc.
pub(crate) fn canonical_cmp(a: &Movie, b: &Movie) -> Ordering {
    b.rating
        .total_cmp(&a.rating)
        .then_with(|| b.title.cmp(&a.title))
        .then_with(|| a.code.cmp(&b.code))
}

/// Movies satisfying all of `criteria`, in canonical order.
///
/// # Errors
///
/// Returns an error if `criteria.genres` names a genre the dataset does
/// not have.
#[instrument(skip_all)]
pub fn filter_movies<'d>(dataset: &'d Dataset, criteria: &MovieCriteria) -> Result<Vec<&'d Movie>> {
    if let Some(unknown) = criteria
        .genres
        .iter()
        .find(|g| !dataset.genres().contains_genre(g))
    {
        bail!(
            "unknown genre {unknown:?}; available: {}",
            dataset.genre_options().join(", ")
        );
    }

    let mut matched: Vec<&Movie> = dataset
        .movies()
        .iter()
        .filter(|movie| criteria.ranges_match(movie))
        .filter(|movie| {
            dataset
                .genres()
                .row(movie.genres_label)
                .is_some_and(|row| row.has_all(&criteria.genres))
        })
        .collect();

    matched.sort_by(|a, b| canonical_cmp(a, b));
    tracing::debug!(matched = matched.len(), "Filtered movies");
    Ok(matched)
}

/// Movies listed as similar to `code`, in canonical order.
///
/// Unknown codes (including `code` itself) yield nothing.
#[must_use]
pub fn similar_movies(dataset: &Dataset, code: u32) -> Vec<&Movie> {
    let Some(movie) = dataset.movie(code) else {
        return Vec::new();
    };
    let mut similar: Vec<&Movie> = movie
        .similar
        .iter()
        .filter_map(|c| dataset.movie(*c))
        .collect();
    similar.sort_by(|a, b| canonical_cmp(a, b));
    similar
}
