//! Movie table rows.

use std::path::Path;

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};

/// A single movie from `movies.csv`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Movie {
    /// Internal movie code (decoded to an IMDb id through the encoder).
    #[serde(rename = "tconst")]
    pub code: u32,
    /// Title.
    #[serde(rename = "Title")]
    pub title: String,
    /// IMDb average rating.
    #[serde(rename = "Rating")]
    pub rating: f64,
    /// IMDb vote count.
    #[serde(rename = "Votes")]
    pub votes: u64,
    /// Runtime in minutes (nullable).
    #[serde(rename = "Runtime")]
    pub runtime: Option<u32>,
    /// Release year.
    #[serde(rename = "Year")]
    pub year: u16,
    /// Genre-combination code, see `GenreTable`.
    pub genres_label: u32,
    /// Display string of the genre combination (e.g. "crime,drama").
    #[serde(rename = "Genres")]
    pub genres: String,
    /// Codes of similar movies (may be empty).
    #[serde(rename = "similar_tconsts", deserialize_with = "deserialize_codes")]
    pub similar: Vec<u32>,
}

/// Loads `movies.csv`.
///
/// # Errors
///
/// Returns an error if the file cannot be opened or a row fails to parse.
pub(crate) fn load_movies(path: &Path) -> Result<Vec<Movie>> {
    read_csv(path)
}

/// Reads every row of a CSV file with a header line.
pub(crate) fn read_csv<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
    let mut reader = csv::Reader::from_path(path)
        .with_context(|| format!("failed to open {}", path.display()))?;

    reader
        .deserialize()
        .enumerate()
        .map(|(i, row)| {
            row.with_context(|| {
                format!("failed to parse row {} of {}", i.saturating_add(1), path.display())
            })
        })
        .collect()
}

/// Deserializes a space-separated list of movie codes (`"12 7 31"`).
pub(crate) fn deserialize_codes<'de, D>(deserializer: D) -> std::result::Result<Vec<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    raw.unwrap_or_default()
        .split_whitespace()
        .map(|s| {
            s.parse::<u32>()
                .map_err(|e| serde::de::Error::custom(format!("invalid movie code {s:?}: {e}")))
        })
        .collect()
}
