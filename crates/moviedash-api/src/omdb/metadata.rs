//! Normalization of OMDb records into display fields.

use std::collections::{BTreeMap, HashMap};
use std::fmt;

use anyhow::{Context, Result};
use serde_json::Value;
use tracing::instrument;

use super::api::LocalOmdbApi;

/// Placeholder for a field the record does not carry.
pub const NOT_AVAILABLE: &str = "N/A";

/// Display fields extracted from an OMDb record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum MetadataField {
    /// IMDb rating (`Ratings` source "Internet Movie Database").
    ImdbRating,
    /// Rotten Tomatoes score.
    RottenTomatoes,
    /// Metacritic score.
    Metacritic,
    /// Box office gross.
    BoxOffice,
    /// Plot summary.
    Plot,
    /// Main actors.
    Actors,
    /// Awards summary.
    Awards,
    /// Writers.
    Writer,
    /// Directors.
    Director,
    /// Poster image URL.
    Poster,
}

impl MetadataField {
    /// Every field, in display order.
    pub const ALL: [Self; 10] = [
        Self::ImdbRating,
        Self::RottenTomatoes,
        Self::Metacritic,
        Self::BoxOffice,
        Self::Plot,
        Self::Actors,
        Self::Awards,
        Self::Director,
        Self::Writer,
        Self::Poster,
    ];

    /// Key of the field in the flattened record.
    ///
    /// Ratings are keyed by their `Source`; everything else by the
    /// top-level OMDb key.
    #[must_use]
    pub const fn source_key(self) -> &'static str {
        match self {
            Self::ImdbRating => "Internet Movie Database",
            Self::RottenTomatoes => "Rotten Tomatoes",
            Self::Metacritic => "Metacritic",
            Self::BoxOffice => "BoxOffice",
            Self::Plot => "Plot",
            Self::Actors => "Actors",
            Self::Awards => "Awards",
            Self::Writer => "Writer",
            Self::Director => "Director",
            Self::Poster => "Poster",
        }
    }

    /// Heading shown next to the value.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::ImdbRating => "IMDb",
            Self::RottenTomatoes => "Rotten Tomatoes",
            Self::Metacritic => "Metacritic",
            Self::BoxOffice => "Box Office",
            Self::Plot => "Plot",
            Self::Actors => "Main Actors",
            Self::Awards => "Awards",
            Self::Writer => "Writer(s)",
            Self::Director => "Director(s)",
            Self::Poster => "Poster",
        }
    }
}

impl fmt::Display for MetadataField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Normalized metadata record: every [`MetadataField`] has a value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MovieMetadata {
    /// One entry per field.
    values: BTreeMap<MetadataField, String>,
}

impl MovieMetadata {
    /// Record with every field set to [`NOT_AVAILABLE`].
    #[must_use]
    pub fn unavailable() -> Self {
        Self::from_flat(&HashMap::new())
    }

    /// Normalizes a raw OMDb record.
    ///
    /// Top-level scalars and the pivoted `Ratings` array are merged into one
    /// flat row; each field is then read from its source key or defaulted.
    #[must_use]
    pub fn from_record(record: &Value) -> Self {
        Self::from_flat(&flatten_record(record))
    }

    /// Picks every schema field out of a flattened record.
    fn from_flat(flat: &HashMap<String, String>) -> Self {
        let values = MetadataField::ALL
            .into_iter()
            .map(|field| {
                let value = flat
                    .get(field.source_key())
                    .cloned()
                    .unwrap_or_else(|| String::from(NOT_AVAILABLE));
                (field, value)
            })
            .collect();
        Self { values }
    }

    /// Value of `field`.
    #[must_use]
    pub fn get(&self, field: MetadataField) -> &str {
        self.values.get(&field).map_or(NOT_AVAILABLE, String::as_str)
    }

    /// Fields and values in display order.
    pub fn iter(&self) -> impl Iterator<Item = (MetadataField, &str)> {
        MetadataField::ALL
            .into_iter()
            .map(|field| (field, self.get(field)))
    }
}

/// Flattens an OMDb record into `key -> text`.
///
/// `Ratings` entries become `Source -> Value`; other arrays and objects
/// are skipped.
fn flatten_record(record: &Value) -> HashMap<String, String> {
    let mut flat = HashMap::new();
    let Some(object) = record.as_object() else {
        return flat;
    };

    if let Some(ratings) = object.get("Ratings").and_then(Value::as_array) {
        for rating in ratings {
            let source = rating.get("Source").and_then(Value::as_str);
            let value = rating.get("Value").and_then(Value::as_str);
            if let (Some(source), Some(value)) = (source, value) {
                flat.insert(String::from(source), String::from(value));
            }
        }
    }

    for (key, value) in object {
        let text = match value {
            Value::String(s) => s.clone(),
            Value::Number(n) => n.to_string(),
            Value::Bool(b) => b.to_string(),
            Value::Null | Value::Array(_) | Value::Object(_) => continue,
        };
        flat.insert(key.clone(), text);
    }

    flat
}

/// Fetches and normalizes the metadata of one movie.
///
/// # Errors
///
/// Returns an error if the API call fails. Callers show
/// [`MovieMetadata::unavailable`] instead.
#[instrument(skip_all, fields(public_id = %public_id))]
pub async fn fetch_metadata(
    api: &(impl LocalOmdbApi + Sync),
    public_id: &str,
) -> Result<MovieMetadata> {
    let record = api
        .movie_by_id(public_id)
        .await
        .with_context(|| format!("failed to fetch OMDb metadata for {public_id}"))?;
    Ok(MovieMetadata::from_record(&record))
}
