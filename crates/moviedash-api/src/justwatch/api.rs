//! `JustWatchApi` trait definition.
#![allow(clippy::future_not_send)]

use anyhow::Result;

use super::types::SearchHit;

/// JustWatch API trait.
///
/// Abstracts API operations for mock substitution in tests.
/// Uses `trait_variant::make` to generate a `Send`-bound async trait.
#[allow(clippy::module_name_repetitions)]
#[trait_variant::make(JustWatchApi: Send)]
pub trait LocalJustWatchApi {
    /// Searches movies by title; hits are ranked by relevance.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP request or JSON parsing fails.
    async fn search_titles(&self, query: &str, locale: &str) -> Result<Vec<SearchHit>>;

    /// Fetches the catalog entry of a movie.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP request or JSON parsing fails.
    async fn title_details(&self, id: u64, locale: &str) -> Result<serde_json::Value>;
}
