//! `OmdbApi` trait definition.
#![allow(clippy::future_not_send)]

use anyhow::Result;

/// OMDb API trait.
///
/// Abstracts API operations for mock substitution in tests.
/// Uses `trait_variant::make` to generate a `Send`-bound async trait.
#[allow(clippy::module_name_repetitions)]
#[trait_variant::make(OmdbApi: Send)]
pub trait LocalOmdbApi {
    /// Fetches the raw record of a movie by IMDb id.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP request fails, times out, returns a
    /// non-success status, or the body reports `"Response": "False"`.
    async fn movie_by_id(&self, public_id: &str) -> Result<serde_json::Value>;
}
