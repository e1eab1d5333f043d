//! OMDb API client module.
//!
//! Fetches a movie record by IMDb id and normalizes it into a fixed set of
//! display fields.

mod api;
mod client;
mod metadata;

#[allow(clippy::module_name_repetitions)]
pub use api::{LocalOmdbApi, OmdbApi};
#[allow(clippy::module_name_repetitions)]
pub use client::{OmdbClient, OmdbClientBuilder};
pub use metadata::{MetadataField, MovieMetadata, NOT_AVAILABLE, fetch_metadata};
