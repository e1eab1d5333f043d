//! JustWatch API client module.
//!
//! Searches the JustWatch catalog by title, fetches the catalog entry of
//! the best hit and normalizes its streaming offers into a table.

mod api;
mod client;
mod country;
mod offers;
mod types;

#[allow(clippy::module_name_repetitions)]
pub use api::{JustWatchApi, LocalJustWatchApi};
#[allow(clippy::module_name_repetitions)]
pub use client::{JustWatchClient, JustWatchClientBuilder};
pub use country::Country;
pub use offers::{OfferRow, OfferTable, fetch_offers, no_data_message};
pub use types::{OfferUrls, RawOffer, SearchHit};
