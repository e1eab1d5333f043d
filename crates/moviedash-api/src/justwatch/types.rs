//! JustWatch API response types.

use serde::Deserialize;

/// Response of the popular-titles search.
#[derive(Debug, Clone, Deserialize)]
pub(super) struct SearchResponse {
    /// Ranked hits.
    #[serde(default)]
    pub items: Vec<SearchHit>,
}

/// A single search hit.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SearchHit {
    /// Catalog id.
    pub id: u64,
    /// Title as listed in the catalog.
    pub title: String,
}

/// Offer as found in a catalog entry's `offers` array.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RawOffer {
    /// Provider id.
    pub provider_id: u64,
    /// Commercial model (`flatrate`, `rent`, `buy`, ...).
    pub monetization_type: String,
    /// Quality tier (`sd`, `hd`, `4k`, ...).
    pub presentation_type: String,
    /// Provider URLs.
    pub urls: OfferUrls,
}

/// Provider URLs of an offer.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct OfferUrls {
    /// Link to the movie on the provider's site.
    pub standard_web: String,
}
