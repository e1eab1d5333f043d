//! Normalization of JustWatch offers into a provider table.

use std::collections::HashMap;

use anyhow::{Context, Result};
use tracing::instrument;
use url::Url;

use super::api::LocalJustWatchApi;
use super::country::Country;
use super::types::RawOffer;

/// Host suffixes dropped from provider names.
const HOST_SUFFIXES: [&str; 3] = [".com", ".net", ".tv"];

/// One provider offering the movie under one monetization type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OfferRow {
    /// Provider id.
    pub provider_id: u64,
    /// Provider name derived from the offer URL host.
    pub provider: String,
    /// Commercial model.
    pub monetization_type: String,
    /// Quality tiers joined with `/` in first-seen order.
    pub quality_options: String,
}

/// Offers for one movie in one country.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OfferTable {
    /// Title the lookup was made for.
    pub title: String,
    /// Country of the catalog.
    pub country: Country,
    /// Rows, sorted descending by (monetization type, provider).
    rows: Vec<OfferRow>,
}

impl OfferTable {
    /// Builds the table from a catalog entry's raw offers.
    ///
    /// Offers are grouped by (provider id, monetization type); within a
    /// group the presentation types are merged. Rows that render the same
    /// are kept once.
    #[must_use]
    pub fn from_offers(title: &str, country: Country, offers: &[RawOffer]) -> Self {
        let mut groups: Vec<(OfferRow, Vec<&str>)> = Vec::new();
        let mut index: HashMap<(u64, &str), usize> = HashMap::new();

        for offer in offers {
            let key = (offer.provider_id, offer.monetization_type.as_str());
            let slot = *index.entry(key).or_insert_with(|| {
                groups.push((
                    OfferRow {
                        provider_id: offer.provider_id,
                        provider: provider_name(&offer.urls.standard_web),
                        monetization_type: offer.monetization_type.clone(),
                        quality_options: String::new(),
                    },
                    Vec::new(),
                ));
                groups.len().saturating_sub(1)
            });
            if let Some((_, qualities)) = groups.get_mut(slot) {
                let presentation = offer.presentation_type.as_str();
                if !qualities.contains(&presentation) {
                    qualities.push(presentation);
                }
            }
        }

        let mut rows: Vec<OfferRow> = Vec::with_capacity(groups.len());
        for (mut row, qualities) in groups {
            row.quality_options = qualities.join("/");
            let duplicate = rows.iter().any(|r| {
                r.provider == row.provider
                    && r.monetization_type == row.monetization_type
                    && r.quality_options == row.quality_options
            });
            if !duplicate {
                rows.push(row);
            }
        }

        rows.sort_by(|a, b| {
            (b.monetization_type.as_str(), b.provider.as_str())
                .cmp(&(a.monetization_type.as_str(), a.provider.as_str()))
        });

        Self {
            title: String::from(title),
            country,
            rows,
        }
    }

    /// Rows in display order.
    #[must_use]
    pub fn rows(&self) -> &[OfferRow] {
        &self.rows
    }

    /// Returns `true` if the catalog entry listed no offers.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Narrow layout: one line per attribute, one column per offer.
    #[must_use]
    pub fn transposed(&self) -> [(&'static str, Vec<&str>); 3] {
        [
            (
                "provider",
                self.rows.iter().map(|r| r.provider.as_str()).collect(),
            ),
            (
                "monetization type",
                self.rows.iter().map(|r| r.monetization_type.as_str()).collect(),
            ),
            (
                "quality options",
                self.rows.iter().map(|r| r.quality_options.as_str()).collect(),
            ),
        ]
    }
}

/// Provider name from an offer URL: the host without `www.` and without a
/// trailing `.com`, `.net` or `.tv`.
fn provider_name(standard_web: &str) -> String {
    let host = Url::parse(standard_web)
        .ok()
        .and_then(|url| url.host_str().map(String::from))
        .unwrap_or_else(|| String::from(standard_web));
    let host = host.strip_prefix("www.").unwrap_or(&host);
    HOST_SUFFIXES
        .iter()
        .find_map(|suffix| host.strip_suffix(suffix))
        .unwrap_or(host)
        .to_owned()
}

/// Message shown in place of the offer table when the lookup fails.
#[must_use]
pub fn no_data_message(title: &str, country: Country) -> String {
    format!("No data could be obtained through the JustWatch API for {title} in {country}")
}

/// Looks up the streaming offers of `title` in `country`.
///
/// The first search hit is taken as the movie (best-effort match).
/// Returns `Ok(None)` when the catalog entry carries no `offers` key.
///
/// # Errors
///
/// Returns an error if the search finds nothing, an API call fails, or the
/// offers cannot be decoded.
#[instrument(skip_all, fields(title = %title, country = %country))]
pub async fn fetch_offers(
    api: &(impl LocalJustWatchApi + Sync),
    title: &str,
    country: Country,
) -> Result<Option<OfferTable>> {
    let locale = country.locale();

    let hits = api
        .search_titles(title, locale)
        .await
        .with_context(|| format!("JustWatch search failed for {title}"))?;
    let hit = hits
        .first()
        .with_context(|| format!("JustWatch search returned no results for {title} in {country}"))?;

    if hit.title != title {
        tracing::warn!(
            query = title,
            matched = %hit.title,
            id = hit.id,
            "JustWatch best match differs from the requested title"
        );
    }

    let details = api
        .title_details(hit.id, locale)
        .await
        .with_context(|| format!("failed to fetch JustWatch entry {}", hit.id))?;

    let Some(offers) = details.get("offers").filter(|v| !v.is_null()) else {
        tracing::debug!(id = hit.id, "JustWatch entry has no offers");
        return Ok(None);
    };

    let offers: Vec<RawOffer> = serde_json::from_value(offers.clone())
        .with_context(|| format!("failed to decode offers of JustWatch entry {}", hit.id))?;

    let table = OfferTable::from_offers(title, country, &offers);
    tracing::debug!(rows = table.rows().len(), "Normalized JustWatch offers");
    Ok(Some(table))
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::indexing_slicing)]

    use std::sync::atomic::{AtomicU32, Ordering};

    use anyhow::bail;

    use super::*;
    use crate::justwatch::types::{OfferUrls, SearchHit};

    /// Serves fixed search hits and one catalog entry.
    struct MockJustWatchApi {
        hits: Vec<SearchHit>,
        details: Option<serde_json::Value>,
        detail_calls: AtomicU32,
    }

    impl MockJustWatchApi {
        fn new(hits: Vec<SearchHit>, details: Option<serde_json::Value>) -> Self {
            Self {
                hits,
                details,
                detail_calls: AtomicU32::new(0),
            }
        }
    }

    impl LocalJustWatchApi for MockJustWatchApi {
        async fn search_titles(&self, _query: &str, _locale: &str) -> Result<Vec<SearchHit>> {
            Ok(self.hits.clone())
        }

        async fn title_details(&self, _id: u64, _locale: &str) -> Result<serde_json::Value> {
            self.detail_calls.fetch_add(1, Ordering::SeqCst);
            match &self.details {
                Some(details) => Ok(details.clone()),
                None => bail!("HTTP 500"),
            }
        }
    }

    fn hit(id: u64, title: &str) -> SearchHit {
        SearchHit {
            id,
            title: String::from(title),
        }
    }

    fn offer(provider_id: u64, monetization: &str, presentation: &str, url: &str) -> RawOffer {
        RawOffer {
            provider_id,
            monetization_type: String::from(monetization),
            presentation_type: String::from(presentation),
            urls: OfferUrls {
                standard_web: String::from(url),
            },
        }
    }

    fn fixture(json: &str) -> serde_json::Value {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_provider_name() {
        // Arrange & Act & Assert
        assert_eq!(provider_name("https://www.netflix.com/title/1"), "netflix");
        assert_eq!(provider_name("http://tv.apple.com/us/movie/x"), "tv.apple");
        assert_eq!(provider_name("https://www.hulu.net/watch"), "hulu");
        assert_eq!(provider_name("https://www.pluto.tv/on-demand"), "pluto");
        assert_eq!(provider_name("https://mubi.org/films/x"), "mubi.org");
    }

    #[test]
    fn test_from_offers_groups_and_merges_presentation_types() {
        // Arrange
        let offers = vec![
            offer(8, "flatrate", "hd", "https://www.netflix.com/title/1"),
            offer(8, "flatrate", "sd", "https://www.netflix.com/title/1"),
            offer(8, "flatrate", "hd", "https://www.netflix.com/title/1"),
        ];

        // Act
        let table = OfferTable::from_offers("Inception", Country::Us, &offers);

        // Assert
        assert_eq!(table.rows().len(), 1);
        assert_eq!(table.rows()[0].provider, "netflix");
        assert_eq!(table.rows()[0].quality_options, "hd/sd");
    }

    #[test]
    fn test_from_offers_drops_rows_that_render_the_same() {
        // Arrange: two provider ids resolving to the same host
        let offers = vec![
            offer(2, "buy", "hd", "https://tv.apple.com/a"),
            offer(350, "buy", "hd", "https://tv.apple.com/b"),
        ];

        // Act
        let table = OfferTable::from_offers("Inception", Country::Us, &offers);

        // Assert
        assert_eq!(table.rows().len(), 1);
        assert_eq!(table.rows()[0].provider_id, 2);
    }

    #[tokio::test]
    async fn test_fetch_offers_from_fixture() {
        // Arrange
        let api = MockJustWatchApi::new(
            vec![hit(92_417, "Inception")],
            Some(fixture(include_str!(
                "../../../../fixtures/justwatch/title_92417.json"
            ))),
        );

        // Act
        let table = fetch_offers(&api, "Inception", Country::Us)
            .await
            .unwrap()
            .unwrap();

        // Assert
        let layout: Vec<(&str, &str, &str)> = table
            .rows()
            .iter()
            .map(|r| {
                (
                    r.monetization_type.as_str(),
                    r.provider.as_str(),
                    r.quality_options.as_str(),
                )
            })
            .collect();
        assert_eq!(
            layout,
            vec![
                ("rent", "vudu", "sd"),
                ("rent", "tv.apple", "4k/hd"),
                ("flatrate", "netflix", "hd/sd"),
                ("buy", "tv.apple", "4k"),
                ("buy", "play.google", "hd"),
            ]
        );
        assert_eq!(table.title, "Inception");
        assert_eq!(table.country, Country::Us);
    }

    #[tokio::test]
    async fn test_fetch_offers_transposed_layout() {
        // Arrange
        let api = MockJustWatchApi::new(
            vec![hit(92_417, "Inception")],
            Some(fixture(include_str!(
                "../../../../fixtures/justwatch/title_92417.json"
            ))),
        );

        // Act
        let table = fetch_offers(&api, "Inception", Country::Us)
            .await
            .unwrap()
            .unwrap();
        let transposed = table.transposed();

        // Assert
        assert_eq!(transposed[0].0, "provider");
        assert_eq!(transposed[1].0, "monetization type");
        assert_eq!(transposed[2].0, "quality options");
        assert_eq!(transposed[0].1.len(), 5);
        assert_eq!(transposed[2].1[2], "hd/sd");
    }

    #[tokio::test]
    async fn test_fetch_offers_without_offers_key_is_none() {
        // Arrange
        let api = MockJustWatchApi::new(
            vec![hit(433_125, "Inception: The Cobol Job")],
            Some(fixture(include_str!(
                "../../../../fixtures/justwatch/title_no_offers.json"
            ))),
        );

        // Act
        let result = fetch_offers(&api, "Inception: The Cobol Job", Country::Uk)
            .await
            .unwrap();

        // Assert
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_fetch_offers_takes_first_hit_on_mismatch() {
        // Arrange
        let api = MockJustWatchApi::new(
            vec![hit(92_417, "Inception"), hit(1, "Inception 2")],
            Some(serde_json::json!({ "id": 92_417, "offers": [] })),
        );

        // Act
        let table = fetch_offers(&api, "inception", Country::De)
            .await
            .unwrap()
            .unwrap();

        // Assert
        assert!(table.is_empty());
        assert_eq!(api.detail_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_fetch_offers_empty_search_is_error() {
        // Arrange
        let api = MockJustWatchApi::new(Vec::new(), None);

        // Act
        let result = fetch_offers(&api, "Nothing", Country::Us).await;

        // Assert
        assert!(result.unwrap_err().to_string().contains("no results"));
        assert_eq!(api.detail_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_fetch_offers_detail_failure_is_error() {
        // Arrange
        let api = MockJustWatchApi::new(vec![hit(92_417, "Inception")], None);

        // Act
        let result = fetch_offers(&api, "Inception", Country::Us).await;

        // Assert
        let err = format!("{:#}", result.unwrap_err());
        assert!(err.contains("HTTP 500"));
    }

    #[test]
    fn test_no_data_message() {
        // Arrange & Act
        let message = no_data_message("Heat", Country::Uk);

        // Assert
        assert_eq!(
            message,
            "No data could be obtained through the JustWatch API for Heat in UK"
        );
    }
}
