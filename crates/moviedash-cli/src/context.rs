//! Process-wide state shared by every command.

use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result, bail};
use moviedash_api::justwatch::{
    Country, JustWatchClient, LocalJustWatchApi, OfferTable, fetch_offers, no_data_message,
};
use moviedash_api::links::OutboundLinks;
use moviedash_api::omdb::{LocalOmdbApi, MovieMetadata, OmdbClient, fetch_metadata};
use moviedash_data::{Dataset, DefaultPeople, Movie};
use tracing::instrument;

use crate::config::AppConfig;

/// User-Agent sent to every external service.
const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// Result of an offer lookup as shown to the user.
#[derive(Debug)]
pub enum OfferLookup {
    /// Offers were found.
    Found(OfferTable),
    /// Nothing could be obtained; carries the message to show.
    NoData(String),
}

/// Loaded dataset, API clients and settings. Built once, then read-only.
#[derive(Debug)]
pub struct AppContext {
    dataset: Dataset,
    omdb: Option<OmdbClient>,
    justwatch: JustWatchClient,
    /// Present only when link verification is enabled.
    verify_client: Option<reqwest::Client>,
    country: Country,
    default_people: DefaultPeople,
}

impl AppContext {
    /// Loads the dataset and builds the API clients.
    ///
    /// # Errors
    ///
    /// Returns an error if the dataset fails to load, the configured
    /// country is unsupported, or an HTTP client fails to build.
    #[instrument(skip_all)]
    pub fn build(config: &AppConfig, data_dir: &Path) -> Result<Self> {
        let dataset = Dataset::load(data_dir)
            .with_context(|| format!("failed to load dataset from {}", data_dir.display()))?;

        let country: Country = config
            .offers
            .country
            .parse()
            .context("invalid [offers] country in config")?;
        let timeout = Duration::from_secs(config.http.timeout_secs);

        let omdb = match config.omdb_api_key() {
            Some(key) => Some(
                OmdbClient::builder()
                    .api_key(key)
                    .user_agent(USER_AGENT)
                    .timeout(timeout)
                    .build()
                    .context("failed to build OMDb client")?,
            ),
            None => None,
        };

        let justwatch = JustWatchClient::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()
            .context("failed to build JustWatch client")?;

        let verify_client = if config.links.verify {
            Some(
                reqwest::Client::builder()
                    .user_agent(USER_AGENT)
                    .timeout(timeout)
                    .build()
                    .context("failed to build link verification client")?,
            )
        } else {
            None
        };

        Ok(Self {
            dataset,
            omdb,
            justwatch,
            verify_client,
            country,
            default_people: config.default_people(),
        })
    }

    /// The loaded dataset.
    #[must_use]
    pub const fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    /// Default country for offer lookups.
    #[must_use]
    pub const fn country(&self) -> Country {
        self.country
    }

    /// Default selections for the people view.
    #[must_use]
    pub const fn default_people(&self) -> &DefaultPeople {
        &self.default_people
    }

    /// OMDb metadata for `public_id`, or the all-`N/A` record on failure.
    pub async fn metadata(&self, public_id: &str) -> MovieMetadata {
        metadata_or_unavailable(self.omdb.as_ref(), public_id).await
    }

    /// Streaming offers for `title` in `country`.
    pub async fn offers(&self, title: &str, country: Country) -> OfferLookup {
        lookup_offers(&self.justwatch, title, country).await
    }

    /// Outbound links for `movie`, verified when enabled in the config.
    ///
    /// `country` selects the JustWatch page.
    ///
    /// # Errors
    ///
    /// Returns an error if the movie code has no public identifier.
    pub async fn links(&self, movie: &Movie, country: Country) -> Result<OutboundLinks> {
        let public_id = self.dataset.resolve_public_id(movie.code)?;
        let links = OutboundLinks::new(public_id, &movie.title, country);
        Ok(match &self.verify_client {
            Some(client) => links.verify(client).await,
            None => links,
        })
    }
}

/// Fetches metadata, logging and swallowing any failure.
pub async fn metadata_or_unavailable(
    api: Option<&(impl LocalOmdbApi + Sync)>,
    public_id: &str,
) -> MovieMetadata {
    let Some(api) = api else {
        tracing::warn!("OMDb API key not set (OMDB_API_KEY or [omdb] api_key); metadata unavailable");
        return MovieMetadata::unavailable();
    };
    match fetch_metadata(api, public_id).await {
        Ok(metadata) => metadata,
        Err(e) => {
            tracing::warn!(public_id, error = %format!("{e:#}"), "Metadata unavailable");
            MovieMetadata::unavailable()
        }
    }
}

/// Looks up offers, turning every failure into the no-data message.
pub async fn lookup_offers(
    api: &(impl LocalJustWatchApi + Sync),
    title: &str,
    country: Country,
) -> OfferLookup {
    match fetch_offers(api, title, country).await {
        Ok(Some(table)) if !table.is_empty() => OfferLookup::Found(table),
        Ok(_) => {
            tracing::warn!(title, %country, "JustWatch returned no offers");
            OfferLookup::NoData(no_data_message(title, country))
        }
        Err(e) => {
            tracing::warn!(title, %country, error = %format!("{e:#}"), "Offer lookup failed");
            OfferLookup::NoData(no_data_message(title, country))
        }
    }
}

/// Picks a movie by exact title or by public identifier.
///
/// Several movies sharing a title resolve to the first in canonical order.
///
/// # Errors
///
/// Returns an error if neither or both selectors are given, or nothing
/// matches.
pub fn select_movie<'d>(
    dataset: &'d Dataset,
    title: Option<&str>,
    public_id: Option<&str>,
) -> Result<&'d Movie> {
    match (title, public_id) {
        (Some(title), None) => {
            let matches = dataset.find_by_title(title);
            if matches.len() > 1 {
                tracing::info!(title, count = matches.len(), "Several movies share this title, using the top-rated");
            }
            matches
                .first()
                .copied()
                .with_context(|| format!("no movie titled {title:?}"))
        }
        (None, Some(public_id)) => {
            let code = dataset.encoder().transform(public_id)?;
            dataset
                .movie(code)
                .with_context(|| format!("{public_id} is not in the movie table"))
        }
        _ => bail!("exactly one of --title or --id is required"),
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use anyhow::bail;
    use moviedash_api::justwatch::SearchHit;
    use moviedash_api::omdb::{MetadataField, NOT_AVAILABLE};
    use serde_json::Value;

    use super::*;

    fn fixture_dataset() -> Dataset {
        Dataset::load(Path::new(concat!(
            env!("CARGO_MANIFEST_DIR"),
            "/../../fixtures/data"
        )))
        .unwrap()
    }

    struct FailingOmdbApi;

    impl LocalOmdbApi for FailingOmdbApi {
        async fn movie_by_id(&self, _public_id: &str) -> Result<Value> {
            bail!("operation timed out")
        }
    }

    struct FixedOmdbApi;

    impl LocalOmdbApi for FixedOmdbApi {
        async fn movie_by_id(&self, _public_id: &str) -> Result<Value> {
            Ok(serde_json::json!({ "Plot": "A heist.", "Response": "True" }))
        }
    }

    /// Serves one search hit and optional details.
    struct StubJustWatchApi {
        details: Option<Value>,
    }

    impl LocalJustWatchApi for StubJustWatchApi {
        async fn search_titles(&self, query: &str, _locale: &str) -> Result<Vec<SearchHit>> {
            Ok(vec![SearchHit {
                id: 1,
                title: String::from(query),
            }])
        }

        async fn title_details(&self, _id: u64, _locale: &str) -> Result<Value> {
            match &self.details {
                Some(details) => Ok(details.clone()),
                None => bail!("HTTP 500"),
            }
        }
    }

    #[tokio::test]
    async fn test_metadata_failure_becomes_unavailable() {
        // Arrange & Act
        let metadata = metadata_or_unavailable(Some(&FailingOmdbApi), "tt1375666").await;

        // Assert
        assert_eq!(metadata, MovieMetadata::unavailable());
    }

    #[tokio::test]
    async fn test_metadata_without_client_is_unavailable() {
        // Arrange & Act
        let metadata = metadata_or_unavailable(None::<&FixedOmdbApi>, "tt1375666").await;

        // Assert
        assert!(metadata.iter().all(|(_, v)| v == NOT_AVAILABLE));
    }

    #[tokio::test]
    async fn test_metadata_success() {
        // Arrange & Act
        let metadata = metadata_or_unavailable(Some(&FixedOmdbApi), "tt0113277").await;

        // Assert
        assert_eq!(metadata.get(MetadataField::Plot), "A heist.");
        assert_eq!(metadata.get(MetadataField::Awards), NOT_AVAILABLE);
    }

    #[tokio::test]
    async fn test_offers_without_offers_key_shows_message() {
        // Arrange
        let api = StubJustWatchApi {
            details: Some(serde_json::json!({ "id": 1 })),
        };

        // Act
        let lookup = lookup_offers(&api, "Heat", Country::Us).await;

        // Assert
        assert!(matches!(
            lookup,
            OfferLookup::NoData(ref m)
                if m == "No data could be obtained through the JustWatch API for Heat in US"
        ));
    }

    #[tokio::test]
    async fn test_offers_empty_array_shows_message() {
        // Arrange
        let api = StubJustWatchApi {
            details: Some(serde_json::json!({ "id": 1, "offers": [] })),
        };

        // Act
        let lookup = lookup_offers(&api, "Zodiac", Country::Uk).await;

        // Assert
        assert!(matches!(
            lookup,
            OfferLookup::NoData(ref m)
                if m == "No data could be obtained through the JustWatch API for Zodiac in UK"
        ));
    }

    #[tokio::test]
    async fn test_offers_api_failure_shows_message() {
        // Arrange
        let api = StubJustWatchApi { details: None };

        // Act
        let lookup = lookup_offers(&api, "Heat", Country::De).await;

        // Assert
        assert!(matches!(lookup, OfferLookup::NoData(ref m) if m.ends_with("Heat in DE")));
    }

    #[tokio::test]
    async fn test_offers_found() {
        // Arrange
        let api = StubJustWatchApi {
            details: Some(
                serde_json::from_str(include_str!(
                    "../../../fixtures/justwatch/title_92417.json"
                ))
                .unwrap(),
            ),
        };

        // Act
        let lookup = lookup_offers(&api, "Inception", Country::Us).await;

        // Assert
        assert!(matches!(lookup, OfferLookup::Found(ref t) if t.title == "Inception"));
    }

    #[test]
    fn test_select_movie_by_title_and_id() {
        // Arrange
        let dataset = fixture_dataset();

        // Act
        let by_title = select_movie(&dataset, Some("Heat"), None).unwrap();
        let by_id = select_movie(&dataset, None, Some("tt1375666")).unwrap();

        // Assert
        assert_eq!(by_title.code, 0);
        assert_eq!(by_id.title, "Inception");
    }

    #[test]
    fn test_select_movie_errors() {
        // Arrange
        let dataset = fixture_dataset();

        // Act & Assert
        assert!(select_movie(&dataset, Some("Nope"), None).is_err());
        assert!(select_movie(&dataset, None, Some("tt0000000")).is_err());
        assert!(select_movie(&dataset, None, None).is_err());
        assert!(select_movie(&dataset, Some("Heat"), Some("tt0113277")).is_err());
    }
}
