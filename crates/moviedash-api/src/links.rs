//! Outbound links to a movie's pages on IMDb and other sites.

use std::sync::LazyLock;

use regex::Regex;
use reqwest::Client;
use tracing::instrument;
use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

use crate::justwatch::Country;

/// Runs of characters that are not ASCII letters or digits.
#[allow(clippy::expect_used)]
static NON_ALNUM_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^0-9a-zA-Z]+").expect("failed to compile slug regex"));

/// URL-friendly form of a title: `"Léon: The Professional"` becomes
/// `"leon_the_professional"`.
#[must_use]
pub fn slugify(title: &str) -> String {
    let folded: String = title.nfkd().filter(|c| !is_combining_mark(*c)).collect();
    let mut slug = NON_ALNUM_RE.replace_all(&folded, "_").to_lowercase();
    if slug.ends_with('_') {
        slug.pop();
    }
    slug
}

/// A link, with the site search to fall back on when the page is missing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Link {
    /// Site name shown to the user.
    pub site: &'static str,
    /// Direct page URL.
    pub url: String,
    /// Search URL used when the page does not exist.
    pub search_url: Option<String>,
}

impl Link {
    /// Link without a search fallback.
    fn direct(site: &'static str, url: String) -> Self {
        Self {
            site,
            url,
            search_url: None,
        }
    }

    /// Link with a search fallback.
    fn with_search(site: &'static str, url: String, search_url: String) -> Self {
        Self {
            site,
            url,
            search_url: Some(search_url),
        }
    }
}

/// Links to one movie on external sites.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundLinks {
    /// IMDb title page.
    pub imdb: Link,
    /// Rotten Tomatoes page.
    pub rotten_tomatoes: Link,
    /// Letterboxd film page.
    pub letterboxd: Link,
    /// YouTube trailer search.
    pub youtube: Link,
    /// JustWatch page for the selected country.
    pub justwatch: Link,
}

impl OutboundLinks {
    /// Builds the links from the IMDb id and title of a movie.
    #[must_use]
    pub fn new(public_id: &str, title: &str, country: Country) -> Self {
        let slug = slugify(title);
        let dashed = slug.replace('_', "-");
        let country = country.path_segment();

        Self {
            imdb: Link::direct("IMDb", format!("https://www.imdb.com/title/{public_id}/")),
            rotten_tomatoes: Link::with_search(
                "Rotten Tomatoes",
                format!("https://www.rottentomatoes.com/m/{slug}"),
                format!(
                    "https://www.rottentomatoes.com/search?search={}",
                    slug.replace('_', "%20")
                ),
            ),
            letterboxd: Link::with_search(
                "Letterboxd",
                format!("https://letterboxd.com/film/{dashed}/"),
                format!("https://letterboxd.com/search/{}", slug.replace('_', "")),
            ),
            youtube: Link::direct(
                "YouTube",
                format!("https://www.youtube.com/results?search_query={dashed}+trailer"),
            ),
            justwatch: Link::with_search(
                "JustWatch",
                format!("https://www.justwatch.com/{country}/movie/{dashed}"),
                format!("https://www.justwatch.com/{country}/search?q={dashed}"),
            ),
        }
    }

    /// All links in display order.
    #[must_use]
    pub const fn all(&self) -> [&Link; 5] {
        [
            &self.imdb,
            &self.rotten_tomatoes,
            &self.letterboxd,
            &self.youtube,
            &self.justwatch,
        ]
    }

    /// Checks each link that has a search fallback and switches to the
    /// search URL when the page does not answer with a success status.
    #[instrument(skip_all)]
    pub async fn verify(mut self, client: &Client) -> Self {
        for link in [
            &mut self.rotten_tomatoes,
            &mut self.letterboxd,
            &mut self.justwatch,
        ] {
            verify_link(link, client).await;
        }
        self
    }
}

/// Swaps `link.url` for its search URL when a GET does not succeed.
async fn verify_link(link: &mut Link, client: &Client) {
    let Some(search_url) = link.search_url.as_ref() else {
        return;
    };

    let exists = match client.get(&link.url).send().await {
        Ok(response) => response.status().is_success(),
        Err(e) => {
            tracing::debug!(url = %link.url, error = %e, "Link check failed");
            false
        }
    };

    if !exists {
        tracing::debug!(site = link.site, url = %link.url, "Page missing, using site search");
        link.url.clone_from(search_url);
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    #[test]
    fn test_slugify() {
        // Arrange & Act & Assert
        assert_eq!(slugify("The Dark Knight"), "the_dark_knight");
        assert_eq!(slugify("Se7en"), "se7en");
        assert_eq!(slugify("Léon: The Professional"), "leon_the_professional");
        assert_eq!(slugify("What's Up, Doc?"), "what_s_up_doc");
        assert_eq!(slugify("Amélie"), "amelie");
    }

    #[test]
    fn test_outbound_links() {
        // Arrange & Act
        let links = OutboundLinks::new("tt1375666", "Inception", Country::Uk);

        // Assert
        assert_eq!(links.imdb.url, "https://www.imdb.com/title/tt1375666/");
        assert_eq!(
            links.rotten_tomatoes.url,
            "https://www.rottentomatoes.com/m/inception"
        );
        assert_eq!(links.letterboxd.url, "https://letterboxd.com/film/inception/");
        assert_eq!(
            links.youtube.url,
            "https://www.youtube.com/results?search_query=inception+trailer"
        );
        assert_eq!(
            links.justwatch.url,
            "https://www.justwatch.com/uk/movie/inception"
        );
    }

    #[test]
    fn test_outbound_links_multiword_title() {
        // Arrange & Act
        let links = OutboundLinks::new("tt0407887", "The Departed", Country::Us);

        // Assert
        assert_eq!(
            links.letterboxd.url,
            "https://letterboxd.com/film/the-departed/"
        );
        assert_eq!(
            links.rotten_tomatoes.search_url.as_deref(),
            Some("https://www.rottentomatoes.com/search?search=the%20departed")
        );
        assert_eq!(
            links.letterboxd.search_url.as_deref(),
            Some("https://letterboxd.com/search/thedeparted")
        );
        assert_eq!(links.all().len(), 5);
    }

    #[tokio::test]
    async fn test_verify_falls_back_to_search() {
        // Arrange
        let mock_server = wiremock::MockServer::start().await;

        wiremock::Mock::given(wiremock::matchers::method("GET"))
            .and(wiremock::matchers::path("/m/inception"))
            .respond_with(wiremock::ResponseTemplate::new(200))
            .mount(&mock_server)
            .await;
        wiremock::Mock::given(wiremock::matchers::method("GET"))
            .and(wiremock::matchers::path("/film/inception/"))
            .respond_with(wiremock::ResponseTemplate::new(404))
            .mount(&mock_server)
            .await;

        let base = mock_server.uri();
        let mut links = OutboundLinks::new("tt1375666", "Inception", Country::Us);
        links.rotten_tomatoes.url = format!("{base}/m/inception");
        links.letterboxd.url = format!("{base}/film/inception/");
        links.justwatch.search_url = None;

        // Act
        let verified = links.verify(&Client::new()).await;

        // Assert
        assert_eq!(verified.rotten_tomatoes.url, format!("{base}/m/inception"));
        assert_eq!(
            verified.letterboxd.url,
            "https://letterboxd.com/search/inception"
        );
        assert_eq!(
            verified.justwatch.url,
            "https://www.justwatch.com/us/movie/inception"
        );
    }
}
