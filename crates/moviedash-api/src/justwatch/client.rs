//! `JustWatchClient` - JustWatch content API client implementation.

use std::time::Duration;

use anyhow::{Context, Result, bail};
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use tracing::instrument;
use url::Url;

use super::api::LocalJustWatchApi;
use super::types::{SearchHit, SearchResponse};

/// Default base URL for the JustWatch content API.
const DEFAULT_BASE_URL: &str = "https://apis.justwatch.com/";

/// Default request timeout.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// JustWatch API client.
#[derive(Debug)]
#[allow(clippy::module_name_repetitions)]
pub struct JustWatchClient {
    /// HTTP client.
    http_client: Client,
    /// Base URL for API requests.
    base_url: Url,
}

/// Builder for `JustWatchClient`.
#[derive(Debug)]
#[allow(clippy::module_name_repetitions)]
pub struct JustWatchClientBuilder {
    base_url: Option<Url>,
    user_agent: Option<String>,
    timeout: Option<Duration>,
}

impl JustWatchClientBuilder {
    /// Creates a new builder.
    const fn new() -> Self {
        Self {
            base_url: None,
            user_agent: None,
            timeout: None,
        }
    }

    /// Overrides the base URL (for wiremock in tests).
    #[must_use]
    pub fn base_url(mut self, url: Url) -> Self {
        self.base_url = Some(url);
        self
    }

    /// Sets the User-Agent (required).
    #[must_use]
    pub fn user_agent(mut self, ua: impl Into<String>) -> Self {
        self.user_agent = Some(ua.into());
        self
    }

    /// Sets the request timeout (default: 10s).
    #[must_use]
    pub const fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Builds the client.
    ///
    /// # Errors
    ///
    /// - `user_agent` is not set.
    /// - `reqwest::Client` build fails.
    pub fn build(self) -> Result<JustWatchClient> {
        let user_agent = self.user_agent.context("user_agent is required")?;

        let base_url = if let Some(url) = self.base_url {
            url
        } else {
            let result = Url::parse(DEFAULT_BASE_URL);
            result.context("invalid default base URL")?
        };

        let http_client = Client::builder()
            .user_agent(&user_agent)
            .gzip(true)
            .timeout(self.timeout.unwrap_or(DEFAULT_TIMEOUT))
            .build()
            .context("failed to build HTTP client")?;

        Ok(JustWatchClient {
            http_client,
            base_url,
        })
    }
}

impl JustWatchClient {
    /// Creates a new builder.
    #[must_use]
    pub const fn builder() -> JustWatchClientBuilder {
        JustWatchClientBuilder::new()
    }

    /// Resolves `path` against the base URL.
    fn url(&self, path: &str) -> Result<Url> {
        self.base_url
            .join(path)
            .with_context(|| format!("failed to join URL path: {path}"))
    }

    /// Sends a prepared request and decodes the JSON body.
    #[instrument(skip_all)]
    async fn send_json<T: DeserializeOwned>(&self, builder: RequestBuilder, path: &str) -> Result<T> {
        let request = builder
            .build()
            .with_context(|| format!("failed to build request: {path}"))?;

        tracing::debug!(method = %request.method(), url = %request.url(), "JustWatch API request");

        let result = self.http_client.execute(request).await;
        let response = result.with_context(|| format!("request failed: {path}"))?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| String::from("<failed to read body>"));
            bail!("JustWatch API error (HTTP {status}): {body}");
        }

        let body = response
            .text()
            .await
            .with_context(|| format!("failed to read response body: {path}"))?;
        let raw_result: std::result::Result<T, _> = serde_json::from_str(&body);
        let parsed =
            raw_result.with_context(|| format!("failed to decode JSON response: {path}"))?;
        Ok(parsed)
    }
}

impl LocalJustWatchApi for JustWatchClient {
    #[instrument(skip_all, fields(query = %query, locale = %locale))]
    async fn search_titles(&self, query: &str, locale: &str) -> Result<Vec<SearchHit>> {
        let path = format!("content/titles/{locale}/popular");
        let body = serde_json::json!({
            "query": query,
            "content_types": ["movie"],
        });
        let builder = self.http_client.post(self.url(&path)?).json(&body);
        let response: SearchResponse = self.send_json(builder, &path).await?;
        Ok(response.items)
    }

    #[instrument(skip_all, fields(id = id, locale = %locale))]
    async fn title_details(&self, id: u64, locale: &str) -> Result<serde_json::Value> {
        let path = format!("content/titles/movie/{id}/locale/{locale}");
        let builder = self.http_client.get(self.url(&path)?);
        self.send_json(builder, &path).await
    }
}
