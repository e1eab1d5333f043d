//! `AppConfig` struct and TOML loading.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use moviedash_data::DefaultPeople;
use serde::Deserialize;

/// Environment variable holding the OMDb API key.
const OMDB_API_KEY_ENV: &str = "OMDB_API_KEY";

/// Data directory used when neither the CLI nor the config names one.
const DEFAULT_DATA_DIR: &str = "data";

/// Top-level application configuration.
#[derive(Debug, Deserialize, Default, PartialEq, Eq)]
pub struct AppConfig {
    /// Dataset location.
    #[serde(default)]
    pub data: DataConfig,
    /// OMDb settings.
    #[serde(default)]
    pub omdb: OmdbConfig,
    /// Offer lookup settings.
    #[serde(default)]
    pub offers: OffersConfig,
    /// Default selections for the people view.
    #[serde(default)]
    pub people: PeopleConfig,
    /// HTTP client settings.
    #[serde(default)]
    pub http: HttpConfig,
    /// Outbound link settings.
    #[serde(default)]
    pub links: LinksConfig,
}

/// Dataset location.
#[derive(Debug, Deserialize, Default, PartialEq, Eq)]
pub struct DataConfig {
    /// Directory holding `movies.csv` and the other tables.
    #[serde(default)]
    pub dir: Option<PathBuf>,
}

/// OMDb settings.
#[derive(Debug, Deserialize, Default, PartialEq, Eq)]
pub struct OmdbConfig {
    /// API key; `OMDB_API_KEY` takes precedence.
    #[serde(default)]
    pub api_key: Option<String>,
}

/// Offer lookup settings.
#[derive(Debug, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct OffersConfig {
    /// Default country code.
    pub country: String,
}

impl Default for OffersConfig {
    fn default() -> Self {
        Self {
            country: String::from("US"),
        }
    }
}

/// Default selections for single-category people views.
#[derive(Debug, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct PeopleConfig {
    /// Default director.
    pub default_director: String,
    /// Default actor.
    pub default_actor: String,
    /// Default actress.
    pub default_actress: String,
}

impl Default for PeopleConfig {
    fn default() -> Self {
        let defaults = DefaultPeople::default();
        Self {
            default_director: defaults.director,
            default_actor: defaults.actor,
            default_actress: defaults.actress,
        }
    }
}

/// HTTP client settings.
#[derive(Debug, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct HttpConfig {
    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self { timeout_secs: 10 }
    }
}

/// Outbound link settings.
#[derive(Debug, Deserialize, Default, PartialEq, Eq)]
pub struct LinksConfig {
    /// Check that link targets exist and fall back to site search.
    #[serde(default)]
    pub verify: bool,
}

impl AppConfig {
    /// Loads config from a TOML file. Returns default if file does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed,
    /// or if `[http] timeout_secs` is zero.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        let config: Self = toml::from_str(&content)
            .with_context(|| format!("failed to parse {}", path.display()))?;
        if config.http.timeout_secs == 0 {
            bail!(
                "invalid {}: [http] timeout_secs must be at least 1",
                path.display()
            );
        }
        Ok(config)
    }

    /// Data directory: the CLI override, then `[data] dir`, then `./data`.
    #[must_use]
    pub fn data_dir(&self, cli_override: Option<&PathBuf>) -> PathBuf {
        cli_override
            .or(self.data.dir.as_ref())
            .cloned()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_DIR))
    }

    /// OMDb API key from `OMDB_API_KEY`, then `[omdb] api_key`.
    #[must_use]
    pub fn omdb_api_key(&self) -> Option<String> {
        Self::pick_api_key(std::env::var(OMDB_API_KEY_ENV).ok(), self.omdb.api_key.as_ref())
    }

    /// Picks the first non-empty key.
    fn pick_api_key(env: Option<String>, configured: Option<&String>) -> Option<String> {
        env.filter(|k| !k.is_empty())
            .or_else(|| configured.filter(|k| !k.is_empty()).cloned())
    }

    /// Default people as used by the people view.
    #[must_use]
    pub fn default_people(&self) -> DefaultPeople {
        DefaultPeople {
            director: self.people.default_director.clone(),
            actor: self.people.default_actor.clone(),
            actress: self.people.default_actress.clone(),
        }
    }
}
