//! Countries supported by the offer lookup.

use std::fmt;
use std::str::FromStr;

use anyhow::{Result, anyhow};

/// Country with a JustWatch catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Country {
    /// Australia.
    Au,
    /// Canada.
    Ca,
    /// Switzerland.
    Ch,
    /// Germany.
    De,
    /// Spain.
    Es,
    /// Greece.
    Gr,
    /// Hong Kong.
    Hk,
    /// Italy.
    It,
    /// Netherlands.
    Nl,
    /// Poland.
    Pl,
    /// Portugal.
    Pt,
    /// Romania.
    Ro,
    /// Russia.
    Ru,
    /// Sweden.
    Se,
    /// Slovakia.
    Sk,
    /// United Kingdom.
    Uk,
    /// United States.
    Us,
}

impl Country {
    /// All supported countries, sorted by code.
    pub const ALL: [Self; 17] = [
        Self::Au,
        Self::Ca,
        Self::Ch,
        Self::De,
        Self::Es,
        Self::Gr,
        Self::Hk,
        Self::It,
        Self::Nl,
        Self::Pl,
        Self::Pt,
        Self::Ro,
        Self::Ru,
        Self::Se,
        Self::Sk,
        Self::Uk,
        Self::Us,
    ];

    /// Upper-case country code.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::Au => "AU",
            Self::Ca => "CA",
            Self::Ch => "CH",
            Self::De => "DE",
            Self::Es => "ES",
            Self::Gr => "GR",
            Self::Hk => "HK",
            Self::It => "IT",
            Self::Nl => "NL",
            Self::Pl => "PL",
            Self::Pt => "PT",
            Self::Ro => "RO",
            Self::Ru => "RU",
            Self::Se => "SE",
            Self::Sk => "SK",
            Self::Uk => "UK",
            Self::Us => "US",
        }
    }

    /// JustWatch catalog locale.
    #[must_use]
    pub const fn locale(self) -> &'static str {
        match self {
            Self::Au => "en_AU",
            Self::Ca => "en_CA",
            Self::Ch => "de_CH",
            Self::De => "de_DE",
            Self::Es => "es_ES",
            Self::Gr => "el_GR",
            Self::Hk => "zh_HK",
            Self::It => "it_IT",
            Self::Nl => "nl_NL",
            Self::Pl => "pl_PL",
            Self::Pt => "pt_PT",
            Self::Ro => "ro_RO",
            Self::Ru => "ru_RU",
            Self::Se => "sv_SE",
            Self::Sk => "sk_SK",
            Self::Uk => "en_GB",
            Self::Us => "en_US",
        }
    }

    /// Lower-case path segment used by justwatch.com pages.
    #[must_use]
    pub fn path_segment(self) -> String {
        self.code().to_lowercase()
    }

    /// The country after this one in code order, wrapping around.
    #[must_use]
    pub fn next(self) -> Self {
        Self::ALL
            .into_iter()
            .cycle()
            .skip_while(|c| *c != self)
            .nth(1)
            .unwrap_or(self)
    }
}

impl fmt::Display for Country {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Country {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        let code = s.trim();
        Self::ALL
            .into_iter()
            .find(|c| c.code().eq_ignore_ascii_case(code))
            .ok_or_else(|| {
                let supported: Vec<&str> = Self::ALL.iter().map(|c| c.code()).collect();
                anyhow!(
                    "unsupported country {s:?}; supported: {}",
                    supported.join(", ")
                )
            })
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    #[test]
    fn test_parse_country_case_insensitive() {
        // Arrange & Act & Assert
        assert_eq!("US".parse::<Country>().unwrap(), Country::Us);
        assert_eq!("uk".parse::<Country>().unwrap(), Country::Uk);
        assert_eq!(" se ".parse::<Country>().unwrap(), Country::Se);
    }

    #[test]
    fn test_parse_unsupported_country() {
        // Arrange & Act
        let result = "FR".parse::<Country>();

        // Assert
        let err = result.unwrap_err().to_string();
        assert!(err.contains("unsupported country"));
        assert!(err.contains("US"));
    }

    #[test]
    fn test_locale_table() {
        // Arrange & Act & Assert
        assert_eq!(Country::Uk.locale(), "en_GB");
        assert_eq!(Country::Gr.locale(), "el_GR");
        assert_eq!(Country::Ch.locale(), "de_CH");
        assert_eq!(Country::Uk.path_segment(), "uk");
    }

    #[test]
    fn test_all_sorted_by_code() {
        // Arrange
        let codes: Vec<&str> = Country::ALL.iter().map(|c| c.code()).collect();

        // Act
        let mut sorted = codes.clone();
        sorted.sort_unstable();

        // Assert
        assert_eq!(codes, sorted);
    }

    #[test]
    fn test_next_cycles_in_code_order() {
        // Arrange & Act & Assert
        assert_eq!(Country::Au.next(), Country::Ca);
        assert_eq!(Country::Uk.next(), Country::Us);
        assert_eq!(Country::Us.next(), Country::Au);
    }
}
