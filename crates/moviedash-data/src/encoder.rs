//! Fitted categorical encoder between internal movie codes and IMDb ids.

use std::path::Path;

use anyhow::{Context, Result, bail};
use serde::Deserialize;

/// On-disk layout of `label_encoder_tconst.json`.
#[derive(Debug, Deserialize)]
struct EncoderFile {
    /// Sorted public identifiers; the position is the internal code.
    classes: Vec<String>,
}

/// Bidirectional mapping between internal codes and public identifiers.
///
/// Code `i` decodes to the `i`-th class. Classes are strictly increasing,
/// so the reverse lookup is a binary search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TconstEncoder {
    /// Fitted classes.
    classes: Vec<String>,
}

impl TconstEncoder {
    /// Creates an encoder from fitted classes.
    ///
    /// # Errors
    ///
    /// Returns an error if the classes are not strictly increasing.
    pub fn new(classes: Vec<String>) -> Result<Self> {
        if let Some(pair) = classes.windows(2).find(|w| w.first() >= w.get(1)) {
            bail!("encoder classes are not strictly increasing at {pair:?}");
        }
        Ok(Self { classes })
    }

    /// Loads `label_encoder_tconst.json`.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, or the classes
    /// are not a fitted (sorted, unique) list.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        let file: EncoderFile = serde_json::from_str(&content)
            .with_context(|| format!("failed to parse {}", path.display()))?;
        Self::new(file.classes).with_context(|| format!("invalid encoder in {}", path.display()))
    }

    /// Decodes an internal code to its public identifier.
    ///
    /// # Errors
    ///
    /// Returns an error if `code` lies outside the fitted domain.
    pub fn inverse_transform(&self, code: u32) -> Result<&str> {
        usize::try_from(code)
            .ok()
            .and_then(|idx| self.classes.get(idx))
            .map(String::as_str)
            .with_context(|| {
                format!(
                    "movie code {code} is outside the encoder domain (0..{})",
                    self.classes.len()
                )
            })
    }

    /// Encodes a public identifier to its internal code.
    ///
    /// # Errors
    ///
    /// Returns an error if `public_id` was not seen when fitting.
    pub fn transform(&self, public_id: &str) -> Result<u32> {
        let idx = self
            .classes
            .binary_search_by(|c| c.as_str().cmp(public_id))
            .ok()
            .with_context(|| format!("unknown movie id {public_id}"))?;
        u32::try_from(idx).context("encoder index exceeds u32")
    }

    /// Number of fitted classes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.classes.len()
    }

    /// Returns `true` if nothing was fitted.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    fn encoder() -> TconstEncoder {
        TconstEncoder::new(vec![
            String::from("tt0110912"),
            String::from("tt0133093"),
            String::from("tt1375666"),
        ])
        .unwrap()
    }

    #[test]
    fn test_inverse_transform() {
        // Arrange
        let enc = encoder();

        // Act & Assert
        assert_eq!(enc.inverse_transform(0).unwrap(), "tt0110912");
        assert_eq!(enc.inverse_transform(2).unwrap(), "tt1375666");
    }

    #[test]
    fn test_inverse_transform_outside_domain() {
        // Arrange
        let enc = encoder();

        // Act
        let result = enc.inverse_transform(3);

        // Assert
        assert!(result.unwrap_err().to_string().contains("outside the encoder domain"));
    }

    #[test]
    fn test_transform_is_inverse() {
        // Arrange
        let enc = encoder();

        // Act & Assert
        for code in 0..3 {
            let id = enc.inverse_transform(code).unwrap();
            assert_eq!(enc.transform(id).unwrap(), code);
        }
        assert!(enc.transform("tt9999999").is_err());
    }

    #[test]
    fn test_new_rejects_unsorted_classes() {
        // Arrange & Act
        let result = TconstEncoder::new(vec![String::from("tt2"), String::from("tt1")]);

        // Assert
        assert!(result.is_err());
    }

    #[test]
    fn test_new_rejects_duplicate_classes() {
        // Arrange & Act
        let result = TconstEncoder::new(vec![String::from("tt1"), String::from("tt1")]);

        // Assert
        assert!(result.is_err());
    }

    #[test]
    fn test_load_from_json() {
        // Arrange
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("label_encoder_tconst.json");
        std::fs::write(&path, r#"{"classes": ["tt0000001", "tt0000002"]}"#).unwrap();

        // Act
        let enc = TconstEncoder::load(&path).unwrap();

        // Assert
        assert_eq!(enc.len(), 2);
        assert_eq!(enc.inverse_transform(1).unwrap(), "tt0000002");
    }
}
