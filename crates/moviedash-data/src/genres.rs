//! Genre membership table (`genres.csv`).

use std::collections::{BTreeSet, HashMap};
use std::path::Path;

use anyhow::{Context, Result, bail};

/// Column holding the genre-combination code.
const LABEL_COLUMN: &str = "genres_label";

/// Column holding the display string of the combination.
const DISPLAY_COLUMN: &str = "Genres";

/// One genre combination and the genres it contains.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenreRow {
    /// Genre-combination code.
    pub label: u32,
    /// Display string (e.g. "crime,drama").
    pub display: String,
    /// Genres with membership = true.
    pub members: BTreeSet<String>,
}

impl GenreRow {
    /// Returns `true` if the row is tagged with every genre in `genres`.
    ///
    /// An empty selection is vacuously satisfied.
    #[must_use]
    pub fn has_all(&self, genres: &BTreeSet<String>) -> bool {
        genres.is_subset(&self.members)
    }
}

/// Mapping from genre-combination code to genre membership.
#[derive(Debug, Clone)]
#[allow(clippy::module_name_repetitions)]
pub struct GenreTable {
    /// All genre names, sorted.
    genres: Vec<String>,
    /// Rows keyed by combination code.
    rows: HashMap<u32, GenreRow>,
}

impl GenreTable {
    /// Builds a table from parsed rows.
    ///
    /// # Errors
    ///
    /// Returns an error if two rows share a combination code or a row
    /// names a genre outside `genres`.
    pub fn new(genres: impl IntoIterator<Item = String>, rows: Vec<GenreRow>) -> Result<Self> {
        let genres: BTreeSet<String> = genres.into_iter().collect();
        let mut by_label = HashMap::with_capacity(rows.len());
        for row in rows {
            if let Some(unknown) = row.members.iter().find(|g| !genres.contains(*g)) {
                bail!("genre row {} references unknown genre {unknown}", row.label);
            }
            let label = row.label;
            if by_label.insert(label, row).is_some() {
                bail!("duplicate genre row for label {label}");
            }
        }
        Ok(Self {
            genres: genres.into_iter().collect(),
            rows: by_label,
        })
    }

    /// Loads `genres.csv`.
    ///
    /// Every column other than `genres_label` and `Genres` is a genre;
    /// cells are `0`/`1` or `true`/`false`.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, a required column is
    /// missing, or a cell cannot be parsed.
    pub fn load(path: &Path) -> Result<Self> {
        let mut reader = csv::Reader::from_path(path)
            .with_context(|| format!("failed to open {}", path.display()))?;

        let headers = reader
            .headers()
            .with_context(|| format!("failed to read header of {}", path.display()))?
            .clone();

        let label_idx = headers
            .iter()
            .position(|h| h == LABEL_COLUMN)
            .with_context(|| format!("{} has no {LABEL_COLUMN} column", path.display()))?;
        let display_idx = headers
            .iter()
            .position(|h| h == DISPLAY_COLUMN)
            .with_context(|| format!("{} has no {DISPLAY_COLUMN} column", path.display()))?;

        let genre_columns: Vec<(usize, String)> = headers
            .iter()
            .enumerate()
            .filter(|(i, _)| *i != label_idx && *i != display_idx)
            .map(|(i, h)| (i, String::from(h)))
            .collect();

        let mut rows = Vec::new();
        for (line, record) in reader.records().enumerate() {
            let line = line.saturating_add(1);
            let record = record
                .with_context(|| format!("failed to read row {line} of {}", path.display()))?;

            let label: u32 = record
                .get(label_idx)
                .unwrap_or_default()
                .trim()
                .parse()
                .with_context(|| format!("invalid {LABEL_COLUMN} in row {line}"))?;
            let display = String::from(record.get(display_idx).unwrap_or_default());

            let mut members = BTreeSet::new();
            for (idx, genre) in &genre_columns {
                let cell = record.get(*idx).unwrap_or_default();
                if parse_membership(cell)
                    .with_context(|| format!("invalid {genre} cell in row {line}"))?
                {
                    members.insert(genre.clone());
                }
            }

            rows.push(GenreRow {
                label,
                display,
                members,
            });
        }

        Self::new(genre_columns.into_iter().map(|(_, g)| g), rows)
    }

    /// Sorted genre names (the selectable options).
    #[must_use]
    pub fn genres(&self) -> &[String] {
        &self.genres
    }

    /// Returns `true` if `genre` is a column of the table.
    #[must_use]
    pub fn contains_genre(&self, genre: &str) -> bool {
        self.genres.binary_search_by(|g| g.as_str().cmp(genre)).is_ok()
    }

    /// Looks up a combination code.
    #[must_use]
    pub fn row(&self, label: u32) -> Option<&GenreRow> {
        self.rows.get(&label)
    }

    /// Number of genre combinations.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Returns `true` if the table has no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Parses a membership cell.
fn parse_membership(cell: &str) -> Result<bool> {
    match cell.trim() {
        "1" | "1.0" | "true" | "True" | "TRUE" => Ok(true),
        "" | "0" | "0.0" | "false" | "False" | "FALSE" => Ok(false),
        other => bail!("expected 0/1 or true/false, got {other:?}"),
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    fn write_genres(content: &str) -> (tempfile::TempDir, std::path::PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("genres.csv");
        std::fs::write(&path, content).unwrap();
        (dir, path)
    }

    #[test]
    fn test_load_genres() {
        // Arrange
        let (_dir, path) = write_genres(
            "genres_label,Genres,drama,crime,comedy\n0,drama,1,0,0\n1,\"crime,drama\",True,true,False\n",
        );

        // Act
        let table = GenreTable::load(&path).unwrap();

        // Assert
        assert_eq!(table.len(), 2);
        assert_eq!(table.genres(), ["comedy", "crime", "drama"]);
        let row = table.row(1).unwrap();
        assert_eq!(row.display, "crime,drama");
        assert!(row.members.contains("crime"));
        assert!(row.members.contains("drama"));
        assert!(!row.members.contains("comedy"));
    }

    #[test]
    fn test_has_all_is_conjunctive() {
        // Arrange
        let row = GenreRow {
            label: 0,
            display: String::from("drama"),
            members: BTreeSet::from([String::from("drama")]),
        };
        let both = BTreeSet::from([String::from("crime"), String::from("drama")]);
        let drama = BTreeSet::from([String::from("drama")]);

        // Act & Assert
        assert!(!row.has_all(&both));
        assert!(row.has_all(&drama));
        assert!(row.has_all(&BTreeSet::new()));
    }

    #[test]
    fn test_load_genres_rejects_duplicate_labels() {
        // Arrange
        let (_dir, path) = write_genres("genres_label,Genres,drama\n0,drama,1\n0,drama,1\n");

        // Act
        let result = GenreTable::load(&path);

        // Assert
        assert!(result.unwrap_err().to_string().contains("duplicate genre row"));
    }

    #[test]
    fn test_load_genres_rejects_bad_cell() {
        // Arrange
        let (_dir, path) = write_genres("genres_label,Genres,drama\n0,drama,maybe\n");

        // Act
        let result = GenreTable::load(&path);

        // Assert
        assert!(result.is_err());
    }

    #[test]
    fn test_load_genres_requires_label_column() {
        // Arrange
        let (_dir, path) = write_genres("Genres,drama\ndrama,1\n");

        // Act
        let result = GenreTable::load(&path);

        // Assert
        assert!(result.unwrap_err().to_string().contains("genres_label"));
    }

    #[test]
    fn test_contains_genre() {
        // Arrange
        let table = GenreTable::new([String::from("drama"), String::from("crime")], Vec::new())
            .unwrap();

        // Act & Assert
        assert!(table.contains_genre("crime"));
        assert!(!table.contains_genre("western"));
    }
}
