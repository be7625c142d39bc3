//! # Data Directory
//!
//! Owns the directory holding the record files and the line format shared
//! by all of them.
//!
//! ## Line Format
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  # comment lines and blank lines are ignored                            │
//! │  1|Espresso|15000|coffee|single                                         │
//! │  │ │        │     │      └── fields are trimmed on read                 │
//! │  │ │        │     └── `|` separated, never quoted                       │
//! │  └─┴────────┴── one record per `\n` terminated line                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Text fields are validated against the separators before they get here
//! (see `brew_core::validation`), so quoting is switched off entirely and a
//! stray `"` is just a character.

use std::fs::{self, File};
use std::path::{Path, PathBuf};

use csv::{QuoteStyle, ReaderBuilder, StringRecord, Terminator, Trim, WriterBuilder};
use tracing::{debug, warn};

use crate::error::StoreResult;

/// Field separator used by every record file.
pub const DELIMITER: u8 = b'|';

/// Lines starting with this byte are skipped.
pub const COMMENT: u8 = b'#';

/// A record read from disk along with its 1-based line number.
#[derive(Debug, Clone)]
pub struct RawRecord {
    pub line: u64,
    pub fields: StringRecord,
}

/// Handle to the data directory.
///
/// Creating one makes sure the directory exists; files inside are created
/// lazily on first save.
#[derive(Debug, Clone)]
pub struct DataDir {
    root: PathBuf,
}

impl DataDir {
    /// Opens `root`, creating it (and parents) when missing.
    pub fn create(root: impl AsRef<Path>) -> StoreResult<Self> {
        let root = root.as_ref().to_path_buf();
        if !root.exists() {
            fs::create_dir_all(&root)?;
            debug!(path = %root.display(), "Created data directory");
        }
        Ok(DataDir { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Full path of a record file inside the directory.
    pub fn path(&self, file_name: &str) -> PathBuf {
        self.root.join(file_name)
    }

    pub fn exists(&self, file_name: &str) -> bool {
        self.path(file_name).is_file()
    }

    /// Reads every non-blank, non-comment line of `file_name`.
    ///
    /// A missing file reads as empty. Lines the reader itself cannot parse
    /// (invalid UTF-8) are logged and skipped; I/O failures abort.
    pub fn read_records(&self, file_name: &str) -> StoreResult<Vec<RawRecord>> {
        let path = self.path(file_name);
        if !path.exists() {
            debug!(file = file_name, "Data file missing, treating as empty");
            return Ok(Vec::new());
        }

        let mut reader = ReaderBuilder::new()
            .delimiter(DELIMITER)
            .has_headers(false)
            .flexible(true)
            .quoting(false)
            .comment(Some(COMMENT))
            .trim(Trim::All)
            .from_reader(File::open(&path)?);

        let mut records = Vec::new();
        for result in reader.records() {
            match result {
                Ok(fields) => {
                    if fields.iter().all(str::is_empty) {
                        continue;
                    }
                    let line = fields.position().map(|p| p.line()).unwrap_or_default();
                    records.push(RawRecord { line, fields });
                }
                Err(err) if err.is_io_error() => return Err(err.into()),
                Err(err) => {
                    let line = err.position().map(|p| p.line()).unwrap_or_default();
                    warn!(file = file_name, line, error = %err, "Skipping unreadable line");
                }
            }
        }

        Ok(records)
    }

    /// Replaces `file_name` with one line per row.
    pub fn write_records<I, R>(&self, file_name: &str, rows: I) -> StoreResult<usize>
    where
        I: IntoIterator<Item = R>,
        R: IntoIterator,
        R::Item: AsRef<[u8]>,
    {
        let mut writer = WriterBuilder::new()
            .delimiter(DELIMITER)
            .has_headers(false)
            .flexible(true)
            .quote_style(QuoteStyle::Never)
            .terminator(Terminator::Any(b'\n'))
            .from_path(self.path(file_name))?;

        let mut written = 0;
        for row in rows {
            writer.write_record(row)?;
            written += 1;
        }
        writer.flush()?;

        debug!(file = file_name, records = written, "Wrote data file");
        Ok(written)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn setup() -> (DataDir, TempDir) {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let dir = DataDir::create(temp_dir.path().join("data")).unwrap();
        (dir, temp_dir)
    }

    #[test]
    fn test_create_makes_directory() {
        let (dir, _temp) = setup();
        assert!(dir.root().is_dir());
    }

    #[test]
    fn test_missing_file_reads_empty() {
        let (dir, _temp) = setup();
        assert!(!dir.exists("products.txt"));
        assert!(dir.read_records("products.txt").unwrap().is_empty());
    }

    #[test]
    fn test_skips_comments_and_blank_lines_and_trims() {
        let (dir, _temp) = setup();
        fs::write(
            dir.path("products.txt"),
            "# header comment\n\n1 | Espresso | 15000 |coffee|single\n   \n2|Donut|9000|snack|pastry\n",
        )
        .unwrap();

        let records = dir.read_records("products.txt").unwrap();

        assert_eq!(records.len(), 2);
        assert!(records[0].line > 0);
        assert_eq!(
            records[0].fields.iter().collect::<Vec<_>>(),
            vec!["1", "Espresso", "15000", "coffee", "single"]
        );
        assert!(records[1].line > records[0].line);
        assert_eq!(records[1].fields.get(1), Some("Donut"));
    }

    #[test]
    fn test_write_then_read() {
        let (dir, _temp) = setup();
        let rows = vec![
            vec!["1".to_string(), "Dewi".to_string(), "".to_string(), "10".to_string()],
            vec!["2".to_string(), "Rizky \"R\"".to_string(), "0812".to_string(), "0".to_string()],
        ];

        assert_eq!(dir.write_records("customers.txt", &rows).unwrap(), 2);

        let text = fs::read_to_string(dir.path("customers.txt")).unwrap();
        assert_eq!(text, "1|Dewi||10\n2|Rizky \"R\"|0812|0\n");

        let back = dir.read_records("customers.txt").unwrap();
        assert_eq!(back[1].fields.get(1), Some("Rizky \"R\""));
        assert_eq!(back[0].fields.get(2), Some(""));
    }

    #[test]
    fn test_write_truncates_previous_content() {
        let (dir, _temp) = setup();
        dir.write_records("t.txt", vec![vec!["a"], vec!["b"]]).unwrap();
        dir.write_records("t.txt", vec![vec!["c"]]).unwrap();

        assert_eq!(fs::read_to_string(dir.path("t.txt")).unwrap(), "c\n");
    }
}
