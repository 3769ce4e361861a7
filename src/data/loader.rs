// ============================================================
// Layer 4 - Predicate Loader
// ============================================================
// Reads annotated predicate instances from a JSON-lines file:
// one PredicateInstance object per line, blank lines ignored.
//
// A malformed line is a hard error. Records are never
// skipped, so fold membership is stable between runs.
//
// Reference: serde_json documentation

use anyhow::{Context, Result};
use std::{
    fs::File,
    io::{BufRead, BufReader},
    path::PathBuf,
};

use crate::domain::predicate::PredicateInstance;
use crate::domain::traits::PredicateSource;

/// Loads predicate instances from a `.jsonl` file.
/// Implements the PredicateSource trait from Layer 3.
pub struct JsonlLoader {
    /// Path to the JSON-lines annotation file
    path: PathBuf,
}

impl JsonlLoader {
    /// Create a new JsonlLoader pointed at a file
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl PredicateSource for JsonlLoader {
    fn load_all(&self) -> Result<Vec<PredicateInstance>> {
        let file = File::open(&self.path).with_context(|| {
            format!("Cannot open dataset file '{}'", self.path.display())
        })?;

        let mut records = Vec::new();

        for (lineno, line) in BufReader::new(file).lines().enumerate() {
            let line = line.with_context(|| {
                format!("Cannot read '{}'", self.path.display())
            })?;

            if line.trim().is_empty() {
                continue;
            }

            let record: PredicateInstance = serde_json::from_str(&line)
                .with_context(|| {
                    format!(
                        "Malformed predicate record at {}:{}",
                        self.path.display(),
                        lineno + 1
                    )
                })?;
            records.push(record);
        }

        tracing::debug!(
            "Read {} predicate records from '{}'",
            records.len(),
            self.path.display()
        );
        Ok(records)
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_reads_records_and_skips_blank_lines() {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        writeln!(f, r#"{{"pred_id":"a","lemma":"sale"}}"#).unwrap();
        writeln!(f).unwrap();
        writeln!(f, r#"{{"pred_id":"b","lemma":"loan"}}"#).unwrap();

        let records = JsonlLoader::new(f.path()).load_all().unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[1].lemma, "loan");
    }

    #[test]
    fn test_malformed_line_reports_position() {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        writeln!(f, r#"{{"pred_id":"a","lemma":"sale"}}"#).unwrap();
        writeln!(f, "not json").unwrap();

        let err = JsonlLoader::new(f.path()).load_all().unwrap_err();
        assert!(format!("{err}").ends_with(":2"));
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let dir = tempfile::TempDir::new().unwrap();
        let loader = JsonlLoader::new(dir.path().join("absent.jsonl"));
        assert!(loader.load_all().is_err());
    }
}
