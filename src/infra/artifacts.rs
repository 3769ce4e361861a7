// ============================================================
// Layer 6 - Binary Artifacts
// ============================================================
// Saves and restores the run artifacts with bincode:
//
//   sample_list.pkl              SampleList
//   model-<suffix>.pkl           SavedModels
//   missing_labels-<suffix>.pkl  MissingLabelPredictions
//
// The `.pkl` names are kept so the output directory layout stays
// the same as earlier tooling; the contents are bincode, not pickle.
//
// Reference: bincode 1.x documentation

use anyhow::{Context, Result};
use serde::{de::DeserializeOwned, Serialize};
use std::{
    fs::File,
    io::{BufReader, BufWriter, Write},
    path::Path,
};

use crate::domain::sample::SampleList;
use crate::domain::traits::Persistable;
use crate::ml::classifier::{MissingLabelPredictions, SavedModels};

/// Serialise `value` to `path`, replacing any existing file.
pub fn save_bincode<T: Serialize>(value: &T, path: &Path) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("Cannot create '{}'", path.display()))?;
    let mut writer = BufWriter::new(file);

    bincode::serialize_into(&mut writer, value)
        .with_context(|| format!("Cannot serialise to '{}'", path.display()))?;
    writer.flush()?;

    tracing::debug!("Wrote '{}'", path.display());
    Ok(())
}

/// Deserialise a value previously written by `save_bincode`.
pub fn load_bincode<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let file = File::open(path)
        .with_context(|| format!("Cannot open '{}'", path.display()))?;

    bincode::deserialize_from(BufReader::new(file))
        .with_context(|| format!("Cannot parse '{}'", path.display()))
}

impl Persistable for SampleList {
    fn save(&self, path: &Path) -> Result<()> {
        save_bincode(self, path)
    }

    fn load(path: &Path) -> Result<Self> {
        load_bincode(path)
    }
}

impl Persistable for SavedModels {
    fn save(&self, path: &Path) -> Result<()> {
        save_bincode(self, path)
    }

    fn load(path: &Path) -> Result<Self> {
        load_bincode(path)
    }
}

impl Persistable for MissingLabelPredictions {
    fn save(&self, path: &Path) -> Result<()> {
        save_bincode(self, path)
    }

    fn load(path: &Path) -> Result<Self> {
        load_bincode(path)
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{sample_builder::build_sample_list, synthetic};

    #[test]
    fn test_sample_list_survives_disk() {
        let dir  = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("sample_list.pkl");
        let list = build_sample_list(&synthetic::dataset(4), true);

        list.save(&path).unwrap();
        assert_eq!(SampleList::load(&path).unwrap(), list);
    }

    #[test]
    fn test_garbage_file_fails_to_parse() {
        let dir  = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("sample_list.pkl");
        std::fs::write(&path, b"\x80\x04not bincode").unwrap();

        let err = SampleList::load(&path).unwrap_err();
        assert!(format!("{err}").starts_with("Cannot parse"));
    }
}
