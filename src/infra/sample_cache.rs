// ============================================================
// Layer 6 - Sample List Cache
// ============================================================
// Read-through cache for the enumerated sample list.
//
// If sample_list.pkl exists it is loaded as-is; otherwise the
// list is built from the dataset and written to the same path.
// There is no invalidation: deleting the file is the only way to
// force a rebuild after the dataset changes.
//
// The cached list remembers the use_list value it was built
// with. A mismatch is reported as a warning and the cached list
// is still used.

use anyhow::Result;
use std::path::PathBuf;

use crate::ml::classifier::BinaryClassifier;

/// Where the cache came from on this run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheOutcome {
    Loaded,
    Built,
}

pub struct SampleListStore {
    path: PathBuf,
}

impl SampleListStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Load the cached sample list into `classifier`, or build and save it.
    pub fn load_or_build(
        &self,
        classifier: &mut BinaryClassifier,
        use_list:   bool,
    ) -> Result<CacheOutcome> {
        if self.path.exists() {
            tracing::info!("Loading cached sample list from '{}'", self.path.display());
            classifier.load_sample_list(&self.path)?;

            if let Some(cached) = classifier.sample_list().map(|l| l.use_list) {
                if cached != use_list {
                    tracing::warn!(
                        "Sample list at '{}' was built with use_list={}, run uses use_list={}",
                        self.path.display(),
                        cached,
                        use_list,
                    );
                }
            }
            Ok(CacheOutcome::Loaded)
        } else {
            tracing::info!("Building sample list (use_list={})", use_list);
            classifier.build_sample_list(use_list, &self.path)?;
            Ok(CacheOutcome::Built)
        }
    }
}
