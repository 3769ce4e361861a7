use anyhow::Result;
use std::path::{Path, PathBuf};

use crate::data::loader::JsonlLoader;
use crate::domain::predicate::PredicateInstance;
use crate::domain::traits::PredicateSource;

/// Dataset file location relative to the base data path.
pub const DATASET_FILE: &str = "imp_arg/implicit_arguments.jsonl";

/// All annotated predicate instances of the implicit argument corpus.
#[derive(Debug, Clone, Default)]
pub struct ImplicitArgumentDataset {
    predicates: Vec<PredicateInstance>,
}

/// Corpus-level counts reported after loading.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DatasetSummary {
    pub predicates:     usize,
    pub slots:          usize,
    pub labeled_slots:  usize,
    pub missing_slots:  usize,
    pub candidates:     usize,
}

impl ImplicitArgumentDataset {
    pub fn new(predicates: Vec<PredicateInstance>) -> Self {
        let dataset = Self { predicates };
        dataset.check_fillers();
        dataset
    }

    /// Default dataset path under a base data directory
    pub fn default_path(data_path: &Path) -> PathBuf {
        data_path.join(DATASET_FILE)
    }

    /// Load from a JSON-lines file
    pub fn load(path: impl Into<PathBuf>) -> Result<Self> {
        Self::from_source(&JsonlLoader::new(path))
    }

    pub fn from_source(source: &impl PredicateSource) -> Result<Self> {
        let dataset = Self::new(source.load_all()?);
        if dataset.is_empty() {
            tracing::warn!("Dataset contains no predicate instances");
        }
        let s = dataset.summary();
        tracing::info!(
            "Loaded {} predicates: {} slots ({} labeled, {} missing), {} candidates",
            s.predicates, s.slots, s.labeled_slots, s.missing_slots, s.candidates,
        );
        Ok(dataset)
    }

    pub fn predicates(&self) -> &[PredicateInstance] {
        &self.predicates
    }

    pub fn len(&self) -> usize {
        self.predicates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.predicates.is_empty()
    }

    pub fn summary(&self) -> DatasetSummary {
        let mut s = DatasetSummary {
            predicates: self.predicates.len(),
            ..Default::default()
        };
        for pred in &self.predicates {
            s.slots      += pred.slots.len();
            s.candidates += pred.candidates.len();
            for slot in &pred.slots {
                if slot.is_labeled() {
                    s.labeled_slots += 1;
                } else {
                    s.missing_slots += 1;
                }
            }
        }
        s
    }

    // Gold fillers pointing at unknown candidates are kept; they only cost recall.
    fn check_fillers(&self) {
        for pred in &self.predicates {
            for slot in &pred.slots {
                for id in slot.fillers.iter().flatten() {
                    if pred.candidate(id).is_none() {
                        tracing::warn!(
                            "{} {}: gold filler '{}' is not among the candidates",
                            pred.pred_id, slot.arg, id
                        );
                    }
                }
            }
        }
    }
}
