// ============================================================
// Layer 3 - Sample Domain Types
// ============================================================
// A Sample pairs one argument slot of a predicate with one
// candidate filler. The binary classifier answers a single
// question per sample: does this candidate fill this slot?
//
// Raw features are kept symbolic (strings, string lists and
// numbers). A Featurizer (Layer 4) turns them into sparse
// numeric vectors once the featurizer name is known.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// The value of a single named raw feature.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum FeatureValue {
    /// Categorical value, one-hot encoded as `name=value`
    Str(String),

    /// Bag of categorical values, each encoded as `name=value`
    List(Vec<String>),

    /// Numeric value, encoded under `name` with its magnitude
    Num(f64),
}

/// One (predicate, slot, candidate) instance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    /// Position of the predicate in the dataset
    pub pred_idx: usize,

    pub pred_id: String,

    /// Argument label of the slot
    pub arg: String,

    pub candidate_id: String,

    /// Named raw features, ordered by name for stable encoding
    pub features: BTreeMap<String, FeatureValue>,

    /// Some(true/false) for annotated slots, None for missing labels
    pub label: Option<bool>,
}

impl Sample {
    pub fn is_labeled(&self) -> bool {
        self.label.is_some()
    }

    pub fn is_positive(&self) -> bool {
        self.label == Some(true)
    }
}

/// The full enumerated sample list plus the setting it was built with.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SampleList {
    /// Whether context words were emitted as a list feature
    pub use_list: bool,

    pub samples: Vec<Sample>,
}

impl SampleList {
    pub fn new(use_list: bool, samples: Vec<Sample>) -> Self {
        Self { use_list, samples }
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Number of samples with a known label
    pub fn labeled_count(&self) -> usize {
        self.samples.iter().filter(|s| s.is_labeled()).count()
    }

    /// Number of positive samples
    pub fn positive_count(&self) -> usize {
        self.samples.iter().filter(|s| s.is_positive()).count()
    }
}
