// ============================================================
// Layer 5 - Featurizers
// ============================================================
// Turns the symbolic features of a Sample into a sparse numeric
// vector. Every raw feature is first expanded into tokens:
//
//   Str("company")          → ("head=company", 1.0)
//   List(["the", "annual"]) → ("p_word=the", 1.0), ("p_word=annual", 1.0)
//   Num(2.0)                → ("sent_dist", 2.0)
//
// and tokens are then mapped to column indices by one of:
//
//   one_hot - a vocabulary fitted on the full sample list;
//             tokens outside the vocabulary are dropped
//   hash    - FxHasher modulo 2^20 columns, with the top hash
//             bit choosing the sign so collisions tend to cancel
//
// Reference: Weinberger et al. (2009) Feature Hashing

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::hash::Hasher;
use std::str::FromStr;

use rustc_hash::FxHasher;
use serde::{Deserialize, Serialize};

use crate::domain::sample::{FeatureValue, Sample};
use crate::ml::error::ClassifierError;

/// Number of hashed columns
pub const HASH_FEATURES: u32 = 1 << 20;

/// Which featurizer to fit, parsed from the `--featurizer` flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FeaturizerKind {
    OneHot,
    Hash,
}

impl FromStr for FeaturizerKind {
    type Err = ClassifierError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "one_hot" => Ok(Self::OneHot),
            "hash"    => Ok(Self::Hash),
            other     => Err(ClassifierError::UnknownFeaturizer(other.to_string())),
        }
    }
}

impl FeaturizerKind {
    /// The flag value naming this featurizer
    pub fn name(&self) -> &'static str {
        match self {
            Self::OneHot => "one_hot",
            Self::Hash   => "hash",
        }
    }
}

/// Sparse vector with strictly increasing column indices.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SparseVector {
    pub indices: Vec<u32>,
    pub values:  Vec<f64>,
}

impl SparseVector {
    /// Build from unordered (index, value) pairs, summing duplicates
    /// and dropping entries that end up zero.
    pub fn from_pairs(pairs: impl IntoIterator<Item = (u32, f64)>) -> Self {
        let mut merged: BTreeMap<u32, f64> = BTreeMap::new();
        for (i, v) in pairs {
            *merged.entry(i).or_insert(0.0) += v;
        }

        let mut out = Self::default();
        for (i, v) in merged {
            if v != 0.0 {
                out.indices.push(i);
                out.values.push(v);
            }
        }
        out
    }

    pub fn nnz(&self) -> usize {
        self.indices.len()
    }

    /// Value at column `col`, zero when absent
    pub fn get(&self, col: usize) -> f64 {
        u32::try_from(col)
            .ok()
            .and_then(|c| self.indices.binary_search(&c).ok())
            .map_or(0.0, |k| self.values[k])
    }

    pub fn iter(&self) -> impl Iterator<Item = (usize, f64)> + '_ {
        self.indices
            .iter()
            .zip(self.values.iter())
            .map(|(&i, &v)| (i as usize, v))
    }
}

/// A fitted featurizer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Featurizer {
    OneHot { vocab: HashMap<String, u32> },
    Hash { n_features: u32 },
}

impl Featurizer {
    /// Fit a featurizer of the given kind on `samples`.
    pub fn fit(kind: FeaturizerKind, samples: &[Sample]) -> Self {
        match kind {
            FeaturizerKind::OneHot => {
                // Sorted so column order does not depend on hash iteration
                let tokens: BTreeSet<String> = samples
                    .iter()
                    .flat_map(|s| tokens(&s.features))
                    .map(|(t, _)| t)
                    .collect();
                let vocab = tokens
                    .into_iter()
                    .enumerate()
                    .map(|(i, t)| (t, i as u32))
                    .collect();
                Self::OneHot { vocab }
            }
            FeaturizerKind::Hash => Self::Hash { n_features: HASH_FEATURES },
        }
    }

    pub fn kind(&self) -> FeaturizerKind {
        match self {
            Self::OneHot { .. } => FeaturizerKind::OneHot,
            Self::Hash { .. }   => FeaturizerKind::Hash,
        }
    }

    /// Number of columns produced by `transform`
    pub fn dim(&self) -> usize {
        match self {
            Self::OneHot { vocab }     => vocab.len(),
            Self::Hash { n_features }  => *n_features as usize,
        }
    }

    pub fn transform(&self, features: &BTreeMap<String, FeatureValue>) -> SparseVector {
        let toks = tokens(features);
        match self {
            Self::OneHot { vocab } => SparseVector::from_pairs(
                toks.into_iter()
                    .filter_map(|(t, v)| vocab.get(&t).map(|&i| (i, v))),
            ),
            Self::Hash { n_features } => SparseVector::from_pairs(
                toks.into_iter().map(|(t, v)| {
                    let h    = hash_token(&t);
                    let sign = if h >> 63 == 1 { -1.0 } else { 1.0 };
                    ((h % *n_features as u64) as u32, sign * v)
                }),
            ),
        }
    }

    pub fn transform_all(&self, samples: &[Sample]) -> Vec<SparseVector> {
        samples.iter().map(|s| self.transform(&s.features)).collect()
    }
}

fn tokens(features: &BTreeMap<String, FeatureValue>) -> Vec<(String, f64)> {
    let mut out = Vec::with_capacity(features.len());
    for (name, value) in features {
        match value {
            FeatureValue::Str(v)   => out.push((format!("{name}={v}"), 1.0)),
            FeatureValue::List(vs) => {
                out.extend(vs.iter().map(|v| (format!("{name}={v}"), 1.0)))
            }
            FeatureValue::Num(x)   => out.push((name.clone(), *x)),
        }
    }
    out
}

fn hash_token(token: &str) -> u64 {
    let mut h = FxHasher::default();
    h.write(token.as_bytes());
    h.finish()
}
