// ============================================================
// Layer 5 - Sample Index
// ============================================================
// Groups the flat sample list into argument slots and assigns
// each predicate to a cross-validation fold.
//
// A slot group holds the sample indices of every candidate for
// one (predicate, arg) pair. Evaluation works per slot: the
// classifier picks at most one candidate per slot.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::data::splitter::{assign_folds, FOLD_SEED};
use crate::domain::sample::SampleList;
use crate::ml::error::ClassifierError;

/// All candidate samples of one argument slot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SlotGroup {
    pub pred_idx: usize,
    pub pred_id:  String,
    pub arg:      String,

    /// Indices into the sample list, in candidate order
    pub samples: Vec<usize>,

    /// Positive sample indices, or None when the slot is unannotated
    pub gold: Option<Vec<usize>>,
}

impl SlotGroup {
    pub fn is_labeled(&self) -> bool {
        self.gold.is_some()
    }

    /// True when at least one candidate is a correct filler
    pub fn has_gold(&self) -> bool {
        self.gold.as_ref().is_some_and(|g| !g.is_empty())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SampleIndex {
    pub slots: Vec<SlotGroup>,

    /// Fold of every predicate, indexed by `pred_idx`
    pub pred_folds: Vec<usize>,

    pub n_splits: usize,
}

impl SampleIndex {
    /// Index `list`, whose samples refer to `n_predicates` predicates.
    pub fn build(
        list:         &SampleList,
        n_predicates: usize,
        n_splits:     usize,
    ) -> Result<Self, ClassifierError> {
        if n_predicates < n_splits {
            return Err(ClassifierError::TooFewPredicates {
                predicates: n_predicates,
                folds:      n_splits,
            });
        }

        let mut slots: Vec<SlotGroup> = Vec::new();
        let mut position: HashMap<(usize, &str), usize> = HashMap::new();

        for (i, sample) in list.samples.iter().enumerate() {
            if sample.pred_idx >= n_predicates {
                return Err(ClassifierError::StaleSampleList {
                    pred_idx:   sample.pred_idx,
                    predicates: n_predicates,
                });
            }

            let key = (sample.pred_idx, sample.arg.as_str());
            let pos = *position.entry(key).or_insert_with(|| {
                slots.push(SlotGroup {
                    pred_idx: sample.pred_idx,
                    pred_id:  sample.pred_id.clone(),
                    arg:      sample.arg.clone(),
                    samples:  Vec::new(),
                    gold:     sample.label.map(|_| Vec::new()),
                });
                slots.len() - 1
            });

            let slot = &mut slots[pos];
            slot.samples.push(i);
            if let (Some(gold), Some(true)) = (slot.gold.as_mut(), sample.label) {
                gold.push(i);
            }
        }

        let pred_folds = assign_folds(n_predicates, n_splits, FOLD_SEED);

        tracing::info!(
            "Indexed {} slots ({} labeled) over {} predicates into {} folds",
            slots.len(),
            slots.iter().filter(|s| s.is_labeled()).count(),
            n_predicates,
            n_splits,
        );

        Ok(Self { slots, pred_folds, n_splits })
    }

    pub fn fold_of(&self, slot: &SlotGroup) -> usize {
        self.pred_folds[slot.pred_idx]
    }

    /// Labeled slots whose predicate belongs to one of `folds`
    pub fn labeled_slots_in<'a>(
        &'a self,
        folds: &'a [usize],
    ) -> impl Iterator<Item = &'a SlotGroup> + 'a {
        self.slots
            .iter()
            .filter(move |s| s.is_labeled() && folds.contains(&self.fold_of(s)))
    }

    /// Sample indices of every labeled slot in `folds`
    pub fn labeled_samples_in(&self, folds: &[usize]) -> Vec<usize> {
        self.labeled_slots_in(folds)
            .flat_map(|s| s.samples.iter().copied())
            .collect()
    }

    pub fn missing_slots(&self) -> impl Iterator<Item = &SlotGroup> {
        self.slots.iter().filter(|s| !s.is_labeled())
    }
}
