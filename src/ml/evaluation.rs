// ============================================================
// Layer 5 - Slot Evaluation
// ============================================================
// Decodes per-sample probabilities into one decision per slot
// and scores those decisions against gold annotations.
//
// Decoding: the highest-probability candidate of a slot is
// proposed if its probability reaches THRESHOLD, otherwise the
// slot is left empty.

use std::collections::BTreeMap;

use crate::infra::metrics::Prf;
use crate::ml::featurizer::SparseVector;
use crate::ml::index::SlotGroup;
use crate::ml::model::{LogisticRegression, THRESHOLD};

/// Best candidate of `slot` as (sample index, probability), if any clears the threshold.
pub fn predict_slot(
    model:   &LogisticRegression,
    slot:    &SlotGroup,
    vectors: &[SparseVector],
) -> Option<(usize, f64)> {
    slot.samples
        .iter()
        .map(|&i| (i, model.predict_proba(&vectors[i])))
        .fold(None, |best: Option<(usize, f64)>, cur| match best {
            Some(b) if b.1 >= cur.1 => Some(b),
            _ => Some(cur),
        })
        .filter(|&(_, p)| p >= THRESHOLD)
}

/// Score one decoded slot
pub fn score_slot(slot: &SlotGroup, predicted: Option<usize>) -> Prf {
    let gold = slot.gold.as_deref().unwrap_or(&[]);
    Prf::new(
        predicted.is_some_and(|i| gold.contains(&i)) as usize,
        predicted.is_some() as usize,
        slot.has_gold() as usize,
    )
}

/// Evaluate `model` on labeled `slots`, overall and per argument label.
pub fn evaluate<'a>(
    model:   &LogisticRegression,
    slots:   impl Iterator<Item = &'a SlotGroup>,
    vectors: &[SparseVector],
) -> (Prf, BTreeMap<String, Prf>) {
    let mut total   = Prf::default();
    let mut per_arg: BTreeMap<String, Prf> = BTreeMap::new();

    for slot in slots.filter(|s| s.is_labeled()) {
        let predicted = predict_slot(model, slot, vectors).map(|(i, _)| i);
        let m = score_slot(slot, predicted);
        total.add(&m);
        per_arg.entry(slot.arg.clone()).or_default().add(&m);
    }

    (total, per_arg)
}
