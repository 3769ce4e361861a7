// ============================================================
// Layer 4 - Sample Builder
// ============================================================
// Enumerates every (predicate, slot, candidate) triple of the
// dataset and attaches its raw symbolic features.
//
// Features per sample:
//   pred_lemma   predicate lemma
//   arg_label    slot label (arg0, arg1, ...)
//   pred_arg     lemma + slot label conjunction
//   head         candidate head word
//   entity_type  candidate entity type
//   dep_path     candidate dependency path
//   arg_head     slot label + head conjunction
//   sent_dist    sentence distance (numeric)
//
// Predicate context words come in two shapes:
//   use_list = false → p_1_word, p_2_word, p_3_word
//                      (position concatenated into the name)
//   use_list = true  → p_word = [w1, w2, w3]
//                      (one bag, position dropped)

use std::collections::BTreeMap;

use crate::data::dataset::ImplicitArgumentDataset;
use crate::domain::predicate::{Candidate, PredicateInstance, Slot};
use crate::domain::sample::{FeatureValue, Sample, SampleList};

/// Number of preceding context words turned into features
pub const CONTEXT_WINDOW: usize = 3;

/// Placeholder for context positions beyond the sentence start
pub const NO_WORD: &str = "<none>";

/// Build the full sample list from a dataset.
pub fn build_sample_list(dataset: &ImplicitArgumentDataset, use_list: bool) -> SampleList {
    let mut samples = Vec::new();

    for (pred_idx, pred) in dataset.predicates().iter().enumerate() {
        for slot in &pred.slots {
            for cand in &pred.candidates {
                samples.push(Sample {
                    pred_idx,
                    pred_id:      pred.pred_id.clone(),
                    arg:          slot.arg.clone(),
                    candidate_id: cand.id.clone(),
                    features:     extract_features(pred, slot, cand, use_list),
                    label:        slot.label_for(&cand.id),
                });
            }
        }
    }

    let list = SampleList::new(use_list, samples);
    if list.is_empty() {
        tracing::warn!("No samples built: no predicate has both slots and candidates");
    }
    tracing::info!(
        "Built {} samples ({} labeled, {} positive), use_list={}",
        list.len(),
        list.labeled_count(),
        list.positive_count(),
        use_list,
    );
    list
}

fn extract_features(
    pred:     &PredicateInstance,
    slot:     &Slot,
    cand:     &Candidate,
    use_list: bool,
) -> BTreeMap<String, FeatureValue> {
    let mut f = BTreeMap::new();
    let mut put = |name: &str, value: FeatureValue| {
        f.insert(name.to_string(), value);
    };

    put("pred_lemma",  FeatureValue::Str(pred.lemma.clone()));
    put("arg_label",   FeatureValue::Str(slot.arg.clone()));
    put("pred_arg",    FeatureValue::Str(format!("{}:{}", pred.lemma, slot.arg)));
    put("head",        FeatureValue::Str(cand.head.to_lowercase()));
    put("entity_type", FeatureValue::Str(cand.entity_type.clone()));
    put("dep_path",    FeatureValue::Str(cand.dep_path.clone()));
    put("arg_head",    FeatureValue::Str(format!("{}:{}", slot.arg, cand.head.to_lowercase())));
    put("sent_dist",   FeatureValue::Num(cand.sentence_dist as f64));

    let words: Vec<String> = (1..=CONTEXT_WINDOW)
        .map(|n| pred.context_word(n).unwrap_or(NO_WORD).to_lowercase())
        .collect();

    if use_list {
        put("p_word", FeatureValue::List(words));
    } else {
        for (i, w) in words.into_iter().enumerate() {
            put(&format!("p_{}_word", i + 1), FeatureValue::Str(w));
        }
    }

    f
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    fn dataset() -> ImplicitArgumentDataset {
        let cand = |id: &str, head: &str| Candidate {
            id:            id.into(),
            head:          head.into(),
            entity_type:   "ORG".into(),
            dep_path:      "nsubj".into(),
            sentence_dist: 1,
        };
        ImplicitArgumentDataset::new(vec![PredicateInstance {
            pred_id:    "d:0:3".into(),
            lemma:      "sale".into(),
            context:    vec!["annual".into(), "The".into()],
            candidates: vec![cand("c0", "Company"), cand("c1", "shares")],
            slots: vec![
                Slot { arg: "arg0".into(), fillers: Some(vec!["c0".into()]) },
                Slot { arg: "arg1".into(), fillers: None },
            ],
        }])
    }

    #[test]
    fn test_one_sample_per_slot_and_candidate() {
        let list = build_sample_list(&dataset(), false);
        assert_eq!(list.len(), 4);
        assert_eq!(list.labeled_count(), 2);
        assert_eq!(list.positive_count(), 1);

        let first = &list.samples[0];
        assert_eq!(first.arg, "arg0");
        assert_eq!(first.candidate_id, "c0");
        assert_eq!(first.label, Some(true));
        assert_eq!(list.samples[3].label, None);
    }

    #[test]
    fn test_concat_mode_uses_positional_features() {
        let list = build_sample_list(&dataset(), false);
        let f = &list.samples[0].features;

        assert_eq!(f.get("p_1_word"), Some(&FeatureValue::Str("annual".into())));
        assert_eq!(f.get("p_2_word"), Some(&FeatureValue::Str("the".into())));
        assert_eq!(f.get("p_3_word"), Some(&FeatureValue::Str(NO_WORD.into())));
        assert!(!f.contains_key("p_word"));
        assert_eq!(f.get("arg_head"), Some(&FeatureValue::Str("arg0:company".into())));
    }

    #[test]
    fn test_list_mode_uses_bag_feature() {
        let list = build_sample_list(&dataset(), true);
        assert!(list.use_list);

        let f = &list.samples[0].features;
        assert_eq!(
            f.get("p_word"),
            Some(&FeatureValue::List(vec!["annual".into(), "the".into(), NO_WORD.into()]))
        );
        assert!(!f.contains_key("p_1_word"));
    }
}
