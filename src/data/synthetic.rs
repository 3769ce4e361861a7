//! Small generated corpora for tests.

use crate::data::dataset::ImplicitArgumentDataset;
use crate::domain::predicate::{Candidate, PredicateInstance, Slot};

/// `n` predicates with three candidates each. The ORG candidate fills
/// arg0; every third predicate leaves arg1 unannotated.
pub fn predicates(n: usize) -> Vec<PredicateInstance> {
    (0..n)
        .map(|i| {
            let cand = |id: &str, head: &str, entity_type: &str, dist: u32| Candidate {
                id:            id.into(),
                head:          head.into(),
                entity_type:   entity_type.into(),
                dep_path:      if entity_type == "ORG" { "nsubj".into() } else { "pobj".into() },
                sentence_dist: dist,
            };
            let arg1 = if i % 3 == 0 { None } else { Some(Vec::new()) };
            PredicateInstance {
                pred_id:    format!("doc{}:{}:{}", i / 5, i % 5, 3),
                lemma:      if i % 2 == 0 { "sale".into() } else { "loan".into() },
                context:    vec!["annual".into(), "the".into()],
                candidates: vec![
                    cand(&format!("e{i}a"), "company", "ORG", 1),
                    cand(&format!("e{i}b"), "weather", "O", 2),
                    cand(&format!("e{i}c"), "year", "DATE", 0),
                ],
                slots: vec![
                    Slot { arg: "arg0".into(), fillers: Some(vec![format!("e{i}a")]) },
                    Slot { arg: "arg1".into(), fillers: arg1 },
                ],
            }
        })
        .collect()
}

pub fn dataset(n: usize) -> ImplicitArgumentDataset {
    ImplicitArgumentDataset::new(predicates(n))
}
