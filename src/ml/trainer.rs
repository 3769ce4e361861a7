// ============================================================
// Layer 5 - Cross-Validation Loop
// ============================================================
// For each of the n_splits test folds:
//
//   1. pick the validation slots
//        use_val = true  → the next fold (cyclically) is held out
//        use_val = false → the training folds themselves
//   2. for every grid point, fit on the fitting folds and score
//      slot-level F1 on the validation slots
//   3. refit the best grid point on all training folds
//   4. evaluate the refitted model on the test fold
//
// Only labeled samples are used for fitting. Ties in validation
// F1 keep the earlier grid point.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::data::splitter::FoldPlan;
use crate::infra::metrics::Prf;
use crate::ml::error::ClassifierError;
use crate::ml::evaluation::evaluate;
use crate::ml::featurizer::SparseVector;
use crate::ml::index::SampleIndex;
use crate::ml::model::{ClassWeight, LogisticParams, LogisticRegression, SgdConfig};

/// Regularisation strengths searched on every fold
pub const C_GRID: [f64; 4] = [0.01, 0.1, 1.0, 10.0];

/// Positive-class weights searched when class weights are tuned
pub const POSITIVE_WEIGHT_GRID: [f64; 5] = [1.0, 2.0, 5.0, 10.0, 20.0];

/// Hyper-parameter search space.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HyperParameters {
    pub fit_intercept: bool,
    pub tune_w:        bool,
    pub grid:          Vec<LogisticParams>,
}

impl HyperParameters {
    pub fn new(fit_intercept: bool, tune_w: bool) -> Self {
        let weights: Vec<ClassWeight> = if tune_w {
            POSITIVE_WEIGHT_GRID.iter().map(|&w| ClassWeight::Positive(w)).collect()
        } else {
            vec![ClassWeight::Balanced]
        };

        let grid = C_GRID
            .iter()
            .flat_map(|&c| {
                weights.iter().map(move |&class_weight| LogisticParams {
                    c,
                    class_weight,
                    fit_intercept,
                })
            })
            .collect();

        Self { fit_intercept, tune_w, grid }
    }
}

/// Outcome of one test fold.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FoldResult {
    pub fold:    usize,
    pub params:  LogisticParams,
    pub val:     Prf,
    pub test:    Prf,
    pub per_arg: BTreeMap<String, Prf>,
}

/// Results and fitted models of a full cross-validation run.
#[derive(Debug, Clone, PartialEq)]
pub struct CrossValidation {
    pub folds:  Vec<FoldResult>,

    /// Refitted model per test fold, indexed by fold
    pub models: Vec<LogisticRegression>,
}

/// Shared, read-only inputs of every fit.
pub struct TrainingData<'a> {
    pub index:   &'a SampleIndex,
    pub vectors: &'a [SparseVector],
    pub labels:  &'a [Option<bool>],
    pub sgd:     SgdConfig,
}

impl TrainingData<'_> {
    /// Fit on the labeled samples of `folds`; `test` names the fold for errors.
    fn fit(
        &self,
        folds:  &[usize],
        params: LogisticParams,
        test:   usize,
    ) -> Result<LogisticRegression, ClassifierError> {
        let mut xs = Vec::new();
        let mut ys = Vec::new();
        for i in self.index.labeled_samples_in(folds) {
            if let Some(y) = self.labels[i] {
                xs.push(&self.vectors[i]);
                ys.push(y);
            }
        }
        if xs.is_empty() {
            return Err(ClassifierError::EmptyTrainingSet(test));
        }
        Ok(LogisticRegression::fit(&xs, &ys, params, &self.sgd))
    }
}

pub fn run_cross_validation(
    data:    &TrainingData<'_>,
    hyper:   &HyperParameters,
    use_val: bool,
    verbose: bool,
) -> Result<CrossValidation, ClassifierError> {
    let n_splits = data.index.n_splits;
    let mut folds  = Vec::with_capacity(n_splits);
    let mut models = Vec::with_capacity(n_splits);

    for test in 0..n_splits {
        let plan      = FoldPlan::new(test, n_splits, use_val);
        let fit_folds = plan.fit_folds();
        let val_folds = match plan.val {
            Some(v) => vec![v],
            None    => plan.train.clone(),
        };

        // ── Grid search ──────────────────────────────────────────────────────
        let mut best: Option<(LogisticParams, Prf)> = None;
        for &params in &hyper.grid {
            let model = data.fit(&fit_folds, params, test)?;
            let (val, _) = evaluate(&model, data.index.labeled_slots_in(&val_folds), data.vectors);

            if verbose {
                tracing::info!(
                    "fold {} | {} | val precision={:.4} recall={:.4} f1={:.4}",
                    test, params, val.precision(), val.recall(), val.f1(),
                );
            }

            if best.as_ref().map_or(true, |(_, b)| val.f1() > b.f1()) {
                best = Some((params, val));
            }
        }
        let (params, val) = best.ok_or(ClassifierError::NotReady("set_hyper_parameter"))?;

        // ── Refit and test ───────────────────────────────────────────────────
        let model = data.fit(&plan.train, params, test)?;
        let test_folds = [test];
        let (test_prf, per_arg) =
            evaluate(&model, data.index.labeled_slots_in(&test_folds), data.vectors);

        tracing::info!(
            "fold {} | best {} | test precision={:.4} recall={:.4} f1={:.4}",
            test, params, test_prf.precision(), test_prf.recall(), test_prf.f1(),
        );

        folds.push(FoldResult { fold: test, params, val, test: test_prf, per_arg });
        models.push(model);
    }

    Ok(CrossValidation { folds, models })
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::sample::{FeatureValue, Sample, SampleList};
    use crate::ml::featurizer::{Featurizer, FeaturizerKind};

    #[test]
    fn test_grid_sizes() {
        assert_eq!(HyperParameters::new(false, false).grid.len(), 4);
        assert_eq!(HyperParameters::new(true, true).grid.len(), 20);
        assert!(HyperParameters::new(true, false).grid.iter().all(|p| p.fit_intercept));
    }

    // Each predicate has two candidates; the "good" head always fills arg0.
    fn sample_list(n_preds: usize) -> SampleList {
        let mut samples = Vec::new();
        for p in 0..n_preds {
            for (cand, head) in [("good", "company"), ("bad", "weather")] {
                let mut features = std::collections::BTreeMap::new();
                features.insert("head".to_string(), FeatureValue::Str(head.into()));
                samples.push(Sample {
                    pred_idx:     p,
                    pred_id:      format!("p{p}"),
                    arg:          "arg0".into(),
                    candidate_id: cand.into(),
                    features,
                    label:        Some(cand == "good"),
                });
            }
        }
        SampleList::new(false, samples)
    }

    #[test]
    fn test_cross_validation_on_learnable_data() {
        let list    = sample_list(20);
        let index   = SampleIndex::build(&list, 20, 5).unwrap();
        let feat    = Featurizer::fit(FeaturizerKind::OneHot, &list.samples);
        let vectors = feat.transform_all(&list.samples);
        let labels: Vec<Option<bool>> = list.samples.iter().map(|s| s.label).collect();

        let data = TrainingData {
            index:   &index,
            vectors: &vectors,
            labels:  &labels,
            sgd:     SgdConfig::default(),
        };

        for use_val in [false, true] {
            let cv = run_cross_validation(&data, &HyperParameters::new(true, false), use_val, false).unwrap();
            assert_eq!(cv.folds.len(), 5);
            assert_eq!(cv.models.len(), 5);
            assert!(cv.folds.iter().all(|f| f.test.gold == 4));

            let tp: usize = cv.folds.iter().map(|f| f.test.tp).sum();
            assert!(tp >= 16, "only {tp} of 20 slots resolved (use_val={use_val})");
        }
    }
}
