// ============================================================
// Layer 5 - Binary Classifier
// ============================================================
// Owns every piece of state the training driver threads through
// a run. Steps must be called in this order:
//
//   read_dataset
//   load_sample_list | build_sample_list
//   index_sample_list
//   preprocess_features
//   set_hyper_parameter
//   cross_validation
//   print_stats / save_models / predict_missing_labels
//
// Calling a step early fails with ClassifierError::NotReady
// naming the step that has to come first.

use anyhow::Result;
use std::collections::BTreeMap;
use std::io::Write;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::data::dataset::ImplicitArgumentDataset;
use crate::data::sample_builder;
use crate::domain::sample::SampleList;
use crate::domain::traits::Persistable;
use crate::infra::metrics::{FoldRow, Prf, StatsReport};
use crate::ml::error::ClassifierError;
use crate::ml::evaluation::predict_slot;
use crate::ml::featurizer::{Featurizer, FeaturizerKind, SparseVector};
use crate::ml::index::SampleIndex;
use crate::ml::model::{LogisticParams, LogisticRegression, SgdConfig};
use crate::ml::trainer::{run_cross_validation, CrossValidation, HyperParameters, TrainingData};

/// One refitted model, tagged with the fold it was tested on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FoldModel {
    pub fold:   usize,
    pub params: LogisticParams,
    pub model:  LogisticRegression,
}

/// Everything needed to reuse the trained models on new samples.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedModels {
    pub featurizer: Featurizer,
    pub hyper:      HyperParameters,

    /// Fold of every predicate, indexed by predicate position
    pub pred_folds: Vec<usize>,
    pub folds:      Vec<FoldModel>,
}

/// A predicted filler for an unannotated slot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictedFiller {
    pub candidate_id: String,
    pub probability:  f64,
}

/// pred_id → arg → predicted filler (None when no candidate clears the threshold)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MissingLabelPredictions(pub BTreeMap<String, BTreeMap<String, Option<PredictedFiller>>>);

impl MissingLabelPredictions {
    pub fn slot_count(&self) -> usize {
        self.0.values().map(BTreeMap::len).sum()
    }

    pub fn filled_count(&self) -> usize {
        self.0.values().flat_map(BTreeMap::values).filter(|f| f.is_some()).count()
    }
}

pub struct BinaryClassifier {
    n_splits:    usize,
    sgd:         SgdConfig,
    dataset:     Option<ImplicitArgumentDataset>,
    sample_list: Option<SampleList>,
    index:       Option<SampleIndex>,
    featurizer:  Option<Featurizer>,
    vectors:     Vec<SparseVector>,
    hyper:       Option<HyperParameters>,
    results:     Option<CrossValidation>,
}

impl BinaryClassifier {
    pub fn new(n_splits: usize) -> Self {
        Self {
            n_splits,
            sgd:         SgdConfig::default(),
            dataset:     None,
            sample_list: None,
            index:       None,
            featurizer:  None,
            vectors:     Vec::new(),
            hyper:       None,
            results:     None,
        }
    }

    pub fn read_dataset(&mut self, dataset: ImplicitArgumentDataset) {
        self.dataset = Some(dataset);
    }

    pub fn sample_list(&self) -> Option<&SampleList> {
        self.sample_list.as_ref()
    }

    pub fn load_sample_list(&mut self, path: &Path) -> Result<()> {
        let list = SampleList::load(path)?;
        tracing::info!("Loaded {} samples from '{}'", list.len(), path.display());
        self.sample_list = Some(list);
        Ok(())
    }

    pub fn build_sample_list(&mut self, use_list: bool, save_path: &Path) -> Result<()> {
        let dataset = self.dataset.as_ref().ok_or(ClassifierError::NotReady("read_dataset"))?;
        let list = sample_builder::build_sample_list(dataset, use_list);
        list.save(save_path)?;
        self.sample_list = Some(list);
        Ok(())
    }

    pub fn index_sample_list(&mut self) -> Result<()> {
        let dataset = self.dataset.as_ref().ok_or(ClassifierError::NotReady("read_dataset"))?;
        let list = self.sample_list.as_ref().ok_or(ClassifierError::NotReady("build_sample_list"))?;
        self.index = Some(SampleIndex::build(list, dataset.len(), self.n_splits)?);
        Ok(())
    }

    /// Fit the named featurizer and transform every sample.
    pub fn preprocess_features(&mut self, featurizer: &str) -> Result<()> {
        self.index.as_ref().ok_or(ClassifierError::NotReady("index_sample_list"))?;
        let list = self.sample_list.as_ref().ok_or(ClassifierError::NotReady("build_sample_list"))?;

        let kind: FeaturizerKind = featurizer.parse()?;
        let fitted = Featurizer::fit(kind, &list.samples);
        self.vectors = fitted.transform_all(&list.samples);

        tracing::info!(
            "Featurized {} samples with {} ({} columns)",
            self.vectors.len(),
            featurizer,
            fitted.dim(),
        );
        self.featurizer = Some(fitted);
        Ok(())
    }

    pub fn set_hyper_parameter(&mut self, fit_intercept: bool, tune_w: bool) {
        let hyper = HyperParameters::new(fit_intercept, tune_w);
        tracing::info!(
            "Hyper-parameters: fit_intercept={}, tune_w={}, {} grid points",
            fit_intercept, tune_w, hyper.grid.len()
        );
        self.hyper = Some(hyper);
    }

    pub fn cross_validation(&mut self, use_val: bool, verbose: bool) -> Result<()> {
        let index      = self.index.as_ref().ok_or(ClassifierError::NotReady("index_sample_list"))?;
        self.featurizer.as_ref().ok_or(ClassifierError::NotReady("preprocess_features"))?;
        let hyper      = self.hyper.as_ref().ok_or(ClassifierError::NotReady("set_hyper_parameter"))?;
        let list       = self.sample_list.as_ref().ok_or(ClassifierError::NotReady("build_sample_list"))?;

        let labels: Vec<Option<bool>> = list.samples.iter().map(|s| s.label).collect();
        let data = TrainingData {
            index,
            vectors: &self.vectors,
            labels:  &labels,
            sgd:     self.sgd,
        };

        tracing::info!(
            "Running {}-fold cross validation (use_val={}, verbose={})",
            self.n_splits, use_val, verbose
        );
        self.results = Some(run_cross_validation(&data, hyper, use_val, verbose)?);
        Ok(())
    }

    /// Assemble the statistics report of the last cross-validation run
    pub fn stats(&self) -> Result<StatsReport> {
        let results    = self.results()?;
        let featurizer = self.featurizer.as_ref().ok_or(ClassifierError::NotReady("preprocess_features"))?;
        let hyper      = self.hyper.as_ref().ok_or(ClassifierError::NotReady("set_hyper_parameter"))?;

        let mut per_arg: BTreeMap<String, Prf> = BTreeMap::new();
        for fold in &results.folds {
            for (arg, prf) in &fold.per_arg {
                per_arg.entry(arg.clone()).or_default().add(prf);
            }
        }

        Ok(StatsReport {
            header: format!(
                "featurizer={}, fit_intercept={}, tune_w={}, n_splits={}, grid_points={}",
                featurizer.kind().name(), hyper.fit_intercept, hyper.tune_w, self.n_splits, hyper.grid.len(),
            ),
            folds: results
                .folds
                .iter()
                .map(|f| FoldRow {
                    fold:         f.fold,
                    c:            f.params.c,
                    class_weight: f.params.class_weight.to_string(),
                    val:          f.val,
                    test:         f.test,
                })
                .collect(),
            per_arg,
        })
    }

    pub fn print_stats(&self, out: &mut dyn Write) -> Result<()> {
        self.stats()?.write_to(out)
    }

    pub fn save_models(&self, path: &Path) -> Result<()> {
        let results = self.results()?;
        let index   = self.index.as_ref().ok_or(ClassifierError::NotReady("index_sample_list"))?;

        let saved = SavedModels {
            featurizer: self.featurizer.clone().ok_or(ClassifierError::NotReady("preprocess_features"))?,
            hyper:      self.hyper.clone().ok_or(ClassifierError::NotReady("set_hyper_parameter"))?,
            pred_folds: index.pred_folds.clone(),
            folds: results
                .folds
                .iter()
                .zip(&results.models)
                .map(|(f, m)| FoldModel { fold: f.fold, params: f.params, model: m.clone() })
                .collect(),
        };
        saved.save(path)?;
        tracing::info!("Saved {} fold models to '{}'", saved.folds.len(), path.display());
        Ok(())
    }

    /// Predict a filler for every unannotated slot using the model of the
    /// fold its predicate was held out in, and persist the mapping.
    pub fn predict_missing_labels(&self, save_path: &Path) -> Result<MissingLabelPredictions> {
        let results = self.results()?;
        let index   = self.index.as_ref().ok_or(ClassifierError::NotReady("index_sample_list"))?;
        let list    = self.sample_list.as_ref().ok_or(ClassifierError::NotReady("build_sample_list"))?;

        let mut predictions = MissingLabelPredictions::default();
        for slot in index.missing_slots() {
            let model  = &results.models[index.fold_of(slot)];
            let filler = predict_slot(model, slot, &self.vectors).map(|(i, p)| PredictedFiller {
                candidate_id: list.samples[i].candidate_id.clone(),
                probability:  p,
            });
            predictions
                .0
                .entry(slot.pred_id.clone())
                .or_default()
                .insert(slot.arg.clone(), filler);
        }

        predictions.save(save_path)?;
        tracing::info!(
            "Predicted {} of {} missing slots, saved to '{}'",
            predictions.filled_count(),
            predictions.slot_count(),
            save_path.display(),
        );
        Ok(predictions)
    }

    fn results(&self) -> Result<&CrossValidation, ClassifierError> {
        self.results.as_ref().ok_or(ClassifierError::NotReady("cross_validation"))
    }
}
