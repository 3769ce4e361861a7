// ============================================================
// Layer 2 - TrainUseCase
// ============================================================
// Orchestrates one training run in this order:
//
//   Step 1:  Resolve the output directory and create it  (Layer 6 - infra)
//   Step 2:  Compute the filename suffix                  (Layer 6 - infra)
//   Step 3:  Build the logging configuration              (Layer 6 - infra)
//            ── installed by the CLI between prepare() and execute() ──
//   Step 4:  Construct the classifier (10 folds)          (Layer 5 - ml)
//   Step 5:  Load the dataset                             (Layer 4 - data)
//   Step 6:  Load or build the sample list                (Layer 6 - infra)
//   Step 7:  Index the sample list                        (Layer 5 - ml)
//   Step 8:  Featurize                                    (Layer 5 - ml)
//   Step 9:  Set hyper-parameters                         (Layer 5 - ml)
//   Step 10: Cross-validate                               (Layer 5 - ml)
//   Step 11: Report statistics (stdout or results file)
//   Step 12: Save models                        (optional)
//   Step 13: Predict missing labels             (optional)
//
// Every error propagates unchanged apart from added context.
// Nothing is retried and nothing is cleaned up on failure.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{
    fs::File,
    io::{self, BufWriter, Write},
    path::PathBuf,
};

use crate::data::dataset::ImplicitArgumentDataset;
use crate::infra::{
    layout::OutputLayout,
    logging::LogConfig,
    metrics::Prf,
    sample_cache::{CacheOutcome, SampleListStore},
};
use crate::ml::classifier::BinaryClassifier;

/// Number of cross-validation folds
pub const N_SPLITS: usize = 10;

// ─── Training Configuration ──────────────────────────────────────────────────
// Fixed for the lifetime of the process.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrainConfig {
    pub data_path:              PathBuf,
    pub use_list:               bool,
    pub featurizer:             String,
    pub fit_intercept:          bool,
    pub tune_w:                 bool,
    pub use_val:                bool,
    pub verbose:                bool,
    pub log_to_file:            bool,
    pub save_results:           bool,
    pub save_models:            bool,
    pub predict_missing_labels: bool,
}

impl Default for TrainConfig {
    fn default() -> Self {
        Self {
            data_path:              PathBuf::from("data"),
            use_list:               false,
            featurizer:             "one_hot".to_string(),
            fit_intercept:          false,
            tune_w:                 false,
            use_val:                false,
            verbose:                false,
            log_to_file:            false,
            save_results:           false,
            save_models:            false,
            predict_missing_labels: false,
        }
    }
}

/// What a finished run produced.
#[derive(Debug, Clone, PartialEq)]
pub struct RunSummary {
    pub cache:   CacheOutcome,
    pub overall: Prf,

    /// Files written besides the sample list and the log
    pub written: Vec<PathBuf>,
}

// ─── TrainUseCase ─────────────────────────────────────────────────────────────
pub struct TrainUseCase {
    config:   TrainConfig,
    n_splits: usize,
}

impl TrainUseCase {
    pub fn new(config: TrainConfig) -> Self {
        Self { config, n_splits: N_SPLITS }
    }

    /// Steps 1-2: resolve the output layout and create its directory.
    pub fn prepare(&self) -> Result<OutputLayout> {
        let layout = OutputLayout::resolve(&self.config);
        layout.ensure_dir()?;
        Ok(layout)
    }

    /// Step 3: logging configuration for this run
    pub fn log_config(&self, layout: &OutputLayout) -> LogConfig {
        if self.config.log_to_file {
            LogConfig::new().with_file(layout.log_path())
        } else {
            LogConfig::new()
        }
    }

    /// Steps 4-13.
    pub fn execute(&self, layout: &OutputLayout) -> Result<RunSummary> {
        let cfg = &self.config;
        let mut written = Vec::new();

        tracing::info!("Run suffix: {}", layout.suffix());

        // ── Step 4: Construct the classifier ─────────────────────────────────
        let mut classifier = BinaryClassifier::new(self.n_splits);

        // ── Step 5: Load the dataset ─────────────────────────────────────────
        let dataset_path = ImplicitArgumentDataset::default_path(&cfg.data_path);
        let dataset = ImplicitArgumentDataset::load(&dataset_path)?;
        classifier.read_dataset(dataset);

        // ── Step 6: Sample list, read-through cached ─────────────────────────
        let cache = SampleListStore::new(layout.sample_list_path())
            .load_or_build(&mut classifier, cfg.use_list)?;

        // ── Steps 7-10: Index, featurize, configure, cross-validate ──────────
        classifier.index_sample_list()?;
        classifier.preprocess_features(&cfg.featurizer)?;
        classifier.set_hyper_parameter(cfg.fit_intercept, cfg.tune_w);
        classifier.cross_validation(cfg.use_val, cfg.verbose)?;

        // ── Step 11: Report ──────────────────────────────────────────────────
        // The sink is dropped (and the file closed) at the end of this block.
        {
            let mut sink: Box<dyn Write> = if cfg.save_results {
                let path = layout.results_path();
                let file = File::create(&path).with_context(|| {
                    format!("Cannot create results file '{}'", path.display())
                })?;
                written.push(path);
                Box::new(BufWriter::new(file))
            } else {
                Box::new(io::stdout().lock())
            };
            classifier.print_stats(&mut *sink)?;
            sink.flush()?;
        }

        // ── Step 12: Save models ─────────────────────────────────────────────
        if cfg.save_models {
            let path = layout.model_path();
            classifier.save_models(&path)?;
            written.push(path);
        }

        // ── Step 13: Predict missing labels ──────────────────────────────────
        if cfg.predict_missing_labels {
            let path = layout.missing_labels_path();
            classifier.predict_missing_labels(&path)?;
            written.push(path);
        }

        let overall = classifier.stats()?.overall();
        tracing::info!(
            "Done: precision={:.4} recall={:.4} f1={:.4}",
            overall.precision(),
            overall.recall(),
            overall.f1(),
        );

        Ok(RunSummary { cache, overall, written })
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{dataset::DATASET_FILE, synthetic};
    use crate::domain::sample::SampleList;
    use crate::domain::traits::Persistable;
    use crate::ml::error::ClassifierError;
    use std::fs;
    use std::path::Path;
    use tempfile::TempDir;

    fn write_dataset(data_path: &Path, n: usize) {
        let path = data_path.join(DATASET_FILE);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        let lines: Vec<String> = synthetic::predicates(n)
            .iter()
            .map(|p| serde_json::to_string(p).unwrap())
            .collect();
        fs::write(path, lines.join("\n")).unwrap();
    }

    fn config(data_path: &Path) -> TrainConfig {
        TrainConfig { data_path: data_path.to_path_buf(), ..TrainConfig::default() }
    }

    #[test]
    fn test_full_run_writes_every_artifact() {
        let dir = TempDir::new().unwrap();
        write_dataset(dir.path(), 30);

        let cfg = TrainConfig {
            fit_intercept:          true,
            tune_w:                 true,
            save_results:           true,
            save_models:            true,
            predict_missing_labels: true,
            log_to_file:            true,
            ..config(dir.path())
        };
        let use_case = TrainUseCase::new(cfg);
        let layout   = use_case.prepare().unwrap();
        let summary  = use_case.execute(&layout).unwrap();

        assert_eq!(summary.cache, CacheOutcome::Built);
        assert_eq!(summary.overall.gold, 30);
        assert_eq!(summary.written.len(), 3);
        assert!(layout.sample_list_path().exists());
        assert!(layout.model_path().exists());
        assert!(layout.missing_labels_path().exists());

        let results = fs::read_to_string(layout.results_path()).unwrap();
        assert!(results.contains("overall"));
        assert!(layout
            .results_path()
            .ends_with("results-one_hot-intercept-tune_weight-use_train.txt"));

        assert_eq!(use_case.log_config(&layout).file(), Some(layout.log_path().as_path()));
    }

    #[test]
    fn test_second_run_reuses_cached_sample_list() {
        let dir = TempDir::new().unwrap();
        write_dataset(dir.path(), 20);

        let use_case = TrainUseCase::new(config(dir.path()));
        let layout   = use_case.prepare().unwrap();

        let first = use_case.execute(&layout).unwrap();
        let cached = SampleList::load(&layout.sample_list_path()).unwrap();
        let second = use_case.execute(&layout).unwrap();

        assert_eq!(first.cache, CacheOutcome::Built);
        assert_eq!(second.cache, CacheOutcome::Loaded);
        assert_eq!(first.overall, second.overall);
        assert_eq!(SampleList::load(&layout.sample_list_path()).unwrap(), cached);
        assert!(second.written.is_empty());
    }

    #[test]
    fn test_cache_from_larger_dataset_fails_cleanly() {
        let dir = TempDir::new().unwrap();
        write_dataset(dir.path(), 30);

        let use_case = TrainUseCase::new(config(dir.path()));
        let layout   = use_case.prepare().unwrap();
        use_case.execute(&layout).unwrap();

        write_dataset(dir.path(), 12);
        let err = use_case.execute(&layout).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ClassifierError>(),
            Some(ClassifierError::StaleSampleList { predicates: 12, .. })
        ));
    }

    #[test]
    fn test_missing_dataset_fails_after_directory_creation() {
        let dir = TempDir::new().unwrap();
        let use_case = TrainUseCase::new(TrainConfig { use_list: true, ..config(dir.path()) });

        let layout = use_case.prepare().unwrap();
        assert!(use_case.execute(&layout).is_err());
        assert!(layout.path_prefix().is_dir());
        assert!(layout.path_prefix().ends_with("list_features"));
    }

    #[test]
    fn test_unknown_featurizer_fails_run() {
        let dir = TempDir::new().unwrap();
        write_dataset(dir.path(), 12);

        let use_case = TrainUseCase::new(TrainConfig {
            featurizer: "bogus".into(),
            ..config(dir.path())
        });
        let layout = use_case.prepare().unwrap();
        let err = use_case.execute(&layout).unwrap_err();
        assert!(format!("{err}").contains("bogus"));

        // sample list is already cached when featurization fails
        assert!(layout.sample_list_path().exists());
    }

    #[test]
    fn test_unwritable_base_path_fails_prepare() {
        let dir  = TempDir::new().unwrap();
        let file = dir.path().join("not_a_dir");
        fs::write(&file, "x").unwrap();

        assert!(TrainUseCase::new(config(&file)).prepare().is_err());
    }
}
