// ============================================================
// Layer 6 - Output Layout
// ============================================================
// Decides where every artifact of a run is written.
//
//   <data_path>/imp_arg_logit/binary_classifier/
//     concat_features/          ← use_list = false
//     list_features/            ← use_list = true
//       sample_list.pkl
//       log-<suffix>.log
//       results-<suffix>.txt
//       model-<suffix>.pkl
//       missing_labels-<suffix>.pkl
//
// The suffix encodes the four flags that change the trained
// models, so runs with different settings never overwrite each
// other's files:
//
//   <featurizer>-<intercept|no_intercept>-
//   <tune_weight|balanced_weight>-<use_val|use_train>
//
// The sample list depends only on use_list, which already picks
// the directory, so its name carries no suffix.

use anyhow::{Context, Result};
use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::application::train_use_case::TrainConfig;

/// Resolved output paths of one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputLayout {
    path_prefix: PathBuf,
    suffix:      String,
}

impl OutputLayout {
    /// Derive the layout from the configuration. Pure: touches no files.
    pub fn resolve(cfg: &TrainConfig) -> Self {
        Self {
            path_prefix: path_prefix(&cfg.data_path, cfg.use_list),
            suffix:      suffix(&cfg.featurizer, cfg.fit_intercept, cfg.tune_w, cfg.use_val),
        }
    }

    /// Create the output directory and its parents if missing.
    pub fn ensure_dir(&self) -> Result<()> {
        fs::create_dir_all(&self.path_prefix).with_context(|| {
            format!("Cannot create output directory '{}'", self.path_prefix.display())
        })?;
        tracing::debug!("Output directory: '{}'", self.path_prefix.display());
        Ok(())
    }

    pub fn path_prefix(&self) -> &Path {
        &self.path_prefix
    }

    pub fn suffix(&self) -> &str {
        &self.suffix
    }

    pub fn sample_list_path(&self) -> PathBuf {
        self.path_prefix.join("sample_list.pkl")
    }

    pub fn log_path(&self) -> PathBuf {
        self.path_prefix.join(format!("log-{}.log", self.suffix))
    }

    pub fn results_path(&self) -> PathBuf {
        self.path_prefix.join(format!("results-{}.txt", self.suffix))
    }

    pub fn model_path(&self) -> PathBuf {
        self.path_prefix.join(format!("model-{}.pkl", self.suffix))
    }

    pub fn missing_labels_path(&self) -> PathBuf {
        self.path_prefix.join(format!("missing_labels-{}.pkl", self.suffix))
    }
}

/// Output directory for the given base path and feature style
pub fn path_prefix(data_path: &Path, use_list: bool) -> PathBuf {
    data_path
        .join("imp_arg_logit")
        .join("binary_classifier")
        .join(if use_list { "list_features" } else { "concat_features" })
}

/// Filename suffix identifying a hyper-parameter configuration
pub fn suffix(featurizer: &str, fit_intercept: bool, tune_w: bool, use_val: bool) -> String {
    format!(
        "{}-{}-{}-{}",
        featurizer,
        if fit_intercept { "intercept" } else { "no_intercept" },
        if tune_w { "tune_weight" } else { "balanced_weight" },
        if use_val { "use_val" } else { "use_train" },
    )
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_suffix_examples() {
        assert_eq!(
            suffix("one_hot", true, true, false),
            "one_hot-intercept-tune_weight-use_train"
        );
        assert_eq!(
            suffix("one_hot", false, false, false),
            "one_hot-no_intercept-balanced_weight-use_train"
        );
    }

    #[test]
    fn test_suffixes_never_collide() {
        let mut seen = HashSet::new();
        for featurizer in ["one_hot", "hash"] {
            for bits in 0..8u8 {
                let s = suffix(featurizer, bits & 1 != 0, bits & 2 != 0, bits & 4 != 0);
                assert!(seen.insert(s));
            }
        }
        assert_eq!(seen.len(), 16);
    }

    #[test]
    fn test_path_prefix_follows_use_list() {
        let base = Path::new("/data");
        assert!(path_prefix(base, true).ends_with("imp_arg_logit/binary_classifier/list_features"));
        assert!(path_prefix(base, false).ends_with("imp_arg_logit/binary_classifier/concat_features"));
    }

    #[test]
    fn test_default_config_layout() {
        let cfg    = TrainConfig::default();
        let layout = OutputLayout::resolve(&cfg);

        assert!(layout.path_prefix().ends_with("concat_features"));
        assert_eq!(layout.suffix(), "one_hot-no_intercept-balanced_weight-use_train");
        assert_eq!(
            layout.results_path().file_name().unwrap(),
            "results-one_hot-no_intercept-balanced_weight-use_train.txt"
        );
        assert_eq!(layout.sample_list_path().file_name().unwrap(), "sample_list.pkl");
    }

    #[test]
    fn test_ensure_dir_creates_parents() {
        let dir = tempfile::TempDir::new().unwrap();
        let cfg = TrainConfig { data_path: dir.path().join("nested"), ..TrainConfig::default() };
        let layout = OutputLayout::resolve(&cfg);

        assert!(!layout.path_prefix().exists());
        layout.ensure_dir().unwrap();
        assert!(layout.path_prefix().is_dir());

        // second call is a no-op
        layout.ensure_dir().unwrap();
    }
}
