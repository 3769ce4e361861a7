// ============================================================
// Layer 1 - CLI Arguments
// ============================================================
// Flags keep their snake_case spelling (--use_list, --tune_w, ...)
// so existing run scripts keep working.
//
// The featurizer name is accepted as any string here; an unknown
// name is rejected when features are built.

use clap::Args;
use std::path::PathBuf;

use crate::application::train_use_case::TrainConfig;

/// All arguments of a training run.
#[derive(Args, Debug, Clone)]
pub struct TrainArgs {
    /// Build p_1_word / p_2_word / p_3_word as one list feature
    /// instead of three positional features
    #[arg(long = "use_list")]
    pub use_list: bool,

    /// Featurizer applied to all features: one_hot or hash
    #[arg(long = "featurizer", default_value = "one_hot")]
    pub featurizer: String,

    /// Add a constant intercept to the decision function
    #[arg(long = "fit_intercept")]
    pub fit_intercept: bool,

    /// Search for the best class weight instead of using balanced
    #[arg(long = "tune_w")]
    pub tune_w: bool,

    /// Hold out a separate fold for validation during cross
    /// validation instead of validating on all training folds
    #[arg(long = "use_val")]
    pub use_val: bool,

    /// Log results for every grid point on every fold
    #[arg(long = "verbose")]
    pub verbose: bool,

    /// Also write logs to log-<suffix>.log
    #[arg(long = "log_to_file")]
    pub log_to_file: bool,

    /// Write statistics to results-<suffix>.txt instead of stdout
    #[arg(long = "save_results")]
    pub save_results: bool,

    /// Save all trained models to model-<suffix>.pkl
    #[arg(long = "save_models")]
    pub save_models: bool,

    /// Save predicted labels of unannotated slots to
    /// missing_labels-<suffix>.pkl
    #[arg(long = "predict_missing_labels")]
    pub predict_missing_labels: bool,

    /// Base data directory
    #[arg(long = "data_path", env = "IMP_ARG_DATA_PATH", default_value = "data")]
    pub data_path: PathBuf,
}

/// Convert CLI TrainArgs into the application-layer TrainConfig.
/// The application layer never sees clap types.
impl From<TrainArgs> for TrainConfig {
    fn from(a: TrainArgs) -> Self {
        TrainConfig {
            data_path:              a.data_path,
            use_list:               a.use_list,
            featurizer:             a.featurizer,
            fit_intercept:          a.fit_intercept,
            tune_w:                 a.tune_w,
            use_val:                a.use_val,
            verbose:                a.verbose,
            log_to_file:            a.log_to_file,
            save_results:           a.save_results,
            save_models:            a.save_models,
            predict_missing_labels: a.predict_missing_labels,
        }
    }
}
