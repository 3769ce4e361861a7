use thiserror::Error;

/// Failures raised by the binary classifier itself.
///
/// I/O and parse failures travel as `anyhow::Error` with context;
/// this enum covers misuse of the classifier and bad parameters.
#[derive(Debug, Error)]
pub enum ClassifierError {
    #[error("classifier is not ready: call {0} first")]
    NotReady(&'static str),

    #[error("unknown featurizer '{0}' (expected one_hot or hash)")]
    UnknownFeaturizer(String),

    #[error("cannot split {predicates} predicates into {folds} folds")]
    TooFewPredicates { predicates: usize, folds: usize },

    #[error(
        "sample list refers to predicate {pred_idx} but the dataset has only {predicates}; \
         delete the cached sample list to rebuild it"
    )]
    StaleSampleList { pred_idx: usize, predicates: usize },

    #[error("no labeled samples to fit fold {0}")]
    EmptyTrainingSet(usize),
}
