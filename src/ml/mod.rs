// ============================================================
// Layer 5 - ML / Model Layer
// ============================================================
// Everything between raw samples and trained models:
//
//   featurizer.rs  - one_hot / hash encoding into sparse vectors
//   model.rs       - class-weighted L2 logistic regression (SGD)
//   index.rs       - slot grouping and fold assignment
//   evaluation.rs  - per-slot decoding and precision/recall/F1
//   trainer.rs     - cross-validation with grid search
//   classifier.rs  - BinaryClassifier, the stateful facade the
//                    training driver calls step by step
//   error.rs       - ClassifierError
//
// Reference: Gerber & Chai (2010) Beyond NomBank

/// Classifier-level error type
pub mod error;

/// Feature encoders
pub mod featurizer;

/// Logistic regression model
pub mod model;

/// Slot groups and fold membership
pub mod index;

/// Slot-level decoding and scoring
pub mod evaluation;

/// Cross-validation loop
pub mod trainer;

/// The BinaryClassifier facade
pub mod classifier;
