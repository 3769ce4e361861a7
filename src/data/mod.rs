// ============================================================
// Layer 4 - Data Pipeline
// ============================================================
// From the annotation file to an enumerated sample list:
//
//   implicit_arguments.jsonl
//       │
//       ▼
//   JsonlLoader              → parses one predicate per line
//       │
//       ▼
//   ImplicitArgumentDataset  → validated corpus + summary counts
//       │
//       ▼
//   sample_builder           → (predicate, slot, candidate) samples
//       │
//       ▼
//   splitter                 → predicate-level fold assignment

/// Reads predicate records from JSON lines
pub mod loader;

/// The implicit argument corpus
pub mod dataset;

/// Sample enumeration and raw feature extraction
pub mod sample_builder;

/// Fold assignment for cross-validation
pub mod splitter;

#[cfg(test)]
pub mod synthetic;
