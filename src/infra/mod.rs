// ============================================================
// Layer 6 - Infrastructure Layer
// ============================================================
// Cross-cutting concerns used by the other layers:
//
//   layout.rs        - output directory, filename suffix and the
//                      path of every artifact of a run
//
//   artifacts.rs     - bincode persistence of the sample list,
//                      fold models and missing-label predictions
//
//   sample_cache.rs  - read-through cache for the sample list
//
//   metrics.rs       - precision / recall / F1 counters and the
//                      plain-text statistics report
//
//   logging.rs       - tracing subscriber setup, optionally
//                      teeing into a log file

/// Output paths derived from the run configuration
pub mod layout;

/// Binary persistence of run artifacts
pub mod artifacts;

/// Sample list load-or-build cache
pub mod sample_cache;

/// Evaluation counters and the statistics report
pub mod metrics;

/// Logging configuration
pub mod logging;
