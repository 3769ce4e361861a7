// ============================================================
// Layer 3 - Core Traits (Abstractions)
// ============================================================
// The application layer programs against these traits so the
// concrete loaders and stores can be replaced (e.g. an
// in-memory source in tests).

use anyhow::Result;
use std::path::Path;

use crate::domain::predicate::PredicateInstance;

// ─── PredicateSource ──────────────────────────────────────────────────────────
/// Any component that can produce annotated predicate instances.
///
/// Implementations:
///   - JsonlLoader → one JSON record per line on disk
///   - Vec<PredicateInstance> → in-memory records
pub trait PredicateSource {
    /// Load every predicate instance from this source.
    fn load_all(&self) -> Result<Vec<PredicateInstance>>;
}

impl PredicateSource for Vec<PredicateInstance> {
    fn load_all(&self) -> Result<Vec<PredicateInstance>> {
        Ok(self.clone())
    }
}

// ─── Persistable ──────────────────────────────────────────────────────────────
/// Any component whose state can be saved and restored from disk.
///
/// Implementations:
///   - SampleList → the cached sample list
///   - SavedModels → trained fold models
pub trait Persistable: Sized {
    /// Save this component's state to the given path
    fn save(&self, path: &Path) -> Result<()>;

    /// Load a component's state from the given path
    fn load(path: &Path) -> Result<Self>;
}
