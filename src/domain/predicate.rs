// ============================================================
// Layer 3 - Predicate Domain Types
// ============================================================
// One record per nominal predicate occurrence. Each predicate
// has a list of argument slots (arg0, arg1, ...) that may be
// filled implicitly by an entity mentioned elsewhere in the
// discourse, and a list of candidate fillers for those slots.
//
// Example (one JSON line on disk):
//   {"pred_id": "wsj_0012:4:7", "lemma": "sale",
//    "context": ["annual", "the"],
//    "candidates": [{"id": "c0", "head": "company", ...}],
//    "slots": [{"arg": "arg0", "fillers": ["c0"]},
//              {"arg": "arg1", "fillers": null}]}
//
// A slot whose `fillers` is null has no annotation at all:
// its samples carry a missing label and are only used for
// prediction, never for fitting or evaluation.

use serde::{Deserialize, Serialize};

/// A nominal predicate occurrence together with its candidates and slots.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredicateInstance {
    /// Unique identifier, conventionally `<doc>:<sentence>:<token>`
    pub pred_id: String,

    /// Lemma of the predicate noun (e.g. "sale", "investment")
    pub lemma: String,

    /// Up to three words preceding the predicate, nearest first
    #[serde(default)]
    pub context: Vec<String>,

    /// Entity mentions that may fill one of the slots
    #[serde(default)]
    pub candidates: Vec<Candidate>,

    /// Argument positions of this predicate
    #[serde(default)]
    pub slots: Vec<Slot>,
}

/// A candidate filler, usually a coreference chain mention.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    pub id: String,

    /// Head word of the mention
    pub head: String,

    /// Named-entity type, or "O" when the mention is not an entity
    #[serde(default = "default_entity_type")]
    pub entity_type: String,

    /// Dependency path from the mention to its governor
    #[serde(default)]
    pub dep_path: String,

    /// Sentence distance between the mention and the predicate
    #[serde(default)]
    pub sentence_dist: u32,
}

fn default_entity_type() -> String {
    "O".to_string()
}

/// An argument slot of a predicate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Slot {
    /// Argument label, e.g. "arg0"
    pub arg: String,

    /// Ids of the correct candidates.
    /// None → the slot was never annotated (missing label).
    /// Some(empty) → annotated, no candidate fills it.
    #[serde(default)]
    pub fillers: Option<Vec<String>>,
}

impl Slot {
    /// True when the slot carries an annotation (possibly empty).
    pub fn is_labeled(&self) -> bool {
        self.fillers.is_some()
    }

    /// Label of `candidate_id` for this slot, or None if unannotated.
    pub fn label_for(&self, candidate_id: &str) -> Option<bool> {
        self.fillers
            .as_ref()
            .map(|f| f.iter().any(|id| id == candidate_id))
    }
}

impl PredicateInstance {
    /// Look up a candidate by id
    pub fn candidate(&self, id: &str) -> Option<&Candidate> {
        self.candidates.iter().find(|c| c.id == id)
    }

    /// The context word at position `n` (1-based, nearest first)
    pub fn context_word(&self, n: usize) -> Option<&str> {
        n.checked_sub(1)
            .and_then(|i| self.context.get(i))
            .map(String::as_str)
    }
}
