// ============================================================
// Layer 3 - Domain Layer
// ============================================================
// Plain Rust structs and traits describing the implicit
// argument problem:
//
//   PredicateInstance  - one annotated nominal predicate with
//                        its candidate fillers and argument slots
//   Sample             - one (predicate, slot, candidate) triple,
//                        the unit the binary classifier scores
//
// Rules for this layer:
//   - NO file I/O
//   - NO model or optimisation code
//   - Only plain data and the traits other layers implement

/// Annotated predicates, candidates and slots as read from disk
pub mod predicate;

/// Classifier samples and their raw feature values
pub mod sample;

/// Core abstractions (traits) that other layers implement
pub mod traits;
