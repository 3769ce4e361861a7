// ============================================================
// Layer 2 - Application / Use Cases
// ============================================================
// Workflow coordination only: no model math, no file formats.
// The use case tells the other layers what to do in which order.

// The training-and-evaluation workflow
pub mod train_use_case;
