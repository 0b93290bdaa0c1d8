//! Undo history for planner edits.
//!
//! Each edit snapshots the folder's current models before it runs, by cloning
//! and archiving them. Confirming the edit pushes that snapshot onto a
//! bounded log; undoing deletes the live models and brings the snapshot back.
//!
//! ## Usage
//!
//! - **Ctrl+Z**: Undo the last confirmed edit
//!
//! Redo is not available: an undo discards the live models for good.
//!
//! ## Module Structure
//!
//! - [`model_history`] - `ModelHistory`, the undo log and pending cache
//! - [`scoped`] - `ScopedHistory`, a history that owns its store and clears on drop

mod model_history;
mod scoped;


// Re-exports
pub use model_history::{ModelHistory, RestoreOutcome};
#[allow(unused_imports)]
pub use model_history::Snapshot;
#[allow(unused_imports)]
pub use scoped::ScopedHistory;
