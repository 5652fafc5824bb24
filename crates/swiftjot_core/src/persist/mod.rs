//! Debounced persistence of in-memory state.
//!
//! # Responsibility
//! - Coalesce bursts of mutations into one deferred write.
//! - Keep durable writes off the interactive thread.
//!
//! # Invariants
//! - At most one debounce timer is pending per scheduler.
//! - Writes happen one at a time, in the order their snapshots were taken.
//! - Write failures never propagate to callers.

mod scheduler;

pub use scheduler::{PersistenceScheduler, SnapshotWriter, SAVE_DEBOUNCE};
