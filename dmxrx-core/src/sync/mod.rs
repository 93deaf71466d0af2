//! Frame synchronisation
//!
//! Recovers frame boundaries from a byte stream whose only delimiter is
//! the break. The transition table is explicit, finite, and deterministic.

pub mod machine;
pub mod synchronizer;

pub use machine::{SyncAction, SyncState};
pub use synchronizer::FrameSynchronizer;
