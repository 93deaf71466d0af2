//! Board-agnostic core logic for the DMX512 receiver
//!
//! This crate contains all protocol logic that does not depend on
//! specific hardware implementations:
//!
//! - Byte intake (inter-byte gap measurement)
//! - Frame synchronisation state machine (break, start code, 512 slots)
//! - Frame store with liveness and signal-loss tracking
//! - Fixture patch and change tracking
//! - Throttled frame reports
//! - Configuration types and parsing

#![no_std]
#![deny(unsafe_code)]

pub mod config;
pub mod frame;
pub mod intake;
pub mod patch;
pub mod receiver;
pub mod report;
pub mod store;
pub mod sync;

pub use receiver::DmxReceiver;
pub use store::{FrameStore, LinkEvent};
pub use sync::{FrameSynchronizer, SyncAction, SyncState};
