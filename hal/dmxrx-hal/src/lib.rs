//! dmxrx Hardware Abstraction Layer
//!
//! This crate defines the narrow hardware boundary the DMX512 receiver core
//! depends on. Chip-specific code (the RP2040 firmware, host test doubles)
//! implements these traits; the core never touches a peripheral directly.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  Application (dmxrx-firmware)           │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  dmxrx-core (frame sync, store)         │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  dmxrx-hal (this crate - traits)        │
//! └─────────────────────────────────────────┘
//! ```
//!
//! # Traits
//!
//! - [`uart::TimedByteSource`] - Non-blocking source of timestamped bytes
//! - [`clock::Monotonic`] - Microsecond monotonic clock
//!
//! [`stamp::ArrivalStamper`] rebuilds break gaps for UARTs that deliver
//! bytes in bursts.

#![no_std]
#![deny(unsafe_code)]

pub mod clock;
pub mod stamp;
pub mod uart;

// Re-export key traits at crate root for convenience
pub use clock::Monotonic;
pub use stamp::ArrivalStamper;
pub use uart::{TimedByte, TimedByteSource, UartConfig, DMX_BAUDRATE};
