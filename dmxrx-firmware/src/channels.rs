//! Inter-task communication channels
//!
//! Defines the static channels used for communication between Embassy tasks.
//! Uses embassy-sync primitives for safe async communication.

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;
use embassy_sync::signal::Signal;
use portable_atomic::AtomicU32;

use dmxrx_hal::TimedByte;

/// Byte queue capacity (two full frames plus slack)
pub const BYTE_QUEUE_SIZE: usize = 1100;

/// Timestamped bytes from the UART task to the receiver task
///
/// Single producer, single consumer. Bytes that do not fit are dropped
/// and counted in [`DROPPED_BYTES`].
pub static BYTE_QUEUE: Channel<CriticalSectionRawMutex, TimedByte, BYTE_QUEUE_SIZE> =
    Channel::new();

/// Bytes dropped because [`BYTE_QUEUE`] was full
pub static DROPPED_BYTES: AtomicU32 = AtomicU32::new(0);

/// Link status signal (updated by receiver task on change)
/// True while a frame completed within the liveness window
pub static LINK_STATUS: Signal<CriticalSectionRawMutex, bool> = Signal::new();

/// Dimmer level signal (updated by receiver task every tick)
/// None when the link is down
pub static DIMMER_LEVEL: Signal<CriticalSectionRawMutex, Option<u8>> = Signal::new();
