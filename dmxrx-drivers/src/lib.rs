//! Output driver implementations
//!
//! Drivers that turn receiver state into something physical. They are
//! written against the `embedded-hal` 1.0 traits so they run unchanged on
//! the RP2040 and against host-side test doubles:
//!
//! - Dimmer (PWM brightness from a DMX level)
//! - Status indicator (LED blink cadence from link state)

#![no_std]
#![deny(unsafe_code)]

pub mod dimmer;
pub mod indicator;

pub use dimmer::Dimmer;
pub use indicator::StatusIndicator;
