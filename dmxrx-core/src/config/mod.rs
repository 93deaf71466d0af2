//! Configuration types
//!
//! Receiver timing, output mapping, and the fixture patch, plus a parser
//! for the TOML subset the firmware embeds.

pub mod parse;
pub mod types;

pub use parse::{parse_config, ParseError};
pub use types::*;
