//! Minimal TOML parser for receiver configuration
//!
//! Handles only the subset the receiver needs and allocates nothing.
//!
//! Supported:
//! - `key = value` pairs (unsigned integer, quoted string)
//! - `[receiver]`, `[dimmer]`, `[indicator]` and `[fixture.<name>]` headers
//! - Underscore digit separators (`5_000`)
//! - Comments (`# ...`), whole-line or trailing
//!
//! NOT supported:
//! - Arrays, inline tables, floats, booleans
//! - Multi-line or escaped strings

use heapless::String;

use super::types::{Fixture, ReceiverConfig, MAX_LABEL_LEN};
use crate::frame::is_valid_channel;

/// Parse error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ParseError {
    /// Unknown or malformed section header
    InvalidSection,
    /// Unknown key, or a key outside any section
    InvalidKey,
    /// Value has the wrong type or is out of range
    InvalidValue,
    /// Too many fixtures (exceeded heapless capacity)
    TooManyItems,
    /// Fixture window does not fit the universe, or label is duplicated
    InvalidFixture,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Root,
    Receiver,
    Dimmer,
    Indicator,
    Fixture,
}

/// Parse TOML configuration into [`ReceiverConfig`]
///
/// Keys that are absent keep their defaults.
pub fn parse_config(input: &str) -> Result<ReceiverConfig, ParseError> {
    let mut config = ReceiverConfig::new();
    let mut section = Section::Root;
    let mut current_fixture: Option<Fixture> = None;

    for line in input.lines() {
        let line = strip_comment(line).trim();

        if line.is_empty() {
            continue;
        }

        if line.starts_with('[') && line.ends_with(']') {
            save_fixture(&mut config, &mut current_fixture)?;

            let header = line[1..line.len() - 1].trim();
            section = match header {
                "receiver" => Section::Receiver,
                "dimmer" => Section::Dimmer,
                "indicator" => Section::Indicator,
                _ => {
                    let name = header
                        .strip_prefix("fixture.")
                        .filter(|n| !n.is_empty())
                        .ok_or(ParseError::InvalidSection)?;
                    // Label defaults to the table name
                    current_fixture = Some(Fixture {
                        label: label_from(name)?,
                        ..Fixture::default()
                    });
                    Section::Fixture
                }
            };
            continue;
        }

        let (key, value) = line.split_once('=').ok_or(ParseError::InvalidKey)?;
        let key = key.trim();
        let value = value.trim();

        match section {
            Section::Root => return Err(ParseError::InvalidKey),
            Section::Receiver => {
                let timing = &mut config.timing;
                match key {
                    "break_threshold_us" => timing.break_threshold_us = parse_uint(value)?,
                    "liveness_window_ms" => timing.liveness_window_ms = parse_uint(value)?,
                    "stale_window_ms" => timing.stale_window_ms = parse_uint(value)?,
                    "report_interval_ms" => timing.report_interval_ms = parse_uint(value)?,
                    _ => return Err(ParseError::InvalidKey),
                }
            }
            Section::Dimmer => match key {
                "channel" => config.dimmer.channel = parse_u16(value)?,
                _ => return Err(ParseError::InvalidKey),
            },
            Section::Indicator => match key {
                "connected_blink_ms" => config.indicator.connected_blink_ms = parse_uint(value)?,
                "disconnected_blink_ms" => {
                    config.indicator.disconnected_blink_ms = parse_uint(value)?
                }
                _ => return Err(ParseError::InvalidKey),
            },
            Section::Fixture => {
                let fixture = current_fixture.as_mut().ok_or(ParseError::InvalidSection)?;
                match key {
                    "label" => fixture.label = label_from(parse_string(value)?)?,
                    "address" => fixture.address = parse_u16(value)?,
                    "channels" => fixture.channels = parse_u16(value)?,
                    _ => return Err(ParseError::InvalidKey),
                }
            }
        }
    }

    save_fixture(&mut config, &mut current_fixture)?;

    if !config.timing.is_valid() || !is_valid_channel(config.dimmer.channel) {
        return Err(ParseError::InvalidValue);
    }
    if config.indicator.connected_blink_ms == 0 || config.indicator.disconnected_blink_ms == 0 {
        return Err(ParseError::InvalidValue);
    }

    Ok(config)
}

/// Validate and append the fixture being built, if any
fn save_fixture(
    config: &mut ReceiverConfig,
    current: &mut Option<Fixture>,
) -> Result<(), ParseError> {
    let Some(fixture) = current.take() else {
        return Ok(());
    };
    if !fixture.is_valid() || config.find_fixture(&fixture.label).is_some() {
        return Err(ParseError::InvalidFixture);
    }
    config
        .fixtures
        .push(fixture)
        .map_err(|_| ParseError::TooManyItems)
}

/// Drop a trailing `# comment` that is not inside a string
fn strip_comment(line: &str) -> &str {
    let mut in_string = false;
    for (i, c) in line.char_indices() {
        match c {
            '"' => in_string = !in_string,
            '#' if !in_string => return &line[..i],
            _ => {}
        }
    }
    line
}

/// Parse an unsigned decimal integer, allowing `_` between digits
fn parse_uint(value: &str) -> Result<u32, ParseError> {
    if value.is_empty() || value.starts_with('_') || value.ends_with('_') {
        return Err(ParseError::InvalidValue);
    }
    let mut result: u32 = 0;
    for c in value.chars() {
        if c == '_' {
            continue;
        }
        let digit = c.to_digit(10).ok_or(ParseError::InvalidValue)?;
        result = result
            .checked_mul(10)
            .and_then(|r| r.checked_add(digit))
            .ok_or(ParseError::InvalidValue)?;
    }
    Ok(result)
}

fn parse_u16(value: &str) -> Result<u16, ParseError> {
    u16::try_from(parse_uint(value)?).map_err(|_| ParseError::InvalidValue)
}

/// Parse a double-quoted string without escapes
fn parse_string(value: &str) -> Result<&str, ParseError> {
    value
        .strip_prefix('"')
        .and_then(|v| v.strip_suffix('"'))
        .filter(|v| !v.contains('"'))
        .ok_or(ParseError::InvalidValue)
}

fn label_from(s: &str) -> Result<String<MAX_LABEL_LEN>, ParseError> {
    let mut label = String::new();
    label.push_str(s).map_err(|_| ParseError::InvalidValue)?;
    Ok(label)
}
