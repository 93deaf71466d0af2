//! Build script for dmxrx-firmware
//!
//! - Sets up linker search paths for memory.x
//! - Validates receiver.toml at compile time, then checks that the
//!   firmware's own parser accepts it

use std::env;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Highest DMX512 slot address
const MAX_CHANNEL: i64 = 512;

fn main() {
    setup_linker();
    validate_config();
}

/// Set up linker search paths and scripts
fn setup_linker() {
    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());

    // Copy memory.x to the output directory
    let memory_x = include_bytes!("memory.x");
    let mut f = File::create(out_dir.join("memory.x")).unwrap();
    f.write_all(memory_x).unwrap();

    // Tell rustc where to find memory.x
    println!("cargo:rustc-link-search={}", out_dir.display());

    println!("cargo:rustc-link-arg-bins=--nmagic");
    println!("cargo:rustc-link-arg-bins=-Tlink.x");
    println!("cargo:rustc-link-arg-bins=-Tlink-rp.x");
    println!("cargo:rustc-link-arg-bins=-Tdefmt.x");

    // Re-run if memory.x changes
    println!("cargo:rerun-if-changed=memory.x");
    println!("cargo:rerun-if-changed=build.rs");
}

/// Validate receiver.toml configuration at compile time
fn validate_config() {
    println!("cargo:rerun-if-changed=receiver.toml");

    let config_path = Path::new("receiver.toml");

    if !config_path.exists() {
        panic!(
            "\n\
            ╔══════════════════════════════════════════════════════════════════╗\n\
            ║  ERROR: receiver.toml not found!                                 ║\n\
            ║                                                                  ║\n\
            ║  The firmware embeds a receiver.toml configuration file.         ║\n\
            ║  Please create one in the dmxrx-firmware directory.              ║\n\
            ╚══════════════════════════════════════════════════════════════════╝\n"
        );
    }

    let config_content = match fs::read_to_string(config_path) {
        Ok(content) => content,
        Err(e) => {
            panic!(
                "\n\
                ╔══════════════════════════════════════════════════════════════════╗\n\
                ║  ERROR: Failed to read receiver.toml                             ║\n\
                ║                                                                  ║\n\
                ║  Error: {:<56} ║\n\
                ╚══════════════════════════════════════════════════════════════════╝\n",
                e
            );
        }
    };

    let config: toml::Value = match toml::from_str(&config_content) {
        Ok(value) => value,
        Err(e) => {
            let error_msg = e.to_string();
            panic!(
                "\n\
                ╔══════════════════════════════════════════════════════════════════╗\n\
                ║  ERROR: Invalid TOML syntax in receiver.toml                     ║\n\
                ╠══════════════════════════════════════════════════════════════════╣\n\
                ║                                                                  ║\n\
                {}\n\
                ║                                                                  ║\n\
                ╚══════════════════════════════════════════════════════════════════╝\n",
                format_error_lines(&error_msg)
            );
        }
    };

    let mut errors = Vec::new();
    validate_sections(&config, &mut errors);
    validate_receiver(&config, &mut errors);
    validate_dimmer(&config, &mut errors);
    validate_indicator(&config, &mut errors);
    validate_fixtures(&config, &mut errors);

    if !errors.is_empty() {
        panic!(
            "\n\
            ╔══════════════════════════════════════════════════════════════════╗\n\
            ║  ERROR: Invalid receiver configuration                           ║\n\
            ╠══════════════════════════════════════════════════════════════════╣\n\
            {}\n\
            ╚══════════════════════════════════════════════════════════════════╝\n",
            errors
                .iter()
                .map(|e| format!("║  • {:<62} ║", e))
                .collect::<Vec<_>>()
                .join("\n")
        );
    }

    // The firmware falls back to defaults if its parser rejects the file
    if let Err(e) = dmxrx_core::config::parse_config(&config_content) {
        panic!(
            "\n\
            ╔══════════════════════════════════════════════════════════════════╗\n\
            ║  ERROR: receiver.toml rejected by the firmware config parser     ║\n\
            ╠══════════════════════════════════════════════════════════════════╣\n\
            ║  Error: {:<56} ║\n\
            ║                                                                  ║\n\
            ║  Integers must be plain decimal, strings double-quoted without   ║\n\
            ║  escapes, and only the documented sections and keys are used.    ║\n\
            ╚══════════════════════════════════════════════════════════════════╝\n",
            format!("{:?}", e)
        );
    }

    println!("cargo:warning=receiver.toml validated successfully");
}

/// Format error message lines with box drawing
fn format_error_lines(msg: &str) -> String {
    msg.lines()
        .map(|line| {
            let truncated = if line.len() > 64 {
                format!("{}...", &line[..61])
            } else {
                line.to_string()
            };
            format!("║  {:<64} ║", truncated)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Look up an optional integer key, recording an error if it has the wrong type
fn int_key(
    table: &toml::map::Map<String, toml::Value>,
    section: &str,
    key: &str,
    errors: &mut Vec<String>,
) -> Option<i64> {
    match table.get(key) {
        Some(toml::Value::Integer(v)) => Some(*v),
        Some(_) => {
            errors.push(format!("[{}] '{}' must be an integer", section, key));
            None
        }
        None => None,
    }
}

/// Record an error for every key not in `allowed`
fn check_keys(
    table: &toml::map::Map<String, toml::Value>,
    section: &str,
    allowed: &[&str],
    errors: &mut Vec<String>,
) {
    for key in table.keys() {
        if !allowed.contains(&key.as_str()) {
            errors.push(format!("[{}] unknown key '{}'", section, key));
        }
    }
}

/// Only the known top-level sections are allowed
fn validate_sections(config: &toml::Value, errors: &mut Vec<String>) {
    let Some(root) = config.as_table() else {
        return;
    };
    for name in root.keys() {
        if !["receiver", "dimmer", "indicator", "fixture"].contains(&name.as_str()) {
            errors.push(format!("Unknown section or key '{}'", name));
        }
    }
}

fn section_table<'a>(
    config: &'a toml::Value,
    name: &str,
    errors: &mut Vec<String>,
) -> Option<&'a toml::map::Map<String, toml::Value>> {
    match config.get(name) {
        Some(toml::Value::Table(t)) => Some(t),
        Some(_) => {
            errors.push(format!("[{}] must be a table", name));
            None
        }
        None => None,
    }
}

/// Validate the [receiver] timing section
fn validate_receiver(config: &toml::Value, errors: &mut Vec<String>) {
    let Some(receiver) = section_table(config, "receiver", errors) else {
        return;
    };
    check_keys(
        receiver,
        "receiver",
        &[
            "break_threshold_us",
            "liveness_window_ms",
            "stale_window_ms",
            "report_interval_ms",
        ],
        errors,
    );

    let brk = int_key(receiver, "receiver", "break_threshold_us", errors).unwrap_or(88);
    let live = int_key(receiver, "receiver", "liveness_window_ms", errors).unwrap_or(2000);
    let stale = int_key(receiver, "receiver", "stale_window_ms", errors).unwrap_or(5000);
    let report = int_key(receiver, "receiver", "report_interval_ms", errors).unwrap_or(1000);

    // DMX512 minimum break is 88 µs
    if !(88..=1_000_000).contains(&brk) {
        errors.push("[receiver] break_threshold_us must be 88-1000000".to_string());
    }
    if live <= 0 || stale <= 0 || report <= 0 {
        errors.push("[receiver] windows and intervals must be positive".to_string());
    }
    if stale < live {
        errors.push("[receiver] stale_window_ms must be >= liveness_window_ms".to_string());
    }
}

/// Validate the [dimmer] section
fn validate_dimmer(config: &toml::Value, errors: &mut Vec<String>) {
    let Some(dimmer) = section_table(config, "dimmer", errors) else {
        return;
    };
    check_keys(dimmer, "dimmer", &["channel"], errors);

    if let Some(ch) = int_key(dimmer, "dimmer", "channel", errors) {
        if !(1..=MAX_CHANNEL).contains(&ch) {
            errors.push("[dimmer] channel must be 1-512".to_string());
        }
    }
}

/// Validate the [indicator] section
fn validate_indicator(config: &toml::Value, errors: &mut Vec<String>) {
    let Some(indicator) = section_table(config, "indicator", errors) else {
        return;
    };
    check_keys(
        indicator,
        "indicator",
        &["connected_blink_ms", "disconnected_blink_ms"],
        errors,
    );

    for key in ["connected_blink_ms", "disconnected_blink_ms"] {
        if let Some(ms) = int_key(indicator, "indicator", key, errors) {
            if ms <= 0 {
                errors.push(format!("[indicator] {} must be positive", key));
            }
        }
    }
}

/// Validate fixture patch windows
fn validate_fixtures(config: &toml::Value, errors: &mut Vec<String>) {
    let Some(fixtures) = section_table(config, "fixture", errors) else {
        return;
    };

    if fixtures.len() > 8 {
        errors.push("At most 8 [fixture.*] sections are supported".to_string());
    }

    let mut labels: Vec<String> = Vec::new();

    for (name, fixture) in fixtures {
        let section = format!("fixture.{}", name);
        let fixture = match fixture {
            toml::Value::Table(t) => t,
            _ => {
                errors.push(format!("[{}] must be a table", section));
                continue;
            }
        };
        check_keys(fixture, &section, &["label", "address", "channels"], errors);

        let label = match fixture.get("label") {
            Some(toml::Value::String(s)) => s.clone(),
            Some(_) => {
                errors.push(format!("[{}] 'label' must be a string", section));
                continue;
            }
            None => name.clone(),
        };
        if label.len() > 16 {
            errors.push(format!("[{}] label longer than 16 bytes", section));
        }
        if labels.contains(&label) {
            errors.push(format!("[{}] duplicate label '{}'", section, label));
        }
        labels.push(label);

        let address = int_key(fixture, &section, "address", errors);
        let channels = int_key(fixture, &section, "channels", errors);

        match (address, channels) {
            (Some(address), Some(channels)) => {
                if !(1..=MAX_CHANNEL).contains(&address) {
                    errors.push(format!("[{}] address must be 1-512", section));
                }
                if !(1..=32).contains(&channels) {
                    errors.push(format!("[{}] channels must be 1-32", section));
                }
                if address + channels - 1 > MAX_CHANNEL {
                    errors.push(format!("[{}] footprint runs past channel 512", section));
                }
            }
            _ => errors.push(format!("[{}] needs 'address' and 'channels'", section)),
        }
    }
}
