//! Configuration loading
//!
//! The configuration is compiled in from receiver.toml (validated by
//! build.rs). Edit it and rebuild to customize.

use defmt::*;

use dmxrx_core::config::{parse_config, ReceiverConfig};

/// Embedded configuration
const EMBEDDED_CONFIG: &str = include_str!("../receiver.toml");

/// Parse the embedded configuration, falling back to defaults
pub fn load_config() -> ReceiverConfig {
    match parse_config(EMBEDDED_CONFIG) {
        Ok(config) => {
            info!(
                "Config: break>{}us live<{}ms stale>{}ms, {} fixtures",
                config.timing.break_threshold_us,
                config.timing.liveness_window_ms,
                config.timing.stale_window_ms,
                config.fixtures.len()
            );
            for fixture in &config.fixtures {
                debug!(
                    "Fixture '{}' at {}..={}",
                    fixture.label.as_str(),
                    fixture.address,
                    fixture.end_address()
                );
            }
            config
        }
        Err(e) => {
            error!("Failed to parse embedded config: {:?}", e);
            warn!("Using default configuration");
            ReceiverConfig::default()
        }
    }
}
