//! Embedded device configuration
//!
//! `device.toml` is compiled in and was already checked by build.rs, so a
//! parse failure here means the two validators disagree. The firmware still
//! boots on defaults in that case.

use defmt::*;
use peanut_core::config::{parse_config, DeviceConfig};

/// Edit device.toml and rebuild to customize
const EMBEDDED_CONFIG: &str = include_str!("../device.toml");

pub fn load() -> DeviceConfig {
    match parse_config(EMBEDDED_CONFIG) {
        Ok(config) => {
            info!(
                "Config: {}x{} panel, {} fps target, {} mode",
                config.display.width,
                config.display.height,
                config.performance.target_fps,
                config.performance.mode.name()
            );
            config
        }
        Err(e) => {
            warn!("device.toml rejected ({}), using defaults", e);
            DeviceConfig::default()
        }
    }
}
