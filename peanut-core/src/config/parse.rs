//! Minimal TOML reader for `device.toml`
//!
//! Handles only what the device file uses:
//! - `[section]` headers
//! - `key = value` with integers (underscores allowed), booleans and
//!   quoted strings
//! - `#` comments, whole-line or trailing
//!
//! Keys and sections this build does not know are skipped so older
//! firmware can read newer files.

use crate::governor::PerformanceMode;

use super::types::{DeviceConfig, ValidationError};

/// Parse error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ParseError {
    /// Malformed section header
    InvalidSection,
    /// Line is neither a header nor `key = value`
    InvalidLine,
    /// Value has the wrong type or is out of range
    InvalidValue,
    /// Parsed cleanly but the values do not fit together
    Invalid(ValidationError),
}

impl From<ValidationError> for ParseError {
    fn from(e: ValidationError) -> Self {
        ParseError::Invalid(e)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Root,
    Bus,
    Keypad,
    Display,
    Graph,
    Performance,
    System,
    Unknown,
}

/// Parse and validate a device configuration
///
/// Anything not mentioned keeps its default.
pub fn parse_config(input: &str) -> Result<DeviceConfig, ParseError> {
    let mut config = DeviceConfig::default();
    let mut section = Section::Root;

    for line in input.lines() {
        let line = line.trim();

        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        if line.starts_with('[') {
            section = parse_section_header(line)?;
            continue;
        }

        let (key, value) = parse_key_value(line).ok_or(ParseError::InvalidLine)?;
        apply_value(section, key, value, &mut config)?;
    }

    config.validate()?;
    Ok(config)
}

fn parse_section_header(line: &str) -> Result<Section, ParseError> {
    let name = line
        .strip_prefix('[')
        .and_then(|rest| rest.split('#').next())
        .map(str::trim)
        .and_then(|rest| rest.strip_suffix(']'))
        .map(str::trim)
        .ok_or(ParseError::InvalidSection)?;

    if name.is_empty() {
        return Err(ParseError::InvalidSection);
    }

    Ok(match name {
        "bus" => Section::Bus,
        "keypad" => Section::Keypad,
        "display" => Section::Display,
        "graph" => Section::Graph,
        "performance" => Section::Performance,
        "system" => Section::System,
        _ => Section::Unknown,
    })
}

/// Split `key = value`, dropping a trailing comment outside quotes
fn parse_key_value(line: &str) -> Option<(&str, &str)> {
    let (key, value) = line.split_once('=')?;
    let key = key.trim();
    let mut value = value.trim();

    if let Some(hash) = value.find('#') {
        if value[..hash].matches('"').count() % 2 == 0 {
            value = value[..hash].trim();
        }
    }

    if key.is_empty() || value.is_empty() {
        return None;
    }
    Some((key, value))
}

fn apply_value(
    section: Section,
    key: &str,
    value: &str,
    config: &mut DeviceConfig,
) -> Result<(), ParseError> {
    match (section, key) {
        (Section::Bus, "display_hz") => config.bus.display_hz = parse_u32(value)?,
        (Section::Bus, "storage_hz") => config.bus.storage_hz = parse_u32(value)?,

        (Section::Keypad, "debounce_ms") => config.keypad.debounce_ms = parse_u32(value)?,
        (Section::Keypad, "long_press_ms") => config.keypad.long_press_ms = parse_u32(value)?,
        (Section::Keypad, "settle_us") => config.keypad.settle_us = parse_u32(value)?,

        (Section::Display, "width") => config.display.width = parse_u16(value)?,
        (Section::Display, "height") => config.display.height = parse_u16(value)?,
        (Section::Display, "min_width") => config.display.min_width = parse_u16(value)?,
        (Section::Display, "min_height") => config.display.min_height = parse_u16(value)?,

        (Section::Graph, "margin_x") => config.graph.margin_x = parse_u16(value)?,
        (Section::Graph, "margin_y") => config.graph.margin_y = parse_u16(value)?,

        (Section::Performance, "target_fps") => {
            config.performance.target_fps = parse_u32(value)?
        }
        (Section::Performance, "memory_reserve") => {
            config.performance.memory_reserve = parse_u32(value)?
        }
        (Section::Performance, "mode") => {
            config.performance.mode = PerformanceMode::from_name(parse_string(value)?)
                .ok_or(ParseError::InvalidValue)?
        }

        (Section::System, "main_loop_delay_ms") => {
            config.system.main_loop_delay_ms = parse_u32(value)?
        }

        _ => {}
    }
    Ok(())
}

/// Quoted string contents
fn parse_string(value: &str) -> Result<&str, ParseError> {
    value
        .strip_prefix('"')
        .and_then(|v| v.strip_suffix('"'))
        .ok_or(ParseError::InvalidValue)
}

/// Decimal integer; `_` separators allowed between digits
fn parse_u32(value: &str) -> Result<u32, ParseError> {
    if value.starts_with('_') || value.ends_with('_') || value.contains("__") {
        return Err(ParseError::InvalidValue);
    }

    let mut out: u32 = 0;
    let mut digits = 0;
    for c in value.chars().filter(|&c| c != '_') {
        let d = c.to_digit(10).ok_or(ParseError::InvalidValue)?;
        out = out
            .checked_mul(10)
            .and_then(|v| v.checked_add(d))
            .ok_or(ParseError::InvalidValue)?;
        digits += 1;
    }

    if digits == 0 {
        return Err(ParseError::InvalidValue);
    }
    Ok(out)
}

fn parse_u16(value: &str) -> Result<u16, ParseError> {
    u16::try_from(parse_u32(value)?).map_err(|_| ParseError::InvalidValue)
}
