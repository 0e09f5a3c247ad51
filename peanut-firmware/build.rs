//! Build script for peanut-firmware
//!
//! - Copies memory.x where the linker can find it
//! - Validates device.toml at compile time

use std::env;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

fn main() {
    setup_linker();
    validate_config();
}

/// Set up linker search paths for memory.x
fn setup_linker() {
    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());

    let memory_x = include_bytes!("memory.x");
    let mut f = File::create(out_dir.join("memory.x")).unwrap();
    f.write_all(memory_x).unwrap();

    println!("cargo:rustc-link-search={}", out_dir.display());
    println!("cargo:rustc-link-arg-bins=--nmagic");
    println!("cargo:rustc-link-arg-bins=-Tlink.x");
    println!("cargo:rustc-link-arg-bins=-Tdefmt.x");

    println!("cargo:rerun-if-changed=memory.x");
    println!("cargo:rerun-if-changed=build.rs");
}

/// Validate device.toml against the keys the firmware reads
fn validate_config() {
    println!("cargo:rerun-if-changed=device.toml");

    let config_path = Path::new("device.toml");

    if !config_path.exists() {
        panic!(
            "\n\
            ╔══════════════════════════════════════════════════════════════════╗\n\
            ║  ERROR: device.toml not found!                                   ║\n\
            ║                                                                  ║\n\
            ║  The firmware embeds device.toml at build time.                  ║\n\
            ║  Create one in the peanut-firmware directory.                    ║\n\
            ╚══════════════════════════════════════════════════════════════════╝\n"
        );
    }

    let content = match fs::read_to_string(config_path) {
        Ok(content) => content,
        Err(e) => {
            panic!(
                "\n\
                ╔══════════════════════════════════════════════════════════════════╗\n\
                ║  ERROR: Failed to read device.toml                               ║\n\
                ║                                                                  ║\n\
                ║  Error: {:<56} ║\n\
                ╚══════════════════════════════════════════════════════════════════╝\n",
                e
            );
        }
    };

    let config: toml::Value = match toml::from_str(&content) {
        Ok(value) => value,
        Err(e) => {
            panic!(
                "\n\
                ╔══════════════════════════════════════════════════════════════════╗\n\
                ║  ERROR: Invalid TOML syntax in device.toml                       ║\n\
                ╠══════════════════════════════════════════════════════════════════╣\n\
                {}\n\
                ╚══════════════════════════════════════════════════════════════════╝\n",
                format_error_lines(&e.to_string())
            );
        }
    };

    let mut errors = Vec::new();
    check_types(&config, &mut errors);
    check_relations(&config, &mut errors);

    if !errors.is_empty() {
        panic!(
            "\n\
            ╔══════════════════════════════════════════════════════════════════╗\n\
            ║  ERROR: Invalid device configuration                             ║\n\
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

    println!("cargo:warning=device.toml validated successfully");
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

/// Expected kind of every key, by section
const INTEGER_KEYS: &[(&str, &[(&str, i64)])] = &[
    ("bus", &[("display_hz", u32::MAX as i64), ("storage_hz", u32::MAX as i64)]),
    (
        "keypad",
        &[
            ("debounce_ms", u32::MAX as i64),
            ("long_press_ms", u32::MAX as i64),
            ("settle_us", u32::MAX as i64),
        ],
    ),
    (
        "display",
        &[
            ("width", u16::MAX as i64),
            ("height", u16::MAX as i64),
            ("min_width", u16::MAX as i64),
            ("min_height", u16::MAX as i64),
        ],
    ),
    ("graph", &[("margin_x", u16::MAX as i64), ("margin_y", u16::MAX as i64)]),
    (
        "performance",
        &[("target_fps", u32::MAX as i64), ("memory_reserve", u32::MAX as i64)],
    ),
    ("system", &[("main_loop_delay_ms", u32::MAX as i64)]),
];

/// Every known key holds an in-range integer, and `mode` a known preset
fn check_types(config: &toml::Value, errors: &mut Vec<String>) {
    for (section, keys) in INTEGER_KEYS {
        let table = match config.get(*section) {
            Some(toml::Value::Table(t)) => t,
            Some(_) => {
                errors.push(format!("[{}] must be a table", section));
                continue;
            }
            None => continue,
        };

        for (key, max) in *keys {
            match table.get(*key) {
                None => {}
                Some(toml::Value::Integer(v)) if (0..=*max).contains(v) => {}
                Some(toml::Value::Integer(_)) => {
                    errors.push(format!("[{}] {} must be 0-{}", section, key, max));
                }
                Some(_) => errors.push(format!("[{}] {} must be an integer", section, key)),
            }
        }
    }

    match lookup(config, "performance", "mode") {
        None => {}
        Some(toml::Value::String(mode)) => {
            if !["eco", "fast", "quality"].contains(&mode.as_str()) {
                errors.push("[performance] mode must be 'eco', 'fast', or 'quality'".to_string());
            }
        }
        Some(_) => errors.push("[performance] mode must be a string".to_string()),
    }
}

/// Cross-key rules, using the firmware defaults for anything left out
fn check_relations(config: &toml::Value, errors: &mut Vec<String>) {
    let int = |section: &str, key: &str, default: i64| {
        lookup(config, section, key)
            .and_then(toml::Value::as_integer)
            .unwrap_or(default)
    };

    if int("bus", "display_hz", 32_000_000) == 0 || int("bus", "storage_hz", 2_000_000) == 0 {
        errors.push("[bus] clock rates must be non-zero".to_string());
    }

    let debounce = int("keypad", "debounce_ms", 40);
    if debounce == 0 {
        errors.push("[keypad] debounce_ms must be non-zero".to_string());
    }
    if int("keypad", "long_press_ms", 600) <= debounce {
        errors.push("[keypad] long_press_ms must exceed debounce_ms".to_string());
    }

    let width = int("display", "width", 320);
    let height = int("display", "height", 240);
    let min_width = int("display", "min_width", 160);
    let min_height = int("display", "min_height", 120);
    if width == 0 || height == 0 || min_width == 0 || min_height == 0 {
        errors.push("[display] sizes must be non-zero".to_string());
    }
    if min_width > width || min_height > height {
        errors.push("[display] min size cannot exceed the native size".to_string());
    }
    if int("graph", "margin_x", 20) * 2 >= min_width || int("graph", "margin_y", 20) * 2 >= min_height {
        errors.push("[graph] margins leave no plot area at the min size".to_string());
    }

    if int("performance", "target_fps", 10) == 0 {
        errors.push("[performance] target_fps must be non-zero".to_string());
    }
}

fn lookup<'a>(config: &'a toml::Value, section: &str, key: &str) -> Option<&'a toml::Value> {
    config.get(section)?.get(key)
}
