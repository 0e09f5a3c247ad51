//! Device configuration
//!
//! The firmware embeds a small `device.toml`; [`parse_config`] reads it
//! into a [`DeviceConfig`] and checks the values make sense together.

mod parse;
mod types;

pub use parse::{parse_config, ParseError};
pub use types::*;
