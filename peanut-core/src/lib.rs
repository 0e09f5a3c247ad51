//! Board-agnostic core logic for the Peanut calculator firmware
//!
//! This crate contains all application logic that does not depend on
//! specific hardware implementations:
//!
//! - Hardware-facing traits (key matrix, evaluator contract, cooperation)
//! - Shared SPI bus arbitration between the panel and the SD card
//! - Keypad debouncing and tap/long-press classification
//! - 2D graph bounds, coordinate mapping and plotting
//! - 3D projection, surface meshing and the mesh cache
//! - Closed-loop render quality governor
//! - Interactive graph controls
//! - Configuration types and the `device.toml` parser
//!
//! Time is always passed in as milliseconds from the caller, so none of
//! this needs a clock and all of it runs under host tests.

#![no_std]
#![deny(unsafe_code)]

extern crate alloc;

#[cfg(test)]
extern crate std;

pub mod bus;
pub mod config;
pub mod controls;
pub mod geometry;
pub mod governor;
pub mod graph;
pub mod keypad;
pub mod plot3d;
pub mod traits;
