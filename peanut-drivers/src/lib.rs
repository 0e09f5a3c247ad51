//! Hardware driver implementations
//!
//! Concrete drivers over the `peanut-hal` traits:
//!
//! - ILI9341 panel, reached through the shared bus arbiter
//! - GPIO keypad matrix

#![no_std]
#![deny(unsafe_code)]

#[cfg(test)]
extern crate std;

pub mod display;
pub mod keypad;
