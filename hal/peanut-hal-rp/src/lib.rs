//! RP2350 implementations of the `peanut-hal` traits
//!
//! Thin adapters over `embassy-rp` peripherals:
//!
//! - [`spi::RpSpi`] - blocking SPI with runtime reclocking
//! - [`gpio::RpOutput`], [`gpio::RpInput`] - digital pins
//! - [`delay::BlockingDelay`] - busy-wait on the embassy time driver

#![no_std]
#![deny(unsafe_code)]

pub mod delay;
pub mod gpio;
pub mod spi;

pub use delay::BlockingDelay;
pub use gpio::{RpInput, RpOutput};
pub use spi::RpSpi;
