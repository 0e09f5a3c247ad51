//! Peanut Hardware Abstraction Layer
//!
//! Traits for the handful of peripherals the calculator core touches. Chip
//! crates (currently `peanut-hal-rp` for the RP2350) implement them, and the
//! board-agnostic logic in `peanut-core` only ever sees these traits, which
//! is what lets every scheduling and rendering rule run under host tests.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  Application (peanut-firmware)          │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  peanut-core / peanut-drivers           │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  peanut-hal (this crate - traits)       │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//!             ┌───────────────┐
//!             │ peanut-hal-rp │
//!             └───────────────┘
//! ```
//!
//! # Traits
//!
//! - [`gpio::OutputPin`], [`gpio::InputPin`] - Digital I/O
//! - [`spi::SpiBus`], [`spi::ConfigurableBus`] - SPI transfers and runtime reclocking
//! - [`delay::DelayUs`] - Short blocking delays
//! - [`memory::MemoryProbe`] - Free heap inspection

#![no_std]
#![deny(unsafe_code)]

pub mod delay;
pub mod gpio;
pub mod memory;
pub mod spi;

// Re-export key traits at crate root for convenience
pub use delay::DelayUs;
pub use gpio::{InputPin, OutputPin};
pub use memory::MemoryProbe;
pub use spi::{ConfigurableBus, SpiBus, SpiConfig};
