//! Shared SPI bus arbitration
//!
//! The panel and the SD card hang off the same SPI controller but need
//! different clocks. [`BusArbiter`] owns the controller and both chip
//! selects; the only way to talk to either device is through a
//! [`BusLease`], which reclocks the bus if needed, selects the device, and
//! deselects it again when dropped.

mod arbiter;

pub use arbiter::{
    BusArbiter, BusLease, BusMode, BusProfile, HardwareFault, DISPLAY_HZ, STORAGE_HZ,
};
