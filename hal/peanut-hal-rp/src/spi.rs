//! Blocking SPI controller
//!
//! The controller is shared by the panel and the SD card, so the arbiter
//! reclocks it between devices through [`ConfigurableBus::reconfigure`].

use embassy_rp::spi::{self, Blocking, Instance, Spi};
use peanut_hal::spi::{Phase, Polarity};
use peanut_hal::{ConfigurableBus, SpiBus, SpiConfig};

/// Translate the board-agnostic settings into the embassy form
pub fn embassy_config(config: &SpiConfig) -> spi::Config {
    let mut out = spi::Config::default();
    out.frequency = config.frequency;
    out.polarity = match config.polarity {
        Polarity::IdleLow => spi::Polarity::IdleLow,
        Polarity::IdleHigh => spi::Polarity::IdleHigh,
    };
    out.phase = match config.phase {
        Phase::CaptureOnFirstTransition => spi::Phase::CaptureOnFirstTransition,
        Phase::CaptureOnSecondTransition => spi::Phase::CaptureOnSecondTransition,
    };
    out
}

/// SPI controller in blocking mode
pub struct RpSpi<'d, T: Instance> {
    spi: Spi<'d, T, Blocking>,
}

impl<'d, T: Instance> RpSpi<'d, T> {
    pub fn new(spi: Spi<'d, T, Blocking>) -> Self {
        Self { spi }
    }
}

impl<T: Instance> SpiBus for RpSpi<'_, T> {
    type Error = spi::Error;

    fn transfer(&mut self, read: &mut [u8], write: &[u8]) -> Result<(), Self::Error> {
        self.spi.blocking_transfer(read, write)
    }

    fn write(&mut self, data: &[u8]) -> Result<(), Self::Error> {
        self.spi.blocking_write(data)
    }

    fn read(&mut self, buf: &mut [u8]) -> Result<(), Self::Error> {
        self.spi.blocking_read(buf)
    }
}

impl<T: Instance> ConfigurableBus for RpSpi<'_, T> {
    fn reconfigure(&mut self, config: &SpiConfig) -> Result<(), Self::Error> {
        self.spi.set_config(&embassy_config(config));
        Ok(())
    }
}
