//! SPI bus abstractions
//!
//! The calculator has one SPI controller wired to both the panel and the SD
//! card slot. The two devices want different clocks, so besides plain
//! transfers the bus must accept a new [`SpiConfig`] at runtime.

/// SPI bus master
pub trait SpiBus {
    /// Error type for SPI operations
    type Error;

    /// Transfer data (simultaneous read/write)
    ///
    /// Both buffers must be the same length.
    fn transfer(&mut self, read: &mut [u8], write: &[u8]) -> Result<(), Self::Error>;

    /// Write data without reading
    fn write(&mut self, data: &[u8]) -> Result<(), Self::Error>;

    /// Read data (clocks out zeros)
    fn read(&mut self, buf: &mut [u8]) -> Result<(), Self::Error>;
}

/// An SPI bus whose clock and mode can be changed between transactions
pub trait ConfigurableBus: SpiBus {
    /// Reinitialize the controller with a new configuration
    ///
    /// Must not be called while a device is selected.
    fn reconfigure(&mut self, config: &SpiConfig) -> Result<(), Self::Error>;
}

/// SPI configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SpiConfig {
    /// Clock frequency in Hz
    pub frequency: u32,
    /// Clock polarity
    pub polarity: Polarity,
    /// Clock phase
    pub phase: Phase,
}

impl SpiConfig {
    /// Build a configuration from a frequency and a combined SPI mode
    pub const fn new(frequency: u32, mode: Mode) -> Self {
        let (polarity, phase) = mode.split();
        Self {
            frequency,
            polarity,
            phase,
        }
    }
}

impl Default for SpiConfig {
    fn default() -> Self {
        Self::new(1_000_000, Mode::Mode0)
    }
}

/// SPI clock polarity
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Polarity {
    /// Clock idles low (CPOL=0)
    IdleLow,
    /// Clock idles high (CPOL=1)
    IdleHigh,
}

/// SPI clock phase
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Phase {
    /// Data captured on first clock transition (CPHA=0)
    CaptureOnFirstTransition,
    /// Data captured on second clock transition (CPHA=1)
    CaptureOnSecondTransition,
}

/// SPI mode (combined polarity and phase)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Mode {
    /// Mode 0: CPOL=0, CPHA=0
    Mode0,
    /// Mode 1: CPOL=0, CPHA=1
    Mode1,
    /// Mode 2: CPOL=1, CPHA=0
    Mode2,
    /// Mode 3: CPOL=1, CPHA=1
    Mode3,
}

impl Mode {
    /// Split into polarity and phase
    pub const fn split(self) -> (Polarity, Phase) {
        match self {
            Mode::Mode0 => (Polarity::IdleLow, Phase::CaptureOnFirstTransition),
            Mode::Mode1 => (Polarity::IdleLow, Phase::CaptureOnSecondTransition),
            Mode::Mode2 => (Polarity::IdleHigh, Phase::CaptureOnFirstTransition),
            Mode::Mode3 => (Polarity::IdleHigh, Phase::CaptureOnSecondTransition),
        }
    }
}

impl From<Mode> for (Polarity, Phase) {
    fn from(mode: Mode) -> Self {
        mode.split()
    }
}
