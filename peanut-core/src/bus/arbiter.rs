//! Bus arbiter and lease implementation

use peanut_hal::spi::Mode;
use peanut_hal::{ConfigurableBus, OutputPin, SpiConfig};

/// Default panel clock
pub const DISPLAY_HZ: u32 = 32_000_000;

/// Default SD card clock (initialization-safe)
pub const STORAGE_HZ: u32 = 2_000_000;

/// Which device currently owns the bus
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BusMode {
    /// ILI9341 panel
    Display,
    /// SD card
    Storage,
}

/// Hardware failures surfaced by the core
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum HardwareFault {
    /// Reclocking the bus for this device failed
    BusReconfigure(BusMode),
    /// A transfer to this device failed
    BusTransfer(BusMode),
}

/// Clock and mode used for each device
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BusProfile {
    pub display: SpiConfig,
    pub storage: SpiConfig,
}

impl Default for BusProfile {
    fn default() -> Self {
        Self::new(DISPLAY_HZ, STORAGE_HZ)
    }
}

impl BusProfile {
    /// Mode 0 on both devices with the given clocks
    pub const fn new(display_hz: u32, storage_hz: u32) -> Self {
        Self {
            display: SpiConfig::new(display_hz, Mode::Mode0),
            storage: SpiConfig::new(storage_hz, Mode::Mode0),
        }
    }

    pub fn config(&self, mode: BusMode) -> &SpiConfig {
        match mode {
            BusMode::Display => &self.display,
            BusMode::Storage => &self.storage,
        }
    }
}

/// Owner of the shared bus and both chip selects
///
/// Chip selects are active low and idle high.
pub struct BusArbiter<B, CS> {
    bus: B,
    display_cs: CS,
    storage_cs: CS,
    profile: BusProfile,
    /// `None` until the first switch, and again after a failed one
    current: Option<BusMode>,
    reconfigurations: u32,
}

impl<B: ConfigurableBus, CS: OutputPin> BusArbiter<B, CS> {
    /// Take ownership of the bus and deselect both devices
    pub fn new(bus: B, mut display_cs: CS, mut storage_cs: CS, profile: BusProfile) -> Self {
        display_cs.set_high();
        storage_cs.set_high();
        Self {
            bus,
            display_cs,
            storage_cs,
            profile,
            current: None,
            reconfigurations: 0,
        }
    }

    /// Mode the bus is known to be configured for
    pub fn current_mode(&self) -> Option<BusMode> {
        self.current
    }

    /// Number of reclockings performed so far
    pub fn reconfigurations(&self) -> u32 {
        self.reconfigurations
    }

    pub fn profile(&self) -> &BusProfile {
        &self.profile
    }

    /// Reclock the bus for `mode` unless it is already configured for it
    ///
    /// On failure the current mode becomes unknown, so the next request
    /// reinitializes regardless of mode.
    pub fn switch_to(&mut self, mode: BusMode) -> Result<(), HardwareFault> {
        if self.current == Some(mode) {
            return Ok(());
        }

        self.current = None;
        self.bus
            .reconfigure(self.profile.config(mode))
            .map_err(|_| HardwareFault::BusReconfigure(mode))?;
        self.current = Some(mode);
        self.reconfigurations = self.reconfigurations.wrapping_add(1);
        Ok(())
    }

    /// [`switch_to`](Self::switch_to) with up to `attempts` tries
    pub fn retry_switch(&mut self, mode: BusMode, attempts: u8) -> Result<(), HardwareFault> {
        let mut result = self.switch_to(mode);
        for _ in 1..attempts {
            if result.is_ok() {
                break;
            }
            result = self.switch_to(mode);
        }
        result
    }

    /// Switch to `mode`, select its device, and hand out the bus
    ///
    /// The device stays selected until the lease is dropped. The lease
    /// borrows the arbiter mutably, so transactions cannot overlap.
    pub fn acquire(&mut self, mode: BusMode) -> Result<BusLease<'_, B, CS>, HardwareFault> {
        self.switch_to(mode)?;
        self.chip_select(mode).set_low();
        Ok(BusLease {
            arbiter: self,
            mode,
        })
    }

    /// Bus controller, for inspection
    pub fn bus(&self) -> &B {
        &self.bus
    }

    /// Chip select pins (display, storage), for inspection
    pub fn chip_selects(&self) -> (&CS, &CS) {
        (&self.display_cs, &self.storage_cs)
    }

    fn chip_select(&mut self, mode: BusMode) -> &mut CS {
        match mode {
            BusMode::Display => &mut self.display_cs,
            BusMode::Storage => &mut self.storage_cs,
        }
    }
}

/// Exclusive use of the bus with one device selected
pub struct BusLease<'a, B: ConfigurableBus, CS: OutputPin> {
    arbiter: &'a mut BusArbiter<B, CS>,
    mode: BusMode,
}

impl<B: ConfigurableBus, CS: OutputPin> BusLease<'_, B, CS> {
    /// Device this lease selected
    pub fn mode(&self) -> BusMode {
        self.mode
    }

    pub fn write(&mut self, data: &[u8]) -> Result<(), HardwareFault> {
        self.arbiter
            .bus
            .write(data)
            .map_err(|_| HardwareFault::BusTransfer(self.mode))
    }

    pub fn transfer(&mut self, read: &mut [u8], write: &[u8]) -> Result<(), HardwareFault> {
        self.arbiter
            .bus
            .transfer(read, write)
            .map_err(|_| HardwareFault::BusTransfer(self.mode))
    }

    pub fn read(&mut self, buf: &mut [u8]) -> Result<(), HardwareFault> {
        self.arbiter
            .bus
            .read(buf)
            .map_err(|_| HardwareFault::BusTransfer(self.mode))
    }
}

impl<B: ConfigurableBus, CS: OutputPin> Drop for BusLease<'_, B, CS> {
    fn drop(&mut self) {
        let mode = self.mode;
        self.arbiter.chip_select(mode).set_high();
    }
}
