//! Configuration type definitions

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::bus::{BusProfile, DISPLAY_HZ, STORAGE_HZ};
use crate::governor::{PerformanceGovernor, PerformanceMode, DEFAULT_MEMORY_RESERVE};
use crate::keypad::{ScanTiming, DEBOUNCE_MS, LONG_PRESS_MS, SETTLE_US};

/// Shared SPI clock rates
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct BusConfig {
    /// Panel clock in Hz
    pub display_hz: u32,
    /// SD card clock in Hz
    pub storage_hz: u32,
}

impl Default for BusConfig {
    fn default() -> Self {
        Self {
            display_hz: DISPLAY_HZ,
            storage_hz: STORAGE_HZ,
        }
    }
}

/// Keypad timing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct KeypadConfig {
    pub debounce_ms: u32,
    pub long_press_ms: u32,
    /// Row settle time before reading columns
    pub settle_us: u32,
}

impl Default for KeypadConfig {
    fn default() -> Self {
        Self {
            debounce_ms: DEBOUNCE_MS,
            long_press_ms: LONG_PRESS_MS,
            settle_us: SETTLE_US,
        }
    }
}

/// Panel geometry and the degraded-allocation floor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DisplayConfig {
    pub width: u16,
    pub height: u16,
    pub min_width: u16,
    pub min_height: u16,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            width: 320,
            height: 240,
            min_width: peanut_display::MIN_WIDTH,
            min_height: peanut_display::MIN_HEIGHT,
        }
    }
}

/// Plot area margins in pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct GraphConfig {
    pub margin_x: u16,
    pub margin_y: u16,
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self {
            margin_x: 20,
            margin_y: 20,
        }
    }
}

/// Governor settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PerformanceConfig {
    pub target_fps: u32,
    /// Free heap bytes below which memory counts as tight
    pub memory_reserve: u32,
    pub mode: PerformanceMode,
}

impl Default for PerformanceConfig {
    fn default() -> Self {
        Self {
            target_fps: 10,
            memory_reserve: DEFAULT_MEMORY_RESERVE as u32,
            mode: PerformanceMode::Eco,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SystemConfig {
    /// Sleep at the end of each UI loop pass
    pub main_loop_delay_ms: u32,
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            main_loop_delay_ms: 20,
        }
    }
}

/// Semantic problems found after parsing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ValidationError {
    /// A clock rate is zero
    ZeroClock,
    /// Display or margin leaves no pixels
    ZeroSize,
    /// Degraded floor larger than the panel
    FloorAboveNative,
    /// Long press must outlast the debounce window
    LongPressTooShort,
    /// Debounce of zero disables filtering
    ZeroDebounce,
    ZeroFps,
}

/// Complete device configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DeviceConfig {
    pub bus: BusConfig,
    pub keypad: KeypadConfig,
    pub display: DisplayConfig,
    pub graph: GraphConfig,
    pub performance: PerformanceConfig,
    pub system: SystemConfig,
}

impl DeviceConfig {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.bus.display_hz == 0 || self.bus.storage_hz == 0 {
            return Err(ValidationError::ZeroClock);
        }

        let d = &self.display;
        if d.width == 0 || d.height == 0 || d.min_width == 0 || d.min_height == 0 {
            return Err(ValidationError::ZeroSize);
        }
        if d.min_width > d.width || d.min_height > d.height {
            return Err(ValidationError::FloorAboveNative);
        }
        let g = &self.graph;
        if u32::from(g.margin_x) * 2 >= u32::from(d.min_width)
            || u32::from(g.margin_y) * 2 >= u32::from(d.min_height)
        {
            return Err(ValidationError::ZeroSize);
        }

        if self.keypad.debounce_ms == 0 {
            return Err(ValidationError::ZeroDebounce);
        }
        if self.keypad.long_press_ms <= self.keypad.debounce_ms {
            return Err(ValidationError::LongPressTooShort);
        }

        if self.performance.target_fps == 0 {
            return Err(ValidationError::ZeroFps);
        }

        Ok(())
    }

    pub fn bus_profile(&self) -> BusProfile {
        BusProfile::new(self.bus.display_hz, self.bus.storage_hz)
    }

    pub fn scan_timing(&self) -> ScanTiming {
        ScanTiming {
            debounce_ms: self.keypad.debounce_ms,
            long_press_ms: self.keypad.long_press_ms,
        }
    }

    pub fn governor(&self) -> PerformanceGovernor {
        PerformanceGovernor::new(
            self.performance.target_fps,
            self.performance.memory_reserve as usize,
            self.performance.mode,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = DeviceConfig::default();
        assert_eq!(config.validate(), Ok(()));
        assert_eq!(config.scan_timing(), ScanTiming::default());
        assert_eq!(config.bus_profile(), BusProfile::default());
        assert_eq!(config.governor().budget_ms(), 100);
    }

    #[test]
    fn test_long_press_must_exceed_debounce() {
        let mut config = DeviceConfig::default();
        config.keypad.long_press_ms = config.keypad.debounce_ms;
        assert_eq!(config.validate(), Err(ValidationError::LongPressTooShort));
    }

    #[test]
    fn test_floor_above_native() {
        let mut config = DeviceConfig::default();
        config.display.min_width = 400;
        assert_eq!(config.validate(), Err(ValidationError::FloorAboveNative));
    }

    #[test]
    fn test_margins_swallow_plot() {
        let mut config = DeviceConfig::default();
        config.graph.margin_y = 60;
        assert_eq!(config.validate(), Err(ValidationError::ZeroSize));
    }

    #[test]
    fn test_zero_fps() {
        let mut config = DeviceConfig::default();
        config.performance.target_fps = 0;
        assert_eq!(config.validate(), Err(ValidationError::ZeroFps));
    }
}
