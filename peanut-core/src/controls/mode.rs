//! View mode state machine

use crate::keypad::Key;

/// What the graph screen is showing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ViewMode {
    /// Function plot with pan and zoom
    #[default]
    Mode2D,
    /// Rotating surface view
    Mode3D,
    /// Cursor following the curve
    Trace,
}

impl ViewMode {
    /// Next mode after `key`; keys that do not switch modes keep it
    pub fn transition(self, key: Key) -> Self {
        use ViewMode::*;

        match (self, key) {
            (Mode2D, Key::F1) => Trace,
            (Mode2D, Key::F2) => Mode3D,
            (Mode3D, Key::F2) => Mode2D,
            (Trace, Key::F1) => Mode2D,
            _ => self,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            ViewMode::Mode2D => "2D Graph",
            ViewMode::Mode3D => "3D View",
            ViewMode::Trace => "Trace",
        }
    }
}
