//! Keypad scanning and key labels
//!
//! [`KeyScanner`] turns raw matrix contacts into debounced
//! [`KeyEvent`]s; [`Keymap`] names the positions.

mod keymap;
mod scanner;

pub use keymap::{Key, Keymap, KEYPAD_COLS, KEYPAD_ROWS};
pub use scanner::{
    KeyEvent, KeyPosition, KeyScanner, PressKind, ScanTiming, DEBOUNCE_MS, LONG_PRESS_MS,
    MAX_EVENTS, MAX_KEYS, SETTLE_US,
};
