//! Logical key labels for the 6×4 calculator keypad
//!
//! ```text
//!        col 0   col 1   col 2   col 3
//! row 0    C       ±       %       ÷
//! row 1    7       8       9       ×
//! row 2    4       5       6       −
//! row 3    1       2       3       +
//! row 4    0       .       =      MENU
//! row 5    F1      F2      F3     ENTER
//! ```

use super::scanner::KeyPosition;

/// A key by meaning rather than position
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Key {
    Digit(u8),
    Clear,
    Negate,
    Percent,
    Divide,
    Multiply,
    Subtract,
    Add,
    Decimal,
    Equals,
    Menu,
    F1,
    F2,
    F3,
    Enter,
}

impl Key {
    /// Text printed on the keycap
    pub fn label(self) -> &'static str {
        match self {
            Key::Digit(d) => match d {
                0 => "0",
                1 => "1",
                2 => "2",
                3 => "3",
                4 => "4",
                5 => "5",
                6 => "6",
                7 => "7",
                8 => "8",
                _ => "9",
            },
            Key::Clear => "C",
            Key::Negate => "±",
            Key::Percent => "%",
            Key::Divide => "÷",
            Key::Multiply => "×",
            Key::Subtract => "−",
            Key::Add => "+",
            Key::Decimal => ".",
            Key::Equals => "=",
            Key::Menu => "MENU",
            Key::F1 => "F1",
            Key::F2 => "F2",
            Key::F3 => "F3",
            Key::Enter => "ENTER",
        }
    }
}

/// Rows in the keypad matrix
pub const KEYPAD_ROWS: usize = 6;

/// Columns in the keypad matrix
pub const KEYPAD_COLS: usize = 4;

/// Position to key lookup table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Keymap {
    keys: [[Key; KEYPAD_COLS]; KEYPAD_ROWS],
}

impl Keymap {
    /// Standard calculator layout
    pub const fn basic() -> Self {
        use Key::*;
        Self {
            keys: [
                [Clear, Negate, Percent, Divide],
                [Digit(7), Digit(8), Digit(9), Multiply],
                [Digit(4), Digit(5), Digit(6), Subtract],
                [Digit(1), Digit(2), Digit(3), Add],
                [Digit(0), Decimal, Equals, Menu],
                [F1, F2, F3, Enter],
            ],
        }
    }

    pub const fn new(keys: [[Key; KEYPAD_COLS]; KEYPAD_ROWS]) -> Self {
        Self { keys }
    }

    /// Key at a matrix position, `None` outside the table
    pub fn key_at(&self, position: KeyPosition) -> Option<Key> {
        self.keys
            .get(usize::from(position.row))?
            .get(usize::from(position.col))
            .copied()
    }

    /// Matrix position of a key
    pub fn position_of(&self, key: Key) -> Option<KeyPosition> {
        self.keys.iter().enumerate().find_map(|(row, keys)| {
            keys.iter()
                .position(|&k| k == key)
                .map(|col| KeyPosition::new(row as u8, col as u8))
        })
    }
}

impl Default for Keymap {
    fn default() -> Self {
        Self::basic()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_layout() {
        let map = Keymap::basic();
        assert_eq!(map.key_at(KeyPosition::new(0, 0)), Some(Key::Clear));
        assert_eq!(map.key_at(KeyPosition::new(1, 1)), Some(Key::Digit(8)));
        assert_eq!(map.key_at(KeyPosition::new(3, 3)), Some(Key::Add));
        assert_eq!(map.key_at(KeyPosition::new(5, 3)), Some(Key::Enter));
        assert_eq!(map.key_at(KeyPosition::new(6, 0)), None);
        assert_eq!(map.key_at(KeyPosition::new(0, 4)), None);
    }

    #[test]
    fn test_position_lookup() {
        let map = Keymap::basic();
        for row in 0..6u8 {
            for col in 0..4u8 {
                let pos = KeyPosition::new(row, col);
                let key = map.key_at(pos).unwrap();
                assert_eq!(map.position_of(key), Some(pos));
            }
        }
    }

    #[test]
    fn test_labels() {
        assert_eq!(Key::Digit(5).label(), "5");
        assert_eq!(Key::Subtract.label(), "−");
        assert_eq!(Key::Enter.label(), "ENTER");
    }
}
