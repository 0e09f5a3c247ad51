//! Keypad matrix on plain GPIO
//!
//! Rows are push-pull outputs idling high; columns are inputs with pull-ups.
//! Selecting a row pulls it low, so a closed switch pulls its column low.

use peanut_core::traits::KeyMatrix;
use peanut_hal::{DelayUs, InputPin, OutputPin};

/// Active-low row/column matrix
pub struct GpioMatrix<R, C, D, const ROWS: usize, const COLS: usize> {
    rows: [R; ROWS],
    cols: [C; COLS],
    delay: D,
    settle_us: u32,
}

impl<R, C, D, const ROWS: usize, const COLS: usize> GpioMatrix<R, C, D, ROWS, COLS>
where
    R: OutputPin,
    C: InputPin,
    D: DelayUs,
{
    /// Take the pins and park every row high
    pub fn new(rows: [R; ROWS], cols: [C; COLS], delay: D, settle_us: u32) -> Self {
        let mut matrix = Self {
            rows,
            cols,
            delay,
            settle_us,
        };
        matrix.release_rows();
        matrix
    }
}

impl<R, C, D, const ROWS: usize, const COLS: usize> KeyMatrix for GpioMatrix<R, C, D, ROWS, COLS>
where
    R: OutputPin,
    C: InputPin,
    D: DelayUs,
{
    fn rows(&self) -> usize {
        ROWS
    }

    fn cols(&self) -> usize {
        COLS
    }

    fn select_row(&mut self, row: usize) {
        for (i, pin) in self.rows.iter_mut().enumerate() {
            pin.set_state(i != row);
        }
        self.delay.delay_us(self.settle_us);
    }

    fn release_rows(&mut self) {
        for pin in self.rows.iter_mut() {
            pin.set_high();
        }
    }

    fn column_active(&self, col: usize) -> bool {
        self.cols.get(col).is_some_and(|pin| pin.is_low())
    }
}
