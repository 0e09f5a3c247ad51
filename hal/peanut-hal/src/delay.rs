//! Blocking delays
//!
//! Used for the few microsecond-scale waits the hardware needs (row settle
//! time on the keypad, panel reset pulses). Anything longer belongs in the
//! async executor, not here.

/// Busy-wait delay source
pub trait DelayUs {
    /// Block for at least `us` microseconds
    fn delay_us(&mut self, us: u32);

    /// Block for at least `ms` milliseconds
    fn delay_ms(&mut self, ms: u32) {
        for _ in 0..ms {
            self.delay_us(1_000);
        }
    }
}
