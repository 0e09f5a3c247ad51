//! Busy-wait delay

use embassy_time::{block_for, Duration};
use peanut_hal::DelayUs;

/// Spins on the embassy time driver
#[derive(Debug, Clone, Copy, Default)]
pub struct BlockingDelay;

impl DelayUs for BlockingDelay {
    fn delay_us(&mut self, us: u32) {
        block_for(Duration::from_micros(u64::from(us)));
    }

    fn delay_ms(&mut self, ms: u32) {
        block_for(Duration::from_millis(u64::from(ms)));
    }
}
