//! Digital pin adapters

use embassy_rp::gpio::Input;
use peanut_hal::{InputPin, OutputPin};

/// Any `embedded-hal` output as a `peanut-hal` output
///
/// RP2350 GPIO writes cannot fail, so errors are dropped.
pub struct RpOutput<P>(pub P);

impl<P: embedded_hal::digital::OutputPin> OutputPin for RpOutput<P> {
    fn set_high(&mut self) {
        let _ = self.0.set_high();
    }

    fn set_low(&mut self) {
        let _ = self.0.set_low();
    }
}

/// Pulled-up input
pub struct RpInput<'d>(pub Input<'d>);

impl InputPin for RpInput<'_> {
    fn is_high(&self) -> bool {
        self.0.is_high()
    }
}
