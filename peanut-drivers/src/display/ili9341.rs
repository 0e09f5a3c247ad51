//! ILI9341 TFT panel over the shared SPI bus
//!
//! The panel sits on the same SPI controller as the SD card, so every
//! command goes through a [`BusArbiter`] lease in display mode. The data /
//! command line and reset line are driven directly.
//!
//! # Protocol
//!
//! - DC low: the byte on the bus is a command
//! - DC high: the bytes that follow are its parameters or pixel data
//! - Pixels are RGB565, big-endian, written after `RAMWR` into the window
//!   set by `CASET`/`PASET`

use peanut_core::bus::{BusArbiter, BusMode, HardwareFault};
use peanut_display::FrameSink;
use peanut_hal::{ConfigurableBus, DelayUs, OutputPin};

/// Command opcodes
pub mod cmd {
    /// Software reset
    pub const SWRESET: u8 = 0x01;
    /// Sleep out
    pub const SLPOUT: u8 = 0x11;
    /// Pixel format
    pub const PIXFMT: u8 = 0x3A;
    /// Memory access control (orientation, colour order)
    pub const MADCTL: u8 = 0x36;
    /// Display on
    pub const DISPON: u8 = 0x29;
    /// Column address window
    pub const CASET: u8 = 0x2A;
    /// Page (row) address window
    pub const PASET: u8 = 0x2B;
    /// Memory write
    pub const RAMWR: u8 = 0x2C;
}

/// 16 bits per pixel
const PIXFMT_RGB565: u8 = 0x55;
/// Landscape, BGR order
const MADCTL_LANDSCAPE: u8 = 0x28;

/// Power-up sequence as (command, parameters, wait after in ms)
const INIT_SEQUENCE: [(u8, &[u8], u32); 5] = [
    (cmd::SWRESET, &[], 150),
    (cmd::SLPOUT, &[], 500),
    (cmd::PIXFMT, &[PIXFMT_RGB565], 0),
    (cmd::MADCTL, &[MADCTL_LANDSCAPE], 0),
    (cmd::DISPON, &[], 100),
];

/// ILI9341 control lines and geometry
pub struct Ili9341<DC, RST, D> {
    dc: DC,
    rst: RST,
    delay: D,
    width: u16,
    height: u16,
}

impl<DC: OutputPin, RST: OutputPin, D: DelayUs> Ili9341<DC, RST, D> {
    /// Panel of `width` x `height` in its landscape orientation
    pub fn new(dc: DC, rst: RST, delay: D, width: u16, height: u16) -> Self {
        Self {
            dc,
            rst,
            delay,
            width,
            height,
        }
    }

    pub fn size(&self) -> (u16, u16) {
        (self.width, self.height)
    }

    /// Hardware reset followed by the power-up command sequence
    pub fn init<B: ConfigurableBus, CS: OutputPin>(
        &mut self,
        arbiter: &mut BusArbiter<B, CS>,
    ) -> Result<(), HardwareFault> {
        self.rst.set_low();
        self.delay.delay_ms(50);
        self.rst.set_high();
        self.delay.delay_ms(120);

        for (command, params, wait_ms) in INIT_SEQUENCE {
            self.command(arbiter, command, params)?;
            if wait_ms > 0 {
                self.delay.delay_ms(wait_ms);
            }
        }
        Ok(())
    }

    /// Send one command and its parameters under a single lease
    pub fn command<B: ConfigurableBus, CS: OutputPin>(
        &mut self,
        arbiter: &mut BusArbiter<B, CS>,
        command: u8,
        params: &[u8],
    ) -> Result<(), HardwareFault> {
        let mut lease = arbiter.acquire(BusMode::Display)?;
        self.dc.set_low();
        lease.write(&[command])?;
        if !params.is_empty() {
            self.dc.set_high();
            lease.write(params)?;
        }
        Ok(())
    }

    /// Limit the next pixel write to the inclusive rectangle
    pub fn set_window<B: ConfigurableBus, CS: OutputPin>(
        &mut self,
        arbiter: &mut BusArbiter<B, CS>,
        x0: u16,
        y0: u16,
        x1: u16,
        y1: u16,
    ) -> Result<(), HardwareFault> {
        let [x0h, x0l] = x0.to_be_bytes();
        let [x1h, x1l] = x1.to_be_bytes();
        let [y0h, y0l] = y0.to_be_bytes();
        let [y1h, y1l] = y1.to_be_bytes();
        self.command(arbiter, cmd::CASET, &[x0h, x0l, x1h, x1l])?;
        self.command(arbiter, cmd::PASET, &[y0h, y0l, y1h, y1l])?;
        self.command(arbiter, cmd::RAMWR, &[])
    }

    /// Bind the panel to the arbiter for frame pushes
    pub fn link<'a, B: ConfigurableBus, CS: OutputPin>(
        &'a mut self,
        arbiter: &'a mut BusArbiter<B, CS>,
    ) -> PanelLink<'a, DC, RST, D, B, CS> {
        PanelLink {
            panel: self,
            arbiter,
        }
    }

    /// Pixel data for a frame anchored at the top-left corner
    ///
    /// Frames larger than the panel are cropped: only the leading
    /// `panel width` pixels of each of the first `panel height` rows go out.
    fn write_frame<B: ConfigurableBus, CS: OutputPin>(
        &mut self,
        arbiter: &mut BusArbiter<B, CS>,
        width: u16,
        height: u16,
        pixels: &[u8],
    ) -> Result<(), HardwareFault> {
        let win_w = width.min(self.width);
        let win_h = height.min(self.height);
        if win_w == 0 || win_h == 0 {
            return Ok(());
        }
        self.set_window(arbiter, 0, 0, win_w - 1, win_h - 1)?;

        let stride = usize::from(width) * 2;
        let row_len = usize::from(win_w) * 2;
        let frame = &pixels[..pixels.len().min(stride * usize::from(win_h))];

        let mut lease = arbiter.acquire(BusMode::Display)?;
        self.dc.set_high();
        if win_w == width {
            return lease.write(frame);
        }
        for row in frame.chunks(stride) {
            lease.write(&row[..row_len.min(row.len())])?;
        }
        Ok(())
    }
}

/// A panel and the arbiter it talks through, usable as a [`FrameSink`]
pub struct PanelLink<'a, DC, RST, D, B, CS> {
    panel: &'a mut Ili9341<DC, RST, D>,
    arbiter: &'a mut BusArbiter<B, CS>,
}

impl<DC, RST, D, B, CS> FrameSink for PanelLink<'_, DC, RST, D, B, CS>
where
    DC: OutputPin,
    RST: OutputPin,
    D: DelayUs,
    B: ConfigurableBus,
    CS: OutputPin,
{
    type Error = HardwareFault;

    fn push_frame(&mut self, width: u16, height: u16, pixels: &[u8]) -> Result<(), HardwareFault> {
        self.panel.write_frame(&mut *self.arbiter, width, height, pixels)
    }
}
