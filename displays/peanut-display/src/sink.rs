//! Frame transmission seam

/// Something that can receive a whole packed RGB565 frame
///
/// Implemented by panel drivers. `pixels` is `width * height * 2` bytes,
/// big-endian per pixel, row-major.
pub trait FrameSink {
    /// Error raised when the transfer fails
    type Error;

    /// Transmit one frame
    fn push_frame(&mut self, width: u16, height: u16, pixels: &[u8]) -> Result<(), Self::Error>;
}
