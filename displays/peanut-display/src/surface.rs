//! The framebuffer surface
//!
//! One packed RGB565 buffer (two bytes per pixel, big-endian, row-major),
//! allocated once at boot and mutated in place by every view. A dirty flag
//! gates transmission so idle frames cost no bus time.

use alloc::vec::Vec;
use core::convert::Infallible;

use embedded_graphics::{
    mono_font::{ascii::FONT_6X10, MonoTextStyle},
    pixelcolor::{raw::RawU16, IntoStorage, Rgb565},
    prelude::*,
    primitives::{Circle, Line, PrimitiveStyle, Rectangle},
    text::{Baseline, Text},
};

use crate::sink::FrameSink;
use crate::source::BufferSource;

/// Smallest width the surface degrades to before giving up
pub const MIN_WIDTH: u16 = 160;

/// Smallest height the surface degrades to before giving up
pub const MIN_HEIGHT: u16 = 120;

/// Character cell of the built-in font
pub const FONT_WIDTH: u16 = 6;
pub const FONT_HEIGHT: u16 = 10;

/// What the boot-time allocation ended up with
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Resolution {
    /// Full panel resolution
    Native,
    /// Reduced resolution after the native buffer could not be allocated
    Reduced,
    /// No buffer at all; drawing is a no-op
    Headless,
}

/// RGB565 framebuffer with clipping primitives and dirty tracking
pub struct DisplaySurface {
    buffer: Option<Vec<u8>>,
    width: u16,
    height: u16,
    native_width: u16,
    native_height: u16,
    dirty: bool,
}

impl DisplaySurface {
    /// Allocate a surface, degrading to the default floor of 160×120
    pub fn allocate<S: BufferSource>(width: u16, height: u16, source: &mut S) -> Self {
        Self::allocate_with_floor(width, height, MIN_WIDTH, MIN_HEIGHT, source)
    }

    /// Allocate a surface with an explicit degradation floor
    ///
    /// Tries the full size, then once more with both dimensions halved (but
    /// not below the floor). If both attempts fail the surface is headless.
    /// Never panics.
    pub fn allocate_with_floor<S: BufferSource>(
        width: u16,
        height: u16,
        min_width: u16,
        min_height: u16,
        source: &mut S,
    ) -> Self {
        let mut surface = Self {
            buffer: None,
            width,
            height,
            native_width: width,
            native_height: height,
            dirty: false,
        };

        if let Some(buf) = source.try_reserve(frame_len(width, height)) {
            surface.buffer = Some(buf);
            return surface;
        }

        let reduced_w = (width / 2).max(min_width).min(width);
        let reduced_h = (height / 2).max(min_height).min(height);
        if let Some(buf) = source.try_reserve(frame_len(reduced_w, reduced_h)) {
            surface.buffer = Some(buf);
            surface.width = reduced_w;
            surface.height = reduced_h;
        }

        surface
    }

    /// Width in pixels
    pub fn width(&self) -> u16 {
        self.width
    }

    /// Height in pixels
    pub fn height(&self) -> u16 {
        self.height
    }

    /// Resolution the panel was asked for
    pub fn native_size(&self) -> (u16, u16) {
        (self.native_width, self.native_height)
    }

    /// Which allocation tier the surface ended up in
    pub fn resolution(&self) -> Resolution {
        if self.buffer.is_none() {
            Resolution::Headless
        } else if self.width < self.native_width || self.height < self.native_height {
            Resolution::Reduced
        } else {
            Resolution::Native
        }
    }

    /// True when running below native resolution or headless
    pub fn is_degraded(&self) -> bool {
        self.resolution() != Resolution::Native
    }

    pub fn is_headless(&self) -> bool {
        self.buffer.is_none()
    }

    /// Whether anything was drawn since the last successful flush
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Force the next flush to transmit
    pub fn mark_dirty(&mut self) {
        if self.buffer.is_some() {
            self.dirty = true;
        }
    }

    /// Packed frame bytes, if a buffer exists
    pub fn bytes(&self) -> Option<&[u8]> {
        self.buffer.as_deref()
    }

    /// Read back one pixel
    pub fn read_pixel(&self, x: i32, y: i32) -> Option<Rgb565> {
        let offset = self.offset(x, y)?;
        let buf = self.buffer.as_ref()?;
        let raw = u16::from_be_bytes([buf[offset], buf[offset + 1]]);
        Some(Rgb565::from(RawU16::new(raw)))
    }

    /// Fill the whole surface
    pub fn clear(&mut self, color: Rgb565) {
        let area = self.bounding_box();
        self.fill_solid(&area, color).ok();
    }

    /// Set one pixel; out-of-bounds is ignored
    pub fn draw_pixel(&mut self, x: i32, y: i32, color: Rgb565) {
        self.draw_iter(core::iter::once(Pixel(Point::new(x, y), color)))
            .ok();
    }

    /// Draw a one-pixel line, both endpoints included
    ///
    /// The segment is clipped to the surface before rasterizing, so far
    /// off-screen endpoints cost nothing extra.
    pub fn draw_line(&mut self, x0: i32, y0: i32, x1: i32, y1: i32, color: Rgb565) {
        if self.is_headless() {
            return;
        }
        let Some((start, end)) = clip_line(
            (x0, y0),
            (x1, y1),
            i32::from(self.width),
            i32::from(self.height),
        ) else {
            return;
        };
        Line::new(Point::new(start.0, start.1), Point::new(end.0, end.1))
            .into_styled(PrimitiveStyle::with_stroke(color, 1))
            .draw(self)
            .ok();
    }

    /// Horizontal run of `length` pixels starting at (x, y)
    pub fn draw_hline(&mut self, x: i32, y: i32, length: u32, color: Rgb565) {
        self.fill_rect(x, y, length, 1, color);
    }

    /// Vertical run of `length` pixels starting at (x, y)
    pub fn draw_vline(&mut self, x: i32, y: i32, length: u32, color: Rgb565) {
        self.fill_rect(x, y, 1, length, color);
    }

    /// Solid rectangle, clipped
    pub fn fill_rect(&mut self, x: i32, y: i32, width: u32, height: u32, color: Rgb565) {
        // Clip in i64 so huge sizes cannot wrap the corner
        let left = i64::from(x).max(0);
        let top = i64::from(y).max(0);
        let right = (i64::from(x) + i64::from(width)).min(i64::from(self.width));
        let bottom = (i64::from(y) + i64::from(height)).min(i64::from(self.height));
        if right <= left || bottom <= top {
            return;
        }
        let area = Rectangle::new(
            Point::new(left as i32, top as i32),
            Size::new((right - left) as u32, (bottom - top) as u32),
        );
        self.fill_solid(&area, color).ok();
    }

    /// Rectangle outline, clipped
    pub fn draw_rect(&mut self, x: i32, y: i32, width: u32, height: u32, color: Rgb565) {
        if width == 0 || height == 0 {
            return;
        }
        let right = x.saturating_add(i32::try_from(width).unwrap_or(i32::MAX).saturating_sub(1));
        let bottom = y.saturating_add(i32::try_from(height).unwrap_or(i32::MAX).saturating_sub(1));
        self.draw_hline(x, y, width, color);
        self.draw_hline(x, bottom, width, color);
        self.draw_vline(x, y, height, color);
        self.draw_vline(right, y, height, color);
    }

    /// Circle centred on (cx, cy); `filled` selects disc or outline
    pub fn draw_circle(&mut self, cx: i32, cy: i32, radius: u32, color: Rgb565, filled: bool) {
        if self.is_headless() {
            return;
        }
        let style = if filled {
            PrimitiveStyle::with_fill(color)
        } else {
            PrimitiveStyle::with_stroke(color, 1)
        };
        Circle::with_center(Point::new(cx, cy), radius.saturating_mul(2) + 1)
            .into_styled(style)
            .draw(self)
            .ok();
    }

    /// Draw text with the 6×10 font; (x, y) is the top-left of the first cell
    pub fn draw_text(&mut self, text: &str, x: i32, y: i32, color: Rgb565) {
        if self.is_headless() {
            return;
        }
        let style = MonoTextStyle::new(&FONT_6X10, color);
        Text::with_baseline(text, Point::new(x, y), style, Baseline::Top)
            .draw(self)
            .ok();
    }

    /// Transmit the frame if dirty (or `force`)
    ///
    /// Returns whether a transfer happened. A failed transfer leaves the
    /// surface dirty so the next frame retries. Headless surfaces never
    /// transmit.
    pub fn flush<S: FrameSink>(&mut self, sink: &mut S, force: bool) -> Result<bool, S::Error> {
        let Some(buf) = self.buffer.as_deref() else {
            return Ok(false);
        };
        if !self.dirty && !force {
            return Ok(false);
        }
        match sink.push_frame(self.width, self.height, buf) {
            Ok(()) => {
                self.dirty = false;
                Ok(true)
            }
            Err(e) => {
                self.dirty = true;
                Err(e)
            }
        }
    }

    fn offset(&self, x: i32, y: i32) -> Option<usize> {
        if x < 0 || y < 0 || x >= i32::from(self.width) || y >= i32::from(self.height) {
            return None;
        }
        Some((y as usize * usize::from(self.width) + x as usize) * 2)
    }
}

impl OriginDimensions for DisplaySurface {
    fn size(&self) -> Size {
        Size::new(u32::from(self.width), u32::from(self.height))
    }
}

impl DrawTarget for DisplaySurface {
    type Color = Rgb565;
    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        let (w, h) = (i32::from(self.width), i32::from(self.height));
        let Some(buf) = self.buffer.as_mut() else {
            return Ok(());
        };
        let mut touched = false;
        for Pixel(Point { x, y }, color) in pixels {
            if x < 0 || y < 0 || x >= w || y >= h {
                continue;
            }
            let offset = (y as usize * w as usize + x as usize) * 2;
            buf[offset..offset + 2].copy_from_slice(&color.into_storage().to_be_bytes());
            touched = true;
        }
        // Fully clipped draws leave the frame clean
        self.dirty |= touched;
        Ok(())
    }

    fn fill_solid(&mut self, area: &Rectangle, color: Self::Color) -> Result<(), Self::Error> {
        let area = area.intersection(&self.bounding_box());
        let Some(bottom_right) = area.bottom_right() else {
            return Ok(());
        };
        let stride = usize::from(self.width);
        let Some(buf) = self.buffer.as_mut() else {
            return Ok(());
        };
        let bytes = color.into_storage().to_be_bytes();
        for y in area.top_left.y..=bottom_right.y {
            let row = y as usize * stride;
            for x in area.top_left.x..=bottom_right.x {
                let offset = (row + x as usize) * 2;
                buf[offset..offset + 2].copy_from_slice(&bytes);
            }
        }
        self.dirty = true;
        Ok(())
    }
}

/// Bytes needed for a frame
pub fn frame_len(width: u16, height: u16) -> usize {
    usize::from(width) * usize::from(height) * 2
}

const LEFT: u8 = 1;
const RIGHT: u8 = 2;
const TOP: u8 = 4;
const BOTTOM: u8 = 8;

/// Cohen-Sutherland clip of a segment against `[0, w) × [0, h)`
fn clip_line(
    p0: (i32, i32),
    p1: (i32, i32),
    w: i32,
    h: i32,
) -> Option<((i32, i32), (i32, i32))> {
    let (w, h) = (i128::from(w), i128::from(h));
    let outcode = |(x, y): (i128, i128)| {
        let mut code = 0;
        if x < 0 {
            code |= LEFT;
        } else if x >= w {
            code |= RIGHT;
        }
        if y < 0 {
            code |= TOP;
        } else if y >= h {
            code |= BOTTOM;
        }
        code
    };

    let mut a = (i128::from(p0.0), i128::from(p0.1));
    let mut b = (i128::from(p1.0), i128::from(p1.1));

    // Each pass pins one endpoint to one edge, so four passes suffice
    for _ in 0..=4 {
        let (ca, cb) = (outcode(a), outcode(b));
        if ca | cb == 0 {
            return Some(((a.0 as i32, a.1 as i32), (b.0 as i32, b.1 as i32)));
        }
        if ca & cb != 0 {
            return None;
        }
        let code = if ca != 0 { ca } else { cb };
        let ((x0, y0), (x1, y1)) = (a, b);
        let clipped = if code & BOTTOM != 0 {
            (x0 + (x1 - x0) * (h - 1 - y0) / (y1 - y0), h - 1)
        } else if code & TOP != 0 {
            (x0 + (x1 - x0) * (-y0) / (y1 - y0), 0)
        } else if code & RIGHT != 0 {
            (w - 1, y0 + (y1 - y0) * (w - 1 - x0) / (x1 - x0))
        } else {
            (0, y0 + (y1 - y0) * (-x0) / (x1 - x0))
        };
        if code == ca {
            a = clipped;
        } else {
            b = clipped;
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::palette;
    use crate::source::HeapSource;

    /// Source that refuses anything above a byte limit
    struct LimitedSource {
        limit: usize,
        requests: Vec<usize>,
    }

    impl LimitedSource {
        fn new(limit: usize) -> Self {
            Self {
                limit,
                requests: Vec::new(),
            }
        }
    }

    impl BufferSource for LimitedSource {
        fn try_reserve(&mut self, len: usize) -> Option<Vec<u8>> {
            self.requests.push(len);
            if len <= self.limit {
                Some(alloc::vec![0; len])
            } else {
                None
            }
        }
    }

    #[derive(Default)]
    struct RecordingSink {
        frames: usize,
        fail: bool,
        last_len: usize,
    }

    impl FrameSink for RecordingSink {
        type Error = ();

        fn push_frame(&mut self, width: u16, height: u16, pixels: &[u8]) -> Result<(), ()> {
            if self.fail {
                return Err(());
            }
            assert_eq!(pixels.len(), frame_len(width, height));
            self.frames += 1;
            self.last_len = pixels.len();
            Ok(())
        }
    }

    #[test]
    fn test_native_allocation() {
        let surface = DisplaySurface::allocate(320, 240, &mut HeapSource);
        assert_eq!(surface.resolution(), Resolution::Native);
        assert_eq!(surface.bytes().map(|b| b.len()), Some(320 * 240 * 2));
        assert!(!surface.is_degraded());
    }

    #[test]
    fn test_allocation_halves_once() {
        let mut source = LimitedSource::new(160 * 120 * 2);
        let surface = DisplaySurface::allocate(320, 240, &mut source);
        assert_eq!(surface.resolution(), Resolution::Reduced);
        assert_eq!((surface.width(), surface.height()), (160, 120));
        assert_eq!(source.requests, [320 * 240 * 2, 160 * 120 * 2]);
        assert!(surface.is_degraded());
    }

    #[test]
    fn test_allocation_floor() {
        // Halving 200×200 would give 100×100, below the floor
        let mut source = LimitedSource::new(160 * 120 * 2);
        let surface = DisplaySurface::allocate(200, 200, &mut source);
        assert_eq!(source.requests[1], 160 * 120 * 2);
        assert_eq!((surface.width(), surface.height()), (160, 120));
    }

    #[test]
    fn test_allocation_failure_goes_headless() {
        let mut source = LimitedSource::new(0);
        let mut surface = DisplaySurface::allocate(320, 240, &mut source);
        assert_eq!(surface.resolution(), Resolution::Headless);
        assert_eq!(source.requests.len(), 2);

        // Every operation is still valid
        surface.clear(palette::WHITE);
        surface.draw_line(0, 0, 319, 239, palette::WHITE);
        surface.draw_circle(10, 10, 3, palette::WHITE, true);
        surface.draw_text("headless", 0, 0, palette::WHITE);
        assert!(!surface.is_dirty());
        assert_eq!(surface.read_pixel(0, 0), None);

        let mut sink = RecordingSink::default();
        assert_eq!(surface.flush(&mut sink, true), Ok(false));
        assert_eq!(sink.frames, 0);
    }

    #[test]
    fn test_pixel_encoding_big_endian() {
        let mut surface = DisplaySurface::allocate(4, 4, &mut HeapSource);
        surface.draw_pixel(1, 0, palette::REGRESSION);
        let bytes = surface.bytes().unwrap();
        assert_eq!(&bytes[2..4], &[0xF8, 0x00]);
        assert_eq!(surface.read_pixel(1, 0), Some(palette::REGRESSION));
    }

    #[test]
    fn test_out_of_bounds_is_clipped() {
        let mut surface = DisplaySurface::allocate(10, 10, &mut HeapSource);
        surface.draw_pixel(-1, 5, palette::WHITE);
        surface.draw_pixel(10, 5, palette::WHITE);
        surface.fill_rect(-5, -5, 7, 7, palette::WHITE);
        assert_eq!(surface.read_pixel(0, 0), Some(palette::WHITE));
        assert_eq!(surface.read_pixel(1, 1), Some(palette::WHITE));
        assert_eq!(surface.read_pixel(2, 2), Some(palette::BLACK));
    }

    #[test]
    fn test_line_endpoints_inclusive() {
        let mut surface = DisplaySurface::allocate(20, 20, &mut HeapSource);
        surface.draw_line(2, 3, 12, 8, palette::FUNCTION);
        assert_eq!(surface.read_pixel(2, 3), Some(palette::FUNCTION));
        assert_eq!(surface.read_pixel(12, 8), Some(palette::FUNCTION));
    }

    #[test]
    fn test_far_line_is_clipped() {
        let mut surface = DisplaySurface::allocate(20, 20, &mut HeapSource);
        surface.draw_line(-1_000_000, 10, 1_000_000, 10, palette::AXIS);
        for x in 0..20 {
            assert_eq!(surface.read_pixel(x, 10), Some(palette::AXIS));
        }
        assert_eq!(surface.read_pixel(0, 9), Some(palette::BLACK));

        // Entirely outside
        surface.clear(palette::BLACK);
        surface.draw_line(-50, -50, -10, -1, palette::AXIS);
        assert!(surface
            .bytes()
            .unwrap()
            .iter()
            .all(|&b| b == 0));
    }

    #[test]
    fn test_clip_line_diagonal() {
        assert_eq!(
            clip_line((-10, -10), (30, 30), 20, 20),
            Some(((0, 0), (19, 19)))
        );
        assert_eq!(clip_line((25, 0), (40, 10), 20, 20), None);
    }

    #[test]
    fn test_rect_outline() {
        let mut surface = DisplaySurface::allocate(10, 10, &mut HeapSource);
        surface.draw_rect(1, 1, 5, 4, palette::AXIS);
        assert_eq!(surface.read_pixel(1, 1), Some(palette::AXIS));
        assert_eq!(surface.read_pixel(5, 4), Some(palette::AXIS));
        assert_eq!(surface.read_pixel(3, 2), Some(palette::BLACK));
    }

    #[test]
    fn test_filled_circle() {
        let mut surface = DisplaySurface::allocate(20, 20, &mut HeapSource);
        surface.draw_circle(10, 10, 2, palette::DATA_POINTS, true);
        assert_eq!(surface.read_pixel(10, 10), Some(palette::DATA_POINTS));
        assert_eq!(surface.read_pixel(12, 10), Some(palette::DATA_POINTS));
        assert_eq!(surface.read_pixel(10, 14), Some(palette::BLACK));
    }

    #[test]
    fn test_text_sets_pixels() {
        let mut surface = DisplaySurface::allocate(40, 12, &mut HeapSource);
        surface.draw_text("8", 0, 0, palette::TEXT);
        let lit = (0..6)
            .flat_map(|x| (0..10).map(move |y| (x, y)))
            .filter(|&(x, y)| surface.read_pixel(x, y) == Some(palette::TEXT))
            .count();
        assert!(lit > 0);
    }

    #[test]
    fn test_flush_only_when_dirty() {
        let mut surface = DisplaySurface::allocate(8, 8, &mut HeapSource);
        let mut sink = RecordingSink::default();

        assert_eq!(surface.flush(&mut sink, false), Ok(false));
        surface.draw_pixel(0, 0, palette::WHITE);
        assert_eq!(surface.flush(&mut sink, false), Ok(true));
        assert_eq!(surface.flush(&mut sink, false), Ok(false));
        assert_eq!(surface.flush(&mut sink, true), Ok(true));
        assert_eq!(sink.frames, 2);
        assert_eq!(sink.last_len, 8 * 8 * 2);
    }

    #[test]
    fn test_clipped_draws_leave_surface_clean() {
        let mut surface = DisplaySurface::allocate(10, 10, &mut HeapSource);
        let mut sink = RecordingSink::default();
        assert_eq!(surface.flush(&mut sink, true), Ok(true));

        surface.draw_pixel(-5, -5, palette::WHITE);
        assert!(!surface.is_dirty());
        surface.draw_line(-50, -50, -10, -1, palette::WHITE);
        assert!(!surface.is_dirty());
        surface.fill_rect(20, 20, 5, 5, palette::WHITE);
        assert!(!surface.is_dirty());
        surface.draw_circle(-40, 5, 3, palette::WHITE, true);
        assert!(!surface.is_dirty());
        assert_eq!(surface.flush(&mut sink, false), Ok(false));
        assert_eq!(sink.frames, 1);

        // One visible pixel is enough
        surface.draw_line(-5, 0, 0, 0, palette::WHITE);
        assert!(surface.is_dirty());
    }

    #[test]
    fn test_huge_rect_does_not_wrap() {
        let mut surface = DisplaySurface::allocate(10, 10, &mut HeapSource);
        surface.draw_rect(2, 2, u32::MAX, u32::MAX, palette::AXIS);
        assert_eq!(surface.read_pixel(9, 2), Some(palette::AXIS));
        assert_eq!(surface.read_pixel(2, 9), Some(palette::AXIS));
        assert_eq!(surface.read_pixel(5, 5), Some(palette::BLACK));

        surface.fill_rect(i32::MAX, i32::MAX, u32::MAX, u32::MAX, palette::WHITE);
        surface.fill_rect(-3, 8, u32::MAX, 1, palette::WHITE);
        assert_eq!(surface.read_pixel(0, 8), Some(palette::WHITE));
        assert_eq!(surface.read_pixel(9, 8), Some(palette::WHITE));
        assert_eq!(surface.read_pixel(0, 9), Some(palette::BLACK));
    }

    #[test]
    fn test_failed_flush_stays_dirty() {
        let mut surface = DisplaySurface::allocate(8, 8, &mut HeapSource);
        let mut sink = RecordingSink {
            fail: true,
            ..Default::default()
        };
        surface.draw_pixel(0, 0, palette::WHITE);
        assert_eq!(surface.flush(&mut sink, false), Err(()));
        assert!(surface.is_dirty());

        sink.fail = false;
        assert_eq!(surface.flush(&mut sink, false), Ok(true));
        assert!(!surface.is_dirty());
    }
}
