//! RGB565 colours used by the graphing views

use embedded_graphics::pixelcolor::Rgb565;

pub const BLACK: Rgb565 = Rgb565::new(0, 0, 0);
pub const WHITE: Rgb565 = Rgb565::new(31, 63, 31);

/// Graph background
pub const BACKGROUND: Rgb565 = BLACK;
/// Major grid lines (0x4208)
pub const GRID_MAJOR: Rgb565 = Rgb565::new(8, 16, 8);
/// Minor grid lines (0x2104)
pub const GRID_MINOR: Rgb565 = Rgb565::new(4, 8, 4);
/// Coordinate axes
pub const AXIS: Rgb565 = WHITE;
/// Plotted function curves (0x07E0)
pub const FUNCTION: Rgb565 = Rgb565::new(0, 63, 0);
/// Scatter data points (0x001F)
pub const DATA_POINTS: Rgb565 = Rgb565::new(0, 0, 31);
/// Regression line (0xF800)
pub const REGRESSION: Rgb565 = Rgb565::new(31, 0, 0);
/// Trace cursor (0xFFE0)
pub const TRACE: Rgb565 = Rgb565::new(31, 63, 0);
/// Status and label text
pub const TEXT: Rgb565 = WHITE;
/// 3D X axis
pub const AXIS_X: Rgb565 = Rgb565::new(31, 0, 0);
/// 3D Y axis
pub const AXIS_Y: Rgb565 = Rgb565::new(0, 63, 0);
/// 3D Z axis
pub const AXIS_Z: Rgb565 = Rgb565::new(0, 0, 31);
/// Wireframe edges
pub const WIREFRAME: Rgb565 = Rgb565::new(0, 63, 31);

/// Fractal escape colour for an iteration count
///
/// Intensity is `min(255, iterations * 5)`, placed in the red channel.
pub fn escape_color(iterations: u32) -> Rgb565 {
    let intensity = iterations.saturating_mul(5).min(255);
    Rgb565::new((intensity >> 3) as u8, 0, 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use embedded_graphics::pixelcolor::IntoStorage;

    #[test]
    fn test_raw_values() {
        assert_eq!(GRID_MAJOR.into_storage(), 0x4208);
        assert_eq!(GRID_MINOR.into_storage(), 0x2104);
        assert_eq!(FUNCTION.into_storage(), 0x07E0);
        assert_eq!(DATA_POINTS.into_storage(), 0x001F);
        assert_eq!(REGRESSION.into_storage(), 0xF800);
        assert_eq!(TRACE.into_storage(), 0xFFE0);
        assert_eq!(AXIS.into_storage(), 0xFFFF);
    }

    #[test]
    fn test_escape_color_saturates() {
        assert_eq!(escape_color(0).into_storage(), 0);
        assert_eq!(escape_color(10).into_storage(), (50 >> 3) << 11);
        assert_eq!(escape_color(1000).into_storage(), 31 << 11);
    }
}
