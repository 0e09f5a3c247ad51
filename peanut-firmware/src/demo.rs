//! Built-in graphs for the standalone graph screen
//!
//! The expression parser is a separate component. Until it is wired in, the
//! graph screen plots these fixed functions and data sets.

use peanut_core::geometry::Point2D;
use peanut_core::graph::{bar_chart_bounds, time_series_bounds, GraphBounds};
use peanut_core::graph::complex::mandelbrot_bounds;
use peanut_core::traits::Complex;

pub const SURFACE_SOURCE: &str = "sin(x)*cos(y)";

/// Domain of the surface plot on both axes
pub const SURFACE_RANGE: (f32, f32) = (-5.0, 5.0);

pub fn wave(x: f32) -> f32 {
    libm::sinf(x)
}

pub fn surface(x: f32, y: f32) -> f32 {
    libm::sinf(x) * libm::cosf(y)
}

pub const SCATTER: [Point2D; 8] = [
    Point2D::new(-7.0, -4.1),
    Point2D::new(-5.0, -2.6),
    Point2D::new(-3.0, -1.9),
    Point2D::new(-1.0, -0.2),
    Point2D::new(1.0, 0.4),
    Point2D::new(3.0, 2.1),
    Point2D::new(5.0, 2.7),
    Point2D::new(7.0, 4.4),
];

/// Hourly readings, (hour, value)
pub const SERIES: [Point2D; 8] = [
    Point2D::new(0.0, 12.5),
    Point2D::new(1.0, 13.1),
    Point2D::new(2.0, 15.8),
    Point2D::new(3.0, 18.2),
    Point2D::new(4.0, 17.4),
    Point2D::new(5.0, 16.0),
    Point2D::new(6.0, 14.9),
    Point2D::new(7.0, 13.3),
];

pub const BARS: [f32; 6] = [3.0, 7.0, -2.0, 5.5, 0.0, 4.0];

pub const ROOTS: [Complex; 4] = [
    Complex::new(1.0, 1.0),
    Complex::new(1.0, -1.0),
    Complex::new(-2.0, 0.5),
    Complex::new(-0.5, -1.5),
];

/// Least-squares (slope, intercept); `None` when x has no spread
pub fn fit_line(points: &[Point2D]) -> Option<(f32, f32)> {
    let n = points.len() as f32;
    if points.len() < 2 {
        return None;
    }
    let mean_x = points.iter().map(|p| p.x).sum::<f32>() / n;
    let mean_y = points.iter().map(|p| p.y).sum::<f32>() / n;
    let (mut sxy, mut sxx) = (0.0, 0.0);
    for p in points {
        sxy += (p.x - mean_x) * (p.y - mean_y);
        sxx += (p.x - mean_x) * (p.x - mean_x);
    }
    if sxx == 0.0 {
        return None;
    }
    let slope = sxy / sxx;
    Some((slope, mean_y - slope * mean_x))
}

/// What the 2D screen is showing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, defmt::Format)]
pub enum GraphKind {
    #[default]
    Function,
    Scatter,
    TimeSeries,
    Bars,
    Complex,
    Mandelbrot,
}

impl GraphKind {
    pub fn next(self) -> Self {
        match self {
            GraphKind::Function => GraphKind::Scatter,
            GraphKind::Scatter => GraphKind::TimeSeries,
            GraphKind::TimeSeries => GraphKind::Bars,
            GraphKind::Bars => GraphKind::Complex,
            GraphKind::Complex => GraphKind::Mandelbrot,
            GraphKind::Mandelbrot => GraphKind::Function,
        }
    }

    /// Bounds to start from when this kind is selected
    ///
    /// `None` keeps the default window. The complex view fits its own.
    pub fn initial_bounds(self) -> Option<GraphBounds> {
        match self {
            GraphKind::TimeSeries => time_series_bounds(&SERIES),
            GraphKind::Bars => bar_chart_bounds(&BARS),
            GraphKind::Mandelbrot => mandelbrot_bounds(Complex::new(-0.5, 0.0), 0.8).ok(),
            _ => None,
        }
    }
}
