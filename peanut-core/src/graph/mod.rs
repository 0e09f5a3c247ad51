//! 2D graphing
//!
//! - [`GraphBounds`] - the visible window of the mathematical plane
//! - [`CoordinateMapper`] - bounds ↔ pixel viewport conversion
//! - [`Renderer2D`] - grid, axes, curves, scatter data and trace cursor,
//!   plus time series and bar charts
//! - [`complex`] - complex plane and escape-time fractal views

mod bounds;
pub mod complex;
mod mapper;
mod render;

pub use bounds::{BoundsError, GraphBounds};
pub use mapper::{CoordinateMapper, Viewport};
pub use render::{
    auto_scale, bar_chart_bounds, time_series_bounds, GraphOptions, PlotStats, Renderer2D,
};
