//! 2D graph rendering
//!
//! Everything is drawn inside the mapper's viewport. Curves are sampled at
//! evenly spaced x positions computed from the sample index, so the first
//! and last samples land exactly on `x_min` and `x_max`.

use libm::{ceilf, floorf};
use peanut_display::{palette, DisplaySurface, Rgb565};

use super::bounds::{BoundsError, GraphBounds};
use super::mapper::CoordinateMapper;
use crate::geometry::{Point2D, ScreenPoint};
use crate::traits::{Cooperate, Evaluator, PlotValue};

/// Consecutive samples further apart than this (vertically) are not joined
pub const JOIN_THRESHOLD_PX: i32 = 50;

/// Samples between cooperative checkpoints
pub const CHECKPOINT_STRIDE: usize = 32;

/// Major grid spacing in world units
pub const MAJOR_STEP: f32 = 1.0;

/// Minor grid spacing in world units
pub const MINOR_STEP: f32 = 0.2;

/// Minor grid only appears when the x extent is at most this
pub const MINOR_GRID_MAX_WIDTH: f32 = 20.0;

pub const DATA_POINT_RADIUS: u32 = 2;
pub const TRACE_RADIUS: u32 = 3;

/// Relative padding added by [`auto_scale`]
pub const AUTO_SCALE_PADDING: f32 = 0.1;

/// Relative padding on the time axis of [`time_series_bounds`]
pub const TIME_PADDING: f32 = 0.05;

pub const SERIES_POINT_RADIUS: u32 = 1;

/// Bar width in world units; bars sit on integer x positions
pub const BAR_WIDTH: f32 = 0.6;

/// What a plotting pass did
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PlotStats {
    /// Evaluator calls made
    pub evaluated: usize,
    /// Samples that landed in the viewport
    pub plotted: usize,
    /// Line segments drawn between samples
    pub segments: usize,
    /// A checkpoint asked to stop before the pass finished
    pub cancelled: bool,
    /// Trace cursor position, when one was requested and is defined
    pub trace: Option<Point2D>,
}

/// Layers drawn by [`Renderer2D::render_graph`]
#[derive(Debug, Clone, Copy)]
pub struct GraphOptions<'a> {
    pub show_grid: bool,
    pub show_axes: bool,
    pub function_color: Rgb565,
    pub data_points: &'a [Point2D],
    /// (slope, intercept) from the statistics collaborator
    pub regression: Option<(f32, f32)>,
    pub trace_x: Option<f32>,
}

impl Default for GraphOptions<'_> {
    fn default() -> Self {
        Self {
            show_grid: true,
            show_axes: true,
            function_color: palette::FUNCTION,
            data_points: &[],
            regression: None,
            trace_x: None,
        }
    }
}

/// Draws 2D graphs onto a surface through a mapper
pub struct Renderer2D<'a> {
    surface: &'a mut DisplaySurface,
    mapper: &'a CoordinateMapper,
}

impl<'a> Renderer2D<'a> {
    pub fn new(surface: &'a mut DisplaySurface, mapper: &'a CoordinateMapper) -> Self {
        Self { surface, mapper }
    }

    /// Fill the viewport with the background colour
    pub fn clear_graph_area(&mut self) {
        let v = self.mapper.viewport();
        self.surface.fill_rect(
            v.x,
            v.y,
            u32::from(v.width),
            u32::from(v.height),
            palette::BACKGROUND,
        );
    }

    /// Minor grid (when zoomed in far enough) under the major grid
    pub fn draw_grid(&mut self) {
        if self.mapper.bounds().width() <= MINOR_GRID_MAX_WIDTH {
            self.grid_lines(MINOR_STEP, palette::GRID_MINOR);
        }
        self.grid_lines(MAJOR_STEP, palette::GRID_MAJOR);
    }

    fn grid_lines(&mut self, step: f32, color: Rgb565) {
        let b = *self.mapper.bounds();
        let v = *self.mapper.viewport();

        let first = ceilf(b.x_min() / step) as i64;
        let last = floorf(b.x_max() / step) as i64;
        // Lines denser than the pixels would just paint the area solid
        if last >= first && last - first < i64::from(v.width) / 2 {
            for k in first..=last {
                let sx = self.mapper.world_to_screen(k as f32 * step, b.y_max()).x;
                if sx >= v.x && sx <= v.right() {
                    self.surface.draw_vline(sx, v.y, u32::from(v.height), color);
                }
            }
        }

        let first = ceilf(b.y_min() / step) as i64;
        let last = floorf(b.y_max() / step) as i64;
        if last >= first && last - first < i64::from(v.height) / 2 {
            for k in first..=last {
                let sy = self.mapper.world_to_screen(b.x_min(), k as f32 * step).y;
                if sy >= v.y && sy <= v.bottom() {
                    self.surface.draw_hline(v.x, sy, u32::from(v.width), color);
                }
            }
        }
    }

    /// Axes through the origin, where visible
    pub fn draw_axes(&mut self) {
        let b = *self.mapper.bounds();
        let v = *self.mapper.viewport();
        let origin = self.mapper.world_to_screen(0.0, 0.0);

        if b.y_min() <= 0.0 && b.y_max() >= 0.0 {
            self.surface
                .draw_hline(v.x, origin.y, u32::from(v.width), palette::AXIS);
        }
        if b.x_min() <= 0.0 && b.x_max() >= 0.0 {
            self.surface
                .draw_vline(origin.x, v.y, u32::from(v.height), palette::AXIS);
        }
    }

    /// Sample `f` at `samples` points across the bounds and draw the curve
    ///
    /// Non-finite or off-viewport samples break the curve. Neighbouring
    /// samples more than [`JOIN_THRESHOLD_PX`] apart vertically are drawn as
    /// separate points so asymptotes don't turn into vertical walls.
    pub fn plot_function<E, C>(
        &mut self,
        f: &mut E,
        samples: usize,
        color: Rgb565,
        coop: &mut C,
    ) -> PlotStats
    where
        E: Evaluator,
        C: Cooperate,
    {
        let samples = samples.max(2);
        let mut stats = PlotStats::default();
        let mut prev: Option<ScreenPoint> = None;

        for i in 0..samples {
            if i > 0 && i % CHECKPOINT_STRIDE == 0 && coop.checkpoint().is_break() {
                stats.cancelled = true;
                break;
            }

            let x = sample_x(self.mapper, i, samples);
            let y = f.evaluate(x).plot_value();
            stats.evaluated += 1;

            if !y.is_finite() {
                prev = None;
                continue;
            }
            let p = self.mapper.world_to_screen(x, y);
            if !self.mapper.contains_screen(p) {
                prev = None;
                continue;
            }

            match prev {
                Some(q) if (p.y - q.y).abs() < JOIN_THRESHOLD_PX => {
                    self.surface.draw_line(q.x, q.y, p.x, p.y, color);
                    stats.segments += 1;
                }
                _ => self.surface.draw_pixel(p.x, p.y, color),
            }
            stats.plotted += 1;
            prev = Some(p);
        }

        stats
    }

    /// Scatter points as small filled circles
    pub fn plot_data_points(&mut self, points: &[Point2D], color: Rgb565) -> usize {
        let mut drawn = 0;
        for point in points.iter().filter(|p| p.is_finite()) {
            let p = self.mapper.world_to_screen(point.x, point.y);
            if self.mapper.contains_screen(p) {
                self.surface
                    .draw_circle(p.x, p.y, DATA_POINT_RADIUS, color, true);
                drawn += 1;
            }
        }
        drawn
    }

    /// Segment between two world points, clipped to the bounds
    ///
    /// Returns `false` when no part of it is visible.
    pub fn draw_world_segment(&mut self, a: Point2D, b: Point2D, color: Rgb565) -> bool {
        let Some((a, b)) = self.mapper.bounds().clip_segment(a, b) else {
            return false;
        };
        let p = self.mapper.world_to_screen(a.x, a.y);
        let q = self.mapper.world_to_screen(b.x, b.y);
        self.surface.draw_line(p.x, p.y, q.x, q.y, color);
        true
    }

    /// Line `y = slope·x + intercept` across the visible bounds
    pub fn plot_regression_line(&mut self, slope: f32, intercept: f32) -> bool {
        let b = *self.mapper.bounds();
        self.draw_world_segment(
            Point2D::new(b.x_min(), slope * b.x_min() + intercept),
            Point2D::new(b.x_max(), slope * b.x_max() + intercept),
            palette::REGRESSION,
        )
    }

    /// Cursor on the curve at `x`
    ///
    /// Returns the traced point when `f(x)` is finite, whether or not it is
    /// on screen.
    pub fn draw_trace_point<E: Evaluator>(&mut self, f: &mut E, x: f32) -> Option<Point2D> {
        let y = f.evaluate(x).plot_value();
        if !x.is_finite() || !y.is_finite() {
            return None;
        }
        let p = self.mapper.world_to_screen(x, y);
        if self.mapper.contains_screen(p) {
            self.surface
                .draw_circle(p.x, p.y, TRACE_RADIUS, palette::TRACE, true);
        }
        Some(Point2D::new(x, y))
    }

    /// Samples in the given order, optionally joined
    ///
    /// A non-finite sample breaks the line. Returns the samples drawn.
    pub fn plot_time_series(
        &mut self,
        points: &[Point2D],
        color: Rgb565,
        connect: bool,
    ) -> usize {
        let mut drawn = 0;
        let mut prev: Option<Point2D> = None;
        for &point in points {
            if !point.is_finite() {
                prev = None;
                continue;
            }
            if let (true, Some(q)) = (connect, prev) {
                self.draw_world_segment(q, point, color);
            }
            let p = self.mapper.world_to_screen(point.x, point.y);
            if self.mapper.contains_screen(p) {
                self.surface
                    .draw_circle(p.x, p.y, SERIES_POINT_RADIUS, color, true);
                drawn += 1;
            }
            prev = Some(point);
        }
        drawn
    }

    /// One bar per value, bar `i` centred on `x = i` and rising from zero
    ///
    /// Zero and non-finite values get no bar. Bars are clipped to the
    /// bounds and outlined in the axis colour. Returns the bars drawn.
    pub fn plot_bar_chart(&mut self, values: &[f32], color: Rgb565) -> usize {
        let b = *self.mapper.bounds();
        let mut drawn = 0;
        for (i, &value) in values.iter().enumerate() {
            if value == 0.0 || !value.is_finite() {
                continue;
            }
            let center = i as f32;
            let left = (center - BAR_WIDTH / 2.0).max(b.x_min());
            let right = (center + BAR_WIDTH / 2.0).min(b.x_max());
            let top = value.max(0.0).min(b.y_max());
            let bottom = value.min(0.0).max(b.y_min());
            if right <= left || top <= bottom {
                continue;
            }

            let tl = self.mapper.world_to_screen(left, top);
            let br = self.mapper.world_to_screen(right, bottom);
            let width = (br.x - tl.x + 1).max(1) as u32;
            let height = (br.y - tl.y + 1).max(1) as u32;
            self.surface.fill_rect(tl.x, tl.y, width, height, color);
            self.surface
                .draw_rect(tl.x, tl.y, width, height, palette::AXIS);
            drawn += 1;
        }
        drawn
    }

    /// Full graph: background, grid, axes, curve, data, regression, trace
    ///
    /// Stops after the curve if a checkpoint cancelled it.
    pub fn render_graph<E, C>(
        &mut self,
        options: &GraphOptions<'_>,
        f: &mut E,
        samples: usize,
        coop: &mut C,
    ) -> PlotStats
    where
        E: Evaluator,
        C: Cooperate,
    {
        self.clear_graph_area();
        if options.show_grid {
            self.draw_grid();
        }
        if options.show_axes {
            self.draw_axes();
        }

        let mut stats = self.plot_function(f, samples, options.function_color, coop);
        if stats.cancelled {
            return stats;
        }

        if !options.data_points.is_empty() {
            self.plot_data_points(options.data_points, palette::DATA_POINTS);
        }
        if let Some((slope, intercept)) = options.regression {
            self.plot_regression_line(slope, intercept);
        }
        if let Some(x) = options.trace_x {
            stats.trace = self.draw_trace_point(f, x);
        }
        stats
    }
}

/// x of sample `i` out of `n`, endpoints exact
fn sample_x(mapper: &CoordinateMapper, i: usize, n: usize) -> f32 {
    let b = mapper.bounds();
    if i + 1 >= n {
        return b.x_max();
    }
    b.x_min() + i as f32 * b.width() / (n - 1) as f32
}

/// Fit the y-range to `f` over the current x-range
///
/// Samples `samples` points; the new range is the finite min/max padded by
/// 10%, or ±1 around a constant. Returns `Ok(false)` and leaves the bounds
/// alone when no sample is finite.
pub fn auto_scale<E: Evaluator>(
    mapper: &mut CoordinateMapper,
    f: &mut E,
    samples: usize,
) -> Result<bool, BoundsError> {
    let samples = samples.max(2);
    let mut range: Option<(f32, f32)> = None;

    for i in 0..samples {
        let y = f.evaluate(sample_x(mapper, i, samples)).plot_value();
        if !y.is_finite() {
            continue;
        }
        range = Some(match range {
            Some((lo, hi)) => (lo.min(y), hi.max(y)),
            None => (y, y),
        });
    }

    let Some((lo, hi)) = range else {
        return Ok(false);
    };

    let bounds = if hi > lo {
        let pad = (hi - lo) * AUTO_SCALE_PADDING;
        mapper.bounds().with_y_range(lo - pad, hi + pad)
    } else {
        mapper.bounds().with_y_range(lo - 1.0, hi + 1.0)
    }?;
    mapper.set_bounds(bounds);
    Ok(true)
}

/// `(lo, hi)` widened by `fraction` of its span, or by 1 when empty
fn padded(lo: f32, hi: f32, fraction: f32) -> (f32, f32) {
    if hi > lo {
        let pad = (hi - lo) * fraction;
        (lo - pad, hi + pad)
    } else {
        (lo - 1.0, hi + 1.0)
    }
}

/// Window fitted to a time series
///
/// Time gets 5% padding and values 10%. `None` when no sample is finite.
pub fn time_series_bounds(points: &[Point2D]) -> Option<GraphBounds> {
    let mut finite = points.iter().filter(|p| p.is_finite());
    let first = finite.next()?;
    let (mut t_lo, mut t_hi, mut v_lo, mut v_hi) = (first.x, first.x, first.y, first.y);
    for p in finite {
        t_lo = t_lo.min(p.x);
        t_hi = t_hi.max(p.x);
        v_lo = v_lo.min(p.y);
        v_hi = v_hi.max(p.y);
    }
    let (x_min, x_max) = padded(t_lo, t_hi, TIME_PADDING);
    let (y_min, y_max) = padded(v_lo, v_hi, AUTO_SCALE_PADDING);
    GraphBounds::new(x_min, x_max, y_min, y_max).ok()
}

/// Window fitted to [`Renderer2D::plot_bar_chart`]
///
/// Half a slot either side of the bars; the value range always includes
/// zero and is widened by 10% of each end's magnitude. `None` for no values.
pub fn bar_chart_bounds(values: &[f32]) -> Option<GraphBounds> {
    if values.is_empty() {
        return None;
    }
    let (lo, hi) = values
        .iter()
        .filter(|v| v.is_finite())
        .fold((0.0f32, 0.0f32), |(lo, hi), &v| (lo.min(v), hi.max(v)));
    let (y_min, y_max) = if hi > lo {
        (lo - lo.abs() * AUTO_SCALE_PADDING, hi + hi.abs() * AUTO_SCALE_PADDING)
    } else {
        (-1.0, 1.0)
    };
    GraphBounds::new(-0.5, values.len() as f32 - 0.5, y_min, y_max).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::Viewport;
    use crate::traits::Unbounded;
    use core::ops::ControlFlow;
    use peanut_display::HeapSource;

    fn full_screen(bounds: GraphBounds) -> (DisplaySurface, CoordinateMapper) {
        (
            DisplaySurface::allocate(320, 240, &mut HeapSource),
            CoordinateMapper::new(bounds, Viewport::new(0, 0, 320, 240)),
        )
    }

    fn unit_bounds() -> GraphBounds {
        GraphBounds::new(-1.0, 1.0, -1.0, 1.0).unwrap()
    }

    #[test]
    fn test_identity_hits_center_and_corners() {
        let (mut surface, mapper) = full_screen(unit_bounds());
        let stats = Renderer2D::new(&mut surface, &mapper).plot_function(
            &mut |x: f32| x,
            201,
            palette::FUNCTION,
            &mut Unbounded,
        );
        assert_eq!(stats.evaluated, 201);
        assert!(!stats.cancelled);
        for (x, y) in [(159, 119), (0, 239), (319, 0)] {
            assert_eq!(surface.read_pixel(x, y), Some(palette::FUNCTION), "({x}, {y})");
        }
    }

    #[test]
    fn test_nan_breaks_curve() {
        let (mut surface, mapper) = full_screen(unit_bounds());
        let stats = Renderer2D::new(&mut surface, &mapper).plot_function(
            &mut |x: f32| if x.abs() < 0.5 { f32::NAN } else { 0.0 },
            101,
            palette::FUNCTION,
            &mut Unbounded,
        );
        // Nothing drawn where the function is undefined
        assert_eq!(surface.read_pixel(159, 119), Some(palette::BLACK));
        assert!(stats.plotted < stats.evaluated);
        assert_eq!(surface.read_pixel(0, 119), Some(palette::FUNCTION));
    }

    #[test]
    fn test_steep_jump_not_joined() {
        // Step from -0.9 to 0.9: about 215 px apart, must not be joined
        let (mut surface, mapper) = full_screen(unit_bounds());
        Renderer2D::new(&mut surface, &mapper).plot_function(
            &mut |x: f32| if x < 0.0 { -0.9 } else { 0.9 },
            200,
            palette::FUNCTION,
            &mut Unbounded,
        );
        for y in 20..220 {
            assert_eq!(surface.read_pixel(159, y), Some(palette::BLACK));
            assert_eq!(surface.read_pixel(160, y), Some(palette::BLACK));
        }
    }

    #[test]
    fn test_checkpoint_cancels() {
        let (mut surface, mapper) = full_screen(unit_bounds());
        let mut calls = 0;
        let mut coop = || {
            calls += 1;
            ControlFlow::Break(())
        };
        let stats = Renderer2D::new(&mut surface, &mapper).plot_function(
            &mut |x: f32| x,
            500,
            palette::FUNCTION,
            &mut coop,
        );
        assert!(stats.cancelled);
        assert_eq!(stats.evaluated, CHECKPOINT_STRIDE);
        assert_eq!(calls, 1);
    }

    #[test]
    fn test_axes_and_grid() {
        let (mut surface, mapper) = full_screen(GraphBounds::DEFAULT);
        let mut r = Renderer2D::new(&mut surface, &mapper);
        r.clear_graph_area();
        r.draw_grid();
        r.draw_axes();
        let origin = mapper.world_to_screen(0.0, 0.0);
        assert_eq!(surface.read_pixel(origin.x, 5), Some(palette::AXIS));
        assert_eq!(surface.read_pixel(5, origin.y), Some(palette::AXIS));
        let one = mapper.world_to_screen(1.0, 0.0);
        assert_eq!(surface.read_pixel(one.x, 3), Some(palette::GRID_MAJOR));
        let fifth = mapper.world_to_screen(0.2, 0.0);
        assert_eq!(surface.read_pixel(fifth.x, 3), Some(palette::GRID_MINOR));
    }

    #[test]
    fn test_no_minor_grid_when_zoomed_out() {
        let (mut surface, mapper) =
            full_screen(GraphBounds::new(-20.0, 20.0, -20.0, 20.0).unwrap());
        Renderer2D::new(&mut surface, &mapper).draw_grid();
        let fifth = mapper.world_to_screen(0.2, 0.0);
        assert_ne!(surface.read_pixel(fifth.x, 3), Some(palette::GRID_MINOR));
    }

    #[test]
    fn test_axes_skipped_when_origin_hidden() {
        let (mut surface, mapper) = full_screen(GraphBounds::new(1.0, 5.0, 1.0, 5.0).unwrap());
        Renderer2D::new(&mut surface, &mapper).draw_axes();
        assert!(!surface.is_dirty());
    }

    #[test]
    fn test_data_points_and_trace() {
        let (mut surface, mapper) = full_screen(GraphBounds::DEFAULT);
        let mut r = Renderer2D::new(&mut surface, &mapper);
        let drawn = r.plot_data_points(
            &[
                Point2D::new(1.0, 1.0),
                Point2D::new(50.0, 1.0),
                Point2D::new(f32::NAN, 0.0),
            ],
            palette::DATA_POINTS,
        );
        assert_eq!(drawn, 1);

        let traced = r.draw_trace_point(&mut |x: f32| x * x, 2.0);
        assert_eq!(traced, Some(Point2D::new(2.0, 4.0)));
        assert_eq!(r.draw_trace_point(&mut |_x: f32| f32::INFINITY, 2.0), None);

        let p = mapper.world_to_screen(1.0, 1.0);
        assert_eq!(surface.read_pixel(p.x, p.y), Some(palette::DATA_POINTS));
        let t = mapper.world_to_screen(2.0, 4.0);
        assert_eq!(surface.read_pixel(t.x, t.y), Some(palette::TRACE));
    }

    #[test]
    fn test_regression_line_clipped() {
        let (mut surface, mapper) = full_screen(GraphBounds::DEFAULT);
        let mut r = Renderer2D::new(&mut surface, &mapper);
        assert!(r.plot_regression_line(0.0, 2.0));
        let p = mapper.world_to_screen(0.0, 2.0);
        assert_eq!(surface.read_pixel(p.x, p.y), Some(palette::REGRESSION));

        let mut r = Renderer2D::new(&mut surface, &mapper);
        assert!(!r.plot_regression_line(0.0, 50.0));
    }

    #[test]
    fn test_render_graph_reports_trace() {
        let (mut surface, mapper) = full_screen(GraphBounds::DEFAULT);
        let options = GraphOptions {
            trace_x: Some(1.0),
            ..Default::default()
        };
        let stats = Renderer2D::new(&mut surface, &mapper).render_graph(
            &options,
            &mut |x: f32| 2.0 * x,
            100,
            &mut Unbounded,
        );
        assert_eq!(stats.trace, Some(Point2D::new(1.0, 2.0)));
        assert_eq!(stats.evaluated, 100);
    }

    #[test]
    fn test_auto_scale() {
        let mut mapper = CoordinateMapper::new(
            GraphBounds::new(0.0, 1.0, -10.0, 10.0).unwrap(),
            Viewport::new(0, 0, 320, 240),
        );
        assert_eq!(auto_scale(&mut mapper, &mut |x: f32| 10.0 * x, 100), Ok(true));
        let b = mapper.bounds();
        assert!((b.y_min() - -1.0).abs() < 1e-5);
        assert!((b.y_max() - 11.0).abs() < 1e-5);
        assert_eq!(b.x_min(), 0.0);
    }

    #[test]
    fn test_auto_scale_constant_and_undefined() {
        let mut mapper =
            CoordinateMapper::new(GraphBounds::DEFAULT, Viewport::new(0, 0, 320, 240));
        assert_eq!(auto_scale(&mut mapper, &mut |_x: f32| 3.0, 100), Ok(true));
        assert_eq!(mapper.bounds().y_min(), 2.0);
        assert_eq!(mapper.bounds().y_max(), 4.0);

        let before = *mapper.bounds();
        assert_eq!(
            auto_scale(&mut mapper, &mut |_x: f32| f32::NAN, 100),
            Ok(false)
        );
        assert_eq!(*mapper.bounds(), before);
    }

    #[test]
    fn test_time_series_joins_samples() {
        let bounds = GraphBounds::new(0.0, 10.0, 0.0, 10.0).unwrap();
        let (mut surface, mapper) = full_screen(bounds);
        let series = [
            Point2D::new(1.0, 1.0),
            Point2D::new(5.0, 5.0),
            Point2D::new(9.0, 1.0),
        ];
        let drawn =
            Renderer2D::new(&mut surface, &mapper).plot_time_series(&series, palette::FUNCTION, true);
        assert_eq!(drawn, 3);
        let mid = mapper.world_to_screen(3.0, 3.0);
        assert_eq!(surface.read_pixel(mid.x, mid.y), Some(palette::FUNCTION));

        // Unjoined, only the markers
        let (mut surface, mapper) = full_screen(bounds);
        Renderer2D::new(&mut surface, &mapper).plot_time_series(&series, palette::FUNCTION, false);
        assert_eq!(surface.read_pixel(mid.x, mid.y), Some(palette::BLACK));
        let peak = mapper.world_to_screen(5.0, 5.0);
        assert_eq!(surface.read_pixel(peak.x, peak.y), Some(palette::FUNCTION));
    }

    #[test]
    fn test_time_series_gap_breaks_line() {
        let bounds = GraphBounds::new(0.0, 10.0, 0.0, 10.0).unwrap();
        let (mut surface, mapper) = full_screen(bounds);
        let series = [
            Point2D::new(1.0, 1.0),
            Point2D::new(f32::NAN, 0.0),
            Point2D::new(9.0, 1.0),
        ];
        let drawn =
            Renderer2D::new(&mut surface, &mapper).plot_time_series(&series, palette::FUNCTION, true);
        assert_eq!(drawn, 2);
        let mid = mapper.world_to_screen(5.0, 1.0);
        assert_eq!(surface.read_pixel(mid.x, mid.y), Some(palette::BLACK));
    }

    #[test]
    fn test_time_series_bounds() {
        let b = time_series_bounds(&[
            Point2D::new(0.0, 1.0),
            Point2D::new(10.0, 3.0),
            Point2D::new(20.0, 2.0),
        ])
        .unwrap();
        assert!((b.x_min() - -1.0).abs() < 1e-5);
        assert!((b.x_max() - 21.0).abs() < 1e-5);
        assert!((b.y_min() - 0.8).abs() < 1e-5);
        assert!((b.y_max() - 3.2).abs() < 1e-5);

        let single = time_series_bounds(&[Point2D::new(4.0, 2.0)]).unwrap();
        assert_eq!((single.x_min(), single.x_max()), (3.0, 5.0));
        assert_eq!((single.y_min(), single.y_max()), (1.0, 3.0));

        assert_eq!(time_series_bounds(&[]), None);
        assert_eq!(time_series_bounds(&[Point2D::new(f32::NAN, 1.0)]), None);
    }

    #[test]
    fn test_bar_chart() {
        let values = [2.0, 0.0, -1.0, 4.0];
        let bounds = bar_chart_bounds(&values).unwrap();
        let (mut surface, mapper) = full_screen(bounds);
        let drawn = Renderer2D::new(&mut surface, &mapper).plot_bar_chart(&values, palette::FUNCTION);
        assert_eq!(drawn, 3);

        let inside = mapper.world_to_screen(0.0, 1.0);
        assert_eq!(surface.read_pixel(inside.x, inside.y), Some(palette::FUNCTION));
        let below = mapper.world_to_screen(2.0, -0.5);
        assert_eq!(surface.read_pixel(below.x, below.y), Some(palette::FUNCTION));
        let corner = mapper.world_to_screen(-BAR_WIDTH / 2.0, 2.0);
        assert_eq!(surface.read_pixel(corner.x, corner.y), Some(palette::AXIS));
        // Zero value leaves its slot empty
        let empty = mapper.world_to_screen(1.0, 0.5);
        assert_eq!(surface.read_pixel(empty.x, empty.y), Some(palette::BLACK));
    }

    #[test]
    fn test_bar_clipped_to_bounds() {
        let bounds = GraphBounds::new(-0.5, 0.5, -1.0, 1.0).unwrap();
        let (mut surface, mapper) = full_screen(bounds);
        let mut r = Renderer2D::new(&mut surface, &mapper);
        assert_eq!(r.plot_bar_chart(&[100.0, 5.0], palette::FUNCTION), 1);
        let high = mapper.world_to_screen(0.0, 0.8);
        assert_eq!(surface.read_pixel(high.x, high.y), Some(palette::FUNCTION));

        // Entirely below the window
        let bounds = GraphBounds::new(-0.5, 0.5, 5.0, 10.0).unwrap();
        let (mut surface, mapper) = full_screen(bounds);
        assert_eq!(
            Renderer2D::new(&mut surface, &mapper).plot_bar_chart(&[3.0], palette::FUNCTION),
            0
        );
        assert!(!surface.is_dirty());
    }

    #[test]
    fn test_bar_chart_bounds() {
        let b = bar_chart_bounds(&[2.0, -1.0, 4.0]).unwrap();
        assert_eq!((b.x_min(), b.x_max()), (-0.5, 2.5));
        assert!((b.y_min() - -1.1).abs() < 1e-5);
        assert!((b.y_max() - 4.4).abs() < 1e-5);

        // All positive still starts at zero
        let b = bar_chart_bounds(&[3.0, 5.0]).unwrap();
        assert_eq!(b.y_min(), 0.0);

        let flat = bar_chart_bounds(&[0.0, 0.0]).unwrap();
        assert_eq!((flat.y_min(), flat.y_max()), (-1.0, 1.0));
        assert_eq!(bar_chart_bounds(&[]), None);
    }
}
