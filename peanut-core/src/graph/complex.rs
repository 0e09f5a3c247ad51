//! Complex plane and escape-time fractal views

use peanut_display::{palette, DisplaySurface, Rgb565};

use super::bounds::{BoundsError, GraphBounds};
use super::mapper::CoordinateMapper;
use super::render::{Renderer2D, AUTO_SCALE_PADDING};
use crate::geometry::Point2D;
use crate::traits::{Complex, Cooperate};

/// Fractal pixel block edge
pub const BLOCK: i32 = 2;

/// Block rows between cooperative checkpoints
pub const ROWS_PER_CHECKPOINT: usize = 4;

/// Bounds enclosing every finite point, padded by 10% (±1 on a flat axis)
pub fn fit_complex_bounds(points: &[Complex]) -> Option<GraphBounds> {
    let mut iter = points.iter().filter(|z| z.is_finite());
    let first = iter.next()?;
    let (mut re_lo, mut re_hi, mut im_lo, mut im_hi) = (first.re, first.re, first.im, first.im);
    for z in iter {
        re_lo = re_lo.min(z.re);
        re_hi = re_hi.max(z.re);
        im_lo = im_lo.min(z.im);
        im_hi = im_hi.max(z.im);
    }
    let (re_lo, re_hi) = pad(re_lo, re_hi);
    let (im_lo, im_hi) = pad(im_lo, im_hi);
    GraphBounds::new(re_lo, re_hi, im_lo, im_hi).ok()
}

fn pad(lo: f32, hi: f32) -> (f32, f32) {
    if hi > lo {
        let p = (hi - lo) * AUTO_SCALE_PADDING;
        (lo - p, hi + p)
    } else {
        (lo - 1.0, hi + 1.0)
    }
}

/// Plot complex numbers as points with vectors from the origin
///
/// Refits the mapper's bounds to the points first. Returns how many points
/// were drawn; with no finite point nothing changes.
pub fn plot_complex_plane(
    surface: &mut DisplaySurface,
    mapper: &mut CoordinateMapper,
    points: &[Complex],
    color: Rgb565,
) -> usize {
    let Some(bounds) = fit_complex_bounds(points) else {
        return 0;
    };
    mapper.set_bounds(bounds);

    let mut renderer = Renderer2D::new(surface, mapper);
    renderer.clear_graph_area();
    renderer.draw_grid();
    renderer.draw_axes();

    let mut drawn = 0;
    let origin = Point2D::new(0.0, 0.0);
    for z in points.iter().filter(|z| z.is_finite()) {
        let tip = Point2D::new(z.re, z.im);
        drawn += renderer.plot_data_points(&[tip], color);
        renderer.draw_world_segment(origin, tip, color);
    }
    drawn
}

/// Bounds for a Mandelbrot view: a 2/zoom square around `center`
pub fn mandelbrot_bounds(center: Complex, zoom: f32) -> Result<GraphBounds, BoundsError> {
    if !zoom.is_finite() || zoom <= 0.0 {
        return Err(BoundsError::InvalidFactor);
    }
    let half = 1.0 / zoom;
    GraphBounds::new(
        center.re - half,
        center.re + half,
        center.im - half,
        center.im + half,
    )
}

/// Iterations of z ← z² + c before |z| exceeds 2, capped at `limit`
pub fn escape_iterations(c: Complex, limit: u32) -> u32 {
    let (mut re, mut im) = (0.0f32, 0.0f32);
    let mut iterations = 0;
    while re * re + im * im <= 4.0 && iterations < limit {
        let next_re = re * re - im * im + c.re;
        im = 2.0 * re * im + c.im;
        re = next_re;
        iterations += 1;
    }
    iterations
}

/// Shade the viewport by escape time in 2×2 pixel blocks
///
/// Points that never escape use the background colour. Returns `false`
/// if a checkpoint cancelled the pass.
pub fn plot_mandelbrot<C: Cooperate>(
    surface: &mut DisplaySurface,
    mapper: &CoordinateMapper,
    iteration_limit: u32,
    coop: &mut C,
) -> bool {
    let v = *mapper.viewport();
    for (row, sy) in (v.y..=v.bottom()).step_by(BLOCK as usize).enumerate() {
        if row > 0 && row % ROWS_PER_CHECKPOINT == 0 && coop.checkpoint().is_break() {
            return false;
        }
        let block_h = BLOCK.min(v.bottom() - sy + 1) as u32;
        for sx in (v.x..=v.right()).step_by(BLOCK as usize) {
            let w = mapper.screen_to_world(sx, sy);
            let iterations = escape_iterations(Complex::new(w.x, w.y), iteration_limit);
            let color = if iterations >= iteration_limit {
                palette::BACKGROUND
            } else {
                palette::escape_color(iterations)
            };
            let block_w = BLOCK.min(v.right() - sx + 1) as u32;
            surface.fill_rect(sx, sy, block_w, block_h, color);
        }
    }
    true
}
