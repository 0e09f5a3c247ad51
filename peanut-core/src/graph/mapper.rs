//! World ↔ screen coordinate mapping
//!
//! The viewport's first and last pixel columns correspond exactly to
//! `x_min` and `x_max` (likewise rows to `y_max` and `y_min`), so a range
//! of `w` pixels spans `w - 1` steps.

use libm::floorf;

use super::bounds::{BoundsError, GraphBounds};
use crate::geometry::{Point2D, ScreenPoint};

/// Pixel rectangle the graph occupies on the surface
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Viewport {
    pub x: i32,
    pub y: i32,
    pub width: u16,
    pub height: u16,
}

impl Viewport {
    pub const fn new(x: i32, y: i32, width: u16, height: u16) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Viewport inset by a margin on every side of a surface
    pub fn inset(surface_width: u16, surface_height: u16, margin_x: u16, margin_y: u16) -> Self {
        Self::new(
            i32::from(margin_x),
            i32::from(margin_y),
            surface_width.saturating_sub(margin_x.saturating_mul(2)).max(1),
            surface_height.saturating_sub(margin_y.saturating_mul(2)).max(1),
        )
    }

    pub fn right(&self) -> i32 {
        self.x + i32::from(self.width) - 1
    }

    pub fn bottom(&self) -> i32 {
        self.y + i32::from(self.height) - 1
    }

    pub fn contains(&self, p: ScreenPoint) -> bool {
        p.x >= self.x && p.x <= self.right() && p.y >= self.y && p.y <= self.bottom()
    }

    pub fn center(&self) -> ScreenPoint {
        ScreenPoint::new(
            self.x + i32::from(self.width) / 2,
            self.y + i32::from(self.height) / 2,
        )
    }
}

/// Bounds plus the viewport they are drawn into
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CoordinateMapper {
    bounds: GraphBounds,
    viewport: Viewport,
}

impl CoordinateMapper {
    pub fn new(bounds: GraphBounds, viewport: Viewport) -> Self {
        Self { bounds, viewport }
    }

    pub fn bounds(&self) -> &GraphBounds {
        &self.bounds
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    /// Replace the bounds wholesale (already validated by construction)
    pub fn set_bounds(&mut self, bounds: GraphBounds) {
        self.bounds = bounds;
    }

    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }

    /// Map a world point to its pixel
    ///
    /// Points outside the bounds map outside the viewport; huge values
    /// saturate at the `i32` limits.
    pub fn world_to_screen(&self, x: f32, y: f32) -> ScreenPoint {
        let span_x = f32::from(self.viewport.width.saturating_sub(1));
        let span_y = f32::from(self.viewport.height.saturating_sub(1));
        let sx = floorf((x - self.bounds.x_min()) * span_x / self.bounds.width());
        let sy = floorf((self.bounds.y_max() - y) * span_y / self.bounds.height());
        ScreenPoint::new(
            self.viewport.x.saturating_add(sx as i32),
            self.viewport.y.saturating_add(sy as i32),
        )
    }

    /// Inverse of the linear map behind [`world_to_screen`](Self::world_to_screen)
    pub fn screen_to_world(&self, sx: i32, sy: i32) -> Point2D {
        let span_x = f32::from(self.viewport.width.saturating_sub(1)).max(1.0);
        let span_y = f32::from(self.viewport.height.saturating_sub(1)).max(1.0);
        let dx = (sx - self.viewport.x) as f32;
        let dy = (sy - self.viewport.y) as f32;
        Point2D::new(
            self.bounds.x_min() + dx * self.bounds.width() / span_x,
            self.bounds.y_max() - dy * self.bounds.height() / span_y,
        )
    }

    pub fn contains_screen(&self, p: ScreenPoint) -> bool {
        self.viewport.contains(p)
    }

    /// See [`GraphBounds::zoom`]
    pub fn zoom(&mut self, factor: f32, center: Option<Point2D>) -> Result<(), BoundsError> {
        self.bounds.zoom(factor, center)
    }

    /// See [`GraphBounds::pan`]
    pub fn pan(&mut self, dx: f32, dy: f32) -> Result<(), BoundsError> {
        self.bounds.pan(dx, dy)
    }

    /// Back to -10..10 on both axes
    pub fn reset(&mut self) {
        self.bounds = GraphBounds::DEFAULT;
    }
}
