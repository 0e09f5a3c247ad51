//! Graph bounds

use crate::geometry::Point2D;

/// Rejected bounds mutation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BoundsError {
    /// A limit or extent is NaN or infinite
    NonFinite,
    /// `max <= min` on some axis
    Degenerate,
    /// Zoom factor not finite and positive
    InvalidFactor,
}

/// Visible rectangle of the plane
///
/// Always satisfies `x_max > x_min`, `y_max > y_min` with every limit and
/// extent finite. The constructor and the two mutators are the only way to
/// change it and all of them validate.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct GraphBounds {
    x_min: f32,
    x_max: f32,
    y_min: f32,
    y_max: f32,
}

impl Default for GraphBounds {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl GraphBounds {
    /// Standard window, -10..10 on both axes
    pub const DEFAULT: Self = Self {
        x_min: -10.0,
        x_max: 10.0,
        y_min: -10.0,
        y_max: 10.0,
    };

    /// Validating constructor
    pub fn new(x_min: f32, x_max: f32, y_min: f32, y_max: f32) -> Result<Self, BoundsError> {
        let finite = [x_min, x_max, y_min, y_max, x_max - x_min, y_max - y_min]
            .iter()
            .all(|v| v.is_finite());
        if !finite {
            return Err(BoundsError::NonFinite);
        }
        if x_max <= x_min || y_max <= y_min {
            return Err(BoundsError::Degenerate);
        }
        Ok(Self {
            x_min,
            x_max,
            y_min,
            y_max,
        })
    }

    pub fn x_min(&self) -> f32 {
        self.x_min
    }

    pub fn x_max(&self) -> f32 {
        self.x_max
    }

    pub fn y_min(&self) -> f32 {
        self.y_min
    }

    pub fn y_max(&self) -> f32 {
        self.y_max
    }

    pub fn width(&self) -> f32 {
        self.x_max - self.x_min
    }

    pub fn height(&self) -> f32 {
        self.y_max - self.y_min
    }

    pub fn center(&self) -> Point2D {
        Point2D::new(
            self.x_min + self.width() / 2.0,
            self.y_min + self.height() / 2.0,
        )
    }

    /// Same x-range, new y-range
    pub fn with_y_range(&self, y_min: f32, y_max: f32) -> Result<Self, BoundsError> {
        Self::new(self.x_min, self.x_max, y_min, y_max)
    }

    /// Scale both extents by `1 / factor`, keeping `center` fixed
    ///
    /// `center` defaults to the current centre. Leaves the bounds untouched
    /// on error.
    pub fn zoom(&mut self, factor: f32, center: Option<Point2D>) -> Result<(), BoundsError> {
        if !factor.is_finite() || factor <= 0.0 {
            return Err(BoundsError::InvalidFactor);
        }
        let c = center.unwrap_or_else(|| self.center());
        *self = Self::new(
            c.x - (c.x - self.x_min) / factor,
            c.x + (self.x_max - c.x) / factor,
            c.y - (c.y - self.y_min) / factor,
            c.y + (self.y_max - c.y) / factor,
        )?;
        Ok(())
    }

    /// Translate by (dx, dy) world units
    pub fn pan(&mut self, dx: f32, dy: f32) -> Result<(), BoundsError> {
        *self = Self::new(
            self.x_min + dx,
            self.x_max + dx,
            self.y_min + dy,
            self.y_max + dy,
        )?;
        Ok(())
    }

    /// Clip segment a→b to the bounds (Liang-Barsky)
    pub fn clip_segment(&self, a: Point2D, b: Point2D) -> Option<(Point2D, Point2D)> {
        if !a.is_finite() || !b.is_finite() {
            return None;
        }
        let (dx, dy) = (b.x - a.x, b.y - a.y);
        let mut t0 = 0.0f32;
        let mut t1 = 1.0f32;
        let edges = [
            (-dx, a.x - self.x_min),
            (dx, self.x_max - a.x),
            (-dy, a.y - self.y_min),
            (dy, self.y_max - a.y),
        ];
        for (p, q) in edges {
            if p == 0.0 {
                if q < 0.0 {
                    return None;
                }
                continue;
            }
            let t = q / p;
            if p < 0.0 {
                if t > t1 {
                    return None;
                }
                t0 = t0.max(t);
            } else {
                if t < t0 {
                    return None;
                }
                t1 = t1.min(t);
            }
        }
        Some((
            Point2D::new(a.x + t0 * dx, a.y + t0 * dy),
            Point2D::new(a.x + t1 * dx, a.y + t1 * dy),
        ))
    }
}
