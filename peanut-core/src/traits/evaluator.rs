//! Expression evaluator contract
//!
//! The expression language lives elsewhere. Plotting only needs to call a
//! function of one or two variables and get back something that can be
//! placed on a real axis. Results may be real or complex; complex results
//! are plotted by their real part.

/// A value the plotter can place on an axis
pub trait PlotValue: Copy {
    /// Real coordinate to plot; non-finite values are skipped by callers
    fn plot_value(self) -> f32;
}

impl PlotValue for f32 {
    fn plot_value(self) -> f32 {
        self
    }
}

/// Complex evaluator result
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Complex {
    pub re: f32,
    pub im: f32,
}

impl Complex {
    pub const fn new(re: f32, im: f32) -> Self {
        Self { re, im }
    }

    /// Both parts finite
    pub fn is_finite(self) -> bool {
        self.re.is_finite() && self.im.is_finite()
    }
}

impl PlotValue for Complex {
    fn plot_value(self) -> f32 {
        self.re
    }
}

/// Function of one variable, y = f(x)
pub trait Evaluator {
    type Output: PlotValue;

    /// Evaluate at `x`. Failure is reported as a non-finite value.
    fn evaluate(&mut self, x: f32) -> Self::Output;
}

impl<F, T> Evaluator for F
where
    F: FnMut(f32) -> T,
    T: PlotValue,
{
    type Output = T;

    fn evaluate(&mut self, x: f32) -> T {
        self(x)
    }
}

/// Function of two variables, z = f(x, y)
pub trait SurfaceEvaluator {
    type Output: PlotValue;

    /// Evaluate at (x, y). Failure is reported as a non-finite value.
    fn evaluate3d(&mut self, x: f32, y: f32) -> Self::Output;

    /// Expression text identifying this surface, used as a cache key
    fn source(&self) -> &str;
}

/// Surface evaluator built from a closure and its expression text
pub struct NamedSurface<'a, F> {
    source: &'a str,
    f: F,
}

impl<'a, F> NamedSurface<'a, F> {
    pub fn new(source: &'a str, f: F) -> Self {
        Self { source, f }
    }
}

impl<F, T> SurfaceEvaluator for NamedSurface<'_, F>
where
    F: FnMut(f32, f32) -> T,
    T: PlotValue,
{
    type Output = T;

    fn evaluate3d(&mut self, x: f32, y: f32) -> T {
        (self.f)(x, y)
    }

    fn source(&self) -> &str {
        self.source
    }
}
