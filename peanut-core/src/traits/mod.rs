//! Seams between the core logic and everything it does not own
//!
//! These traits allow the core logic to be tested with mock
//! implementations and to stay independent of the board and of the
//! expression language.

pub mod cooperate;
pub mod evaluator;
pub mod matrix;

pub use cooperate::{Cooperate, Unbounded};
pub use evaluator::{Complex, Evaluator, NamedSurface, PlotValue, SurfaceEvaluator};
pub use matrix::KeyMatrix;
