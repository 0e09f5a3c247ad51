//! Closed-loop render quality control
//!
//! The governor watches how long frames take and nudges the quality
//! profile (curve samples, mesh resolution, fractal iterations) down when
//! the moving average is well over budget and up when it is well under. It
//! is advisory: it never interrupts a frame, it only changes what the next
//! one asks for.

mod monitor;
mod profile;

pub use monitor::{
    FrameVerdict, GovernorStats, PerformanceGovernor, DEFAULT_MEMORY_RESERVE, DEFAULT_TARGET_FPS,
    FRAME_WINDOW, PRESSURE_SAMPLES,
};
pub use profile::{PerformanceMode, QualityBounds, QualityProfile, ITERATIONS, MESH, SAMPLES};
