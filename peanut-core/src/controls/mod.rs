//! Keypad-driven graph navigation
//!
//! ```text
//!            F2                 F1
//!   Mode3D <────> Mode2D <────> Trace
//!                 (F1 out of Trace always lands in 2D)
//! ```
//!
//! [`ViewMode`] is the pure state machine; [`InteractiveControls`] applies
//! each key to the mapper, projector and governor that make up a
//! [`GraphView`] and reports whether the screen needs redrawing.

mod interactive;
mod mode;

pub use interactive::{
    GraphView, InteractiveControls, StatusLine, DEFAULT_TRACE_STEP, PAN_FRACTION, ZOOM_IN, ZOOM_OUT,
};
pub use mode::ViewMode;
