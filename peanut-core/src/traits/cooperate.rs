//! Cooperative yield points for long drawing loops
//!
//! The UI runs on a single task. Sampling a function or meshing a surface
//! can take longer than a frame, so those loops call
//! [`Cooperate::checkpoint`] at a fixed stride. The implementor may poll
//! input, check a deadline, or do nothing; returning `Break` abandons the
//! current drawing. A partially drawn frame is never flushed as final, the
//! next full redraw supersedes it.

use core::ops::ControlFlow;

/// Checkpoint called from inside long loops
pub trait Cooperate {
    /// `Continue` to keep going, `Break` to abandon the current work
    fn checkpoint(&mut self) -> ControlFlow<()>;
}

/// Never interrupts
#[derive(Debug, Clone, Copy, Default)]
pub struct Unbounded;

impl Cooperate for Unbounded {
    fn checkpoint(&mut self) -> ControlFlow<()> {
        ControlFlow::Continue(())
    }
}

impl<F: FnMut() -> ControlFlow<()>> Cooperate for F {
    fn checkpoint(&mut self) -> ControlFlow<()> {
        self()
    }
}
