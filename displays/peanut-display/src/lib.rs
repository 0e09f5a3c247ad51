//! Framebuffer surface and drawing primitives for Peanut
//!
//! This crate provides:
//! - [`DisplaySurface`], the single RGB565 framebuffer the whole UI draws into
//! - [`BufferSource`], the fallible "reserve N bytes" seam used at boot
//! - [`FrameSink`], the seam a panel driver implements to receive frames
//! - [`palette`], the fixed colours the graphing views use
//!
//! # Architecture
//!
//! Everything above this crate (graph renderer, menus, games) draws through
//! the surface's primitives or through `embedded-graphics`, since the surface
//! is a `DrawTarget<Color = Rgb565>`. Nothing reaches the panel until
//! [`DisplaySurface::flush`] hands the packed bytes to a sink, and only when
//! something was drawn since the last successful transfer.
//!
//! ## Memory
//!
//! A native 320×240 frame is 150 KiB, a large share of the heap on the target.
//! The surface therefore degrades instead of failing: native size, then half
//! size, then headless.

#![no_std]
#![deny(unsafe_code)]

extern crate alloc;

pub mod palette;
pub mod sink;
pub mod source;
pub mod surface;

// Re-export key types
pub use embedded_graphics::pixelcolor::Rgb565;
pub use sink::FrameSink;
pub use source::{BufferSource, HeapSource};
pub use surface::{DisplaySurface, Resolution, MIN_HEIGHT, MIN_WIDTH};
