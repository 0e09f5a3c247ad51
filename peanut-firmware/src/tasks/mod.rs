//! Embassy tasks
//!
//! The calculator runs everything on one cooperative loop, so there is a
//! single UI task awaited from `main`.

pub mod ui;
