//! Keypad drivers

pub mod gpio_matrix;

pub use gpio_matrix::GpioMatrix;
