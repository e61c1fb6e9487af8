//! Easel engine crate.
//!
//! Opens a window, repaints a fixed set of shapes (rectangle, circle, line,
//! ellipse) at a capped frame rate, and shuts down when the window is closed.
//!
//! Entry point is [`view::View`]; everything else is the machinery it drives.

pub mod coords;
pub mod device;
pub mod logging;
pub mod paint;
pub mod platform;
pub mod render;
pub mod scene;
pub mod time;
pub mod view;
