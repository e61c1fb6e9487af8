//! Paint model shared between the scene and the renderer.
//!
//! Shapes are filled with a single solid color; geometry stays in `coords`.

pub mod color;

pub use color::Color;
