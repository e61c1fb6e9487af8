//! GPU rendering subsystem.
//!
//! CPU geometry is in surface pixels (top-left origin, +Y down); the shape
//! shader converts to NDC from the surface size it receives in a uniform.

pub mod shapes;
