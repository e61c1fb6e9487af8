//! Coordinate and geometry types shared by the scene and the renderer.
//!
//! Canonical CPU space:
//! - Surface pixels
//! - Origin top-left
//! - +X right, +Y down
//!
//! The renderer converts to NDC in its shader from the surface size.

mod rect;
mod vec2;

pub use rect::Rect;
pub use vec2::Vec2;
