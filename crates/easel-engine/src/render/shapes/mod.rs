//! Shape renderer.
//!
//! Every `DrawCmd` kind goes through a single instanced pipeline so a frame is
//! one clear + one draw call, in paint order.

mod shape;

pub use shape::{ShapeInstance, ShapeKind, ShapeRenderer};
