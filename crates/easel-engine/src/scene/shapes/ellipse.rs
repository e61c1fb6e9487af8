use crate::coords::{Rect, Vec2};
use crate::paint::Color;
use crate::scene::{DrawCmd, DrawList};

/// Filled ellipse inscribed in an axis-aligned bounding box.
#[derive(Debug, Clone, PartialEq)]
pub struct EllipseCmd {
    pub bounds: Rect,
    pub color: Color,
}

impl EllipseCmd {
    #[inline]
    pub fn new(bounds: Rect, color: Color) -> Self {
        Self { bounds, color }
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        self.bounds.normalized().center()
    }

    /// Semi-axes `(rx, ry)`.
    #[inline]
    pub fn radii(&self) -> Vec2 {
        self.bounds.normalized().size / 2.0
    }
}

impl DrawList {
    /// Records a filled ellipse fitting `bounds`.
    #[inline]
    pub fn push_ellipse(&mut self, bounds: Rect, color: Color) {
        self.push(DrawCmd::Ellipse(EllipseCmd::new(bounds, color)));
    }
}
