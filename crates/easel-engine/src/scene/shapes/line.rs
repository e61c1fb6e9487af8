use crate::coords::Vec2;
use crate::paint::Color;
use crate::scene::{DrawCmd, DrawList};

/// Straight line segment draw payload.
///
/// The stroke has flat ends and extends `width / 2` on each side of the segment.
#[derive(Debug, Clone, PartialEq)]
pub struct LineCmd {
    pub start: Vec2,
    pub end: Vec2,
    pub width: f32,
    pub color: Color,
}

impl LineCmd {
    #[inline]
    pub fn new(start: Vec2, end: Vec2, width: f32, color: Color) -> Self {
        Self { start, end, width, color }
    }

    #[inline]
    pub fn length(&self) -> f32 {
        (self.end - self.start).length()
    }
}

impl DrawList {
    /// Records a line segment of the given stroke width.
    #[inline]
    pub fn push_line(&mut self, start: Vec2, end: Vec2, width: f32, color: Color) {
        self.push(DrawCmd::Line(LineCmd::new(start, end, width, color)));
    }
}
