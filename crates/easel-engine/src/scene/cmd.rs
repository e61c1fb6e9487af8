use crate::paint::Color;
use crate::scene::shapes::circle::CircleCmd;
use crate::scene::shapes::ellipse::EllipseCmd;
use crate::scene::shapes::line::LineCmd;
use crate::scene::shapes::rect::RectCmd;

/// Renderer-agnostic draw command stream.
///
/// Extending the scene:
/// - add a new shape module under `scene::shapes::*`
/// - add a new variant here
/// - implement push helpers inside that shape module
/// - teach `render::shapes::ShapeInstance::from_cmd` how to rasterize it
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCmd {
    Rect(RectCmd),
    Circle(CircleCmd),
    Line(LineCmd),
    Ellipse(EllipseCmd),
}

impl DrawCmd {
    /// Fill color of the command.
    pub fn color(&self) -> Color {
        match self {
            DrawCmd::Rect(c) => c.color,
            DrawCmd::Circle(c) => c.color,
            DrawCmd::Line(c) => c.color,
            DrawCmd::Ellipse(c) => c.color,
        }
    }

    /// Short lowercase name, used in logs.
    pub fn kind_name(&self) -> &'static str {
        match self {
            DrawCmd::Rect(_) => "rect",
            DrawCmd::Circle(_) => "circle",
            DrawCmd::Line(_) => "line",
            DrawCmd::Ellipse(_) => "ellipse",
        }
    }
}
