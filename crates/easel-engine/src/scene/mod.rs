//! Scene (draw stream) types.
//!
//! Responsibilities:
//! - store renderer-agnostic draw commands
//! - keep paint order equal to recording order (later commands cover earlier ones)
//! - keep shape-specific helpers isolated per shape file under `scene::shapes`

mod cmd;
mod list;

pub mod shapes;

pub use cmd::DrawCmd;
pub use list::DrawList;
pub use shapes::circle::CircleCmd;
pub use shapes::ellipse::EllipseCmd;
pub use shapes::line::LineCmd;
pub use shapes::rect::RectCmd;
