//! Windowing/graphics collaborator of the view.
//!
//! `Platform` is the boundary the view drives every frame: drain events, fill,
//! draw, present. `WinitPlatform` is the real implementation; tests substitute
//! a recording double.

mod event;
mod winit;

use anyhow::Result;

use crate::paint::Color;
use crate::scene::DrawCmd;

pub use event::ViewEvent;
pub use self::winit::{WindowSpec, WinitPlatform};

/// Window + drawing surface owned by a view.
pub trait Platform {
    /// Drains pending window events into `out` without blocking.
    fn poll_events(&mut self, out: &mut Vec<ViewEvent>);

    /// Fills the whole surface with `color` for the frame being recorded.
    fn fill(&mut self, color: Color);

    /// Records one draw command on top of the frame being recorded.
    fn draw(&mut self, cmd: &DrawCmd);

    /// Makes the recorded frame visible.
    fn present(&mut self) -> Result<()>;

    /// Releases the window and graphics resources.
    ///
    /// The view calls this once; no other method is called afterwards.
    fn shutdown(&mut self);
}
