/// Window events surfaced to the view.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum ViewEvent {
    /// The user asked to close the window.
    CloseRequested,
    /// The drawable size changed (physical pixels).
    Resized { width: u32, height: u32 },
    /// The window gained or lost keyboard focus.
    Focused(bool),
}
