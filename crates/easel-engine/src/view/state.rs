/// Lifecycle of a [`View`](super::View).
///
/// `Stopped -> Running` on `start`, `Running -> Stopped` on `stop` or a close
/// request. Once the platform has been released, `Stopped` is terminal.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub enum ViewState {
    #[default]
    Stopped,
    Running,
}

impl ViewState {
    #[inline]
    pub fn is_running(self) -> bool {
        self == ViewState::Running
    }

    /// Enters `Running`. Returns `false` if already running.
    pub(crate) fn start(&mut self) -> bool {
        let changed = *self == ViewState::Stopped;
        *self = ViewState::Running;
        changed
    }

    /// Enters `Stopped`. Returns `false` if already stopped.
    pub(crate) fn stop(&mut self) -> bool {
        let changed = *self == ViewState::Running;
        *self = ViewState::Stopped;
        changed
    }
}
