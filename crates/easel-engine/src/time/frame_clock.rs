use std::time::{Duration, Instant};

/// Frame timing snapshot.
#[derive(Debug, Copy, Clone)]
pub struct FrameTime {
    /// Time elapsed since the previous frame tick, in seconds (sleep included).
    pub dt: f32,

    /// Monotonic timestamp taken at the tick.
    pub now: Instant,

    /// Monotonic frame counter.
    pub frame_index: u64,
}

/// Frame-rate limiter driven once per loop iteration.
///
/// `tick` is the loop's only suspension point.
pub trait Pacer {
    /// Blocks until at least `1 / target_hz` seconds have passed since the previous
    /// tick, then returns the frame timing. `target_hz == 0` never blocks.
    fn tick(&mut self, target_hz: u32) -> FrameTime;
}

/// Wall-clock pacer backed by `std::thread::sleep`.
///
/// The baseline is taken at construction, so the first tick is measured from there.
#[derive(Debug, Clone)]
pub struct FrameClock {
    last: Instant,
    frame_index: u64,
}

impl FrameClock {
    pub fn new() -> Self {
        Self {
            last: Instant::now(),
            frame_index: 0,
        }
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Pacer for FrameClock {
    fn tick(&mut self, target_hz: u32) -> FrameTime {
        if let Some(budget) = frame_budget(target_hz) {
            let spent = self.last.elapsed();
            if spent < budget {
                std::thread::sleep(budget - spent);
            }
        }

        let now = Instant::now();
        let dt = now.saturating_duration_since(self.last);
        self.last = now;

        let ft = FrameTime {
            dt: dt.as_secs_f32(),
            now,
            frame_index: self.frame_index,
        };

        self.frame_index = self
            .frame_index
            .wrapping_add(1);

        ft
    }
}

/// Minimum duration of one frame at `target_hz`; `None` when uncapped.
pub(crate) fn frame_budget(target_hz: u32) -> Option<Duration> {
    (target_hz > 0).then(|| Duration::from_secs(1) / target_hz)
}
