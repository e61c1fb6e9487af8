//! Time subsystem.
//!
//! Provides frame pacing without coupling to the window or the GPU.
//! Intended usage:
//! - one `Pacer` per render loop
//! - call `tick(target_hz)` once per presented frame; it blocks to honor the cap
//!   and returns the resulting `FrameTime`

mod frame_clock;

pub use frame_clock::{FrameClock, FrameTime, Pacer};
