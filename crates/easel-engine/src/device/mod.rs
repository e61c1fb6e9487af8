//! GPU device + surface management.
//!
//! `Gpu` owns the wgpu instance, device, queue and the surface bound to the
//! view's window. `surface` holds the pure selection logic (format, present
//! mode, error triage) so it can be tested without an adapter.

mod gpu;
mod surface;

pub use gpu::{Gpu, GpuFrame, GpuInit};
pub use surface::SurfaceErrorAction;
