//! The user-facing window.
//!
//! `View` owns the platform (window + GPU surface), the frame pacer and the
//! running flag, and drives the loop: poll, fill, draw the fixed shape set,
//! present, tick.

mod config;
mod error;
mod runtime;
mod shapes;
mod state;

pub use config::{ViewConfig, MAX_DIMENSION};
pub use error::ConfigError;
pub use runtime::View;
pub use shapes::demo_shapes;
pub use state::ViewState;
