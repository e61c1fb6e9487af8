use std::fmt;

/// Rejected [`ViewConfig`](super::ViewConfig).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Width or height is zero.
    ZeroSize { width: u32, height: u32 },
    /// Width or height exceeds the largest surface the GPU layer requests.
    TooLarge { width: u32, height: u32, max: u32 },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::ZeroSize { width, height } => {
                write!(f, "invalid window size {width}x{height}: dimensions must be positive")
            }
            ConfigError::TooLarge { width, height, max } => {
                write!(f, "invalid window size {width}x{height}: dimensions must not exceed {max}")
            }
        }
    }
}

impl std::error::Error for ConfigError {}
