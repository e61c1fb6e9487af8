use crate::device::GpuInit;
use crate::paint::Color;

use super::ConfigError;

/// Largest width/height accepted with the default GPU limits
/// (`wgpu::Limits::default().max_texture_dimension_2d`).
pub const MAX_DIMENSION: u32 = 8192;

/// Window and loop configuration for a [`View`](super::View).
///
/// Defaults: 800x600, title "Pygame Window", 60 Hz, white background.
///
/// ```rust,ignore
/// let config = ViewConfig::default()
///     .size(1024, 768)
///     .title("Shapes");
/// ```
#[derive(Debug, Clone)]
pub struct ViewConfig {
    /// Drawable width in physical pixels.
    pub width: u32,
    /// Drawable height in physical pixels.
    pub height: u32,
    pub title: String,
    /// Frame-rate cap in Hz; `0` disables the cap.
    pub target_fps: u32,
    /// Color the surface is filled with at the start of every frame.
    pub background: Color,
    pub gpu: GpuInit,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            width: 800,
            height: 600,
            title: "Pygame Window".to_string(),
            target_fps: 60,
            background: Color::white(),
            gpu: GpuInit::default(),
        }
    }
}

impl ViewConfig {
    /// Set the window size in physical pixels.
    pub fn size(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    /// Set the window title.
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Set the frame-rate cap.
    pub fn target_fps(mut self, fps: u32) -> Self {
        self.target_fps = fps;
        self
    }

    /// Set the background fill color.
    pub fn background(mut self, color: Color) -> Self {
        self.background = color;
        self
    }

    /// Set the surface present mode.
    pub fn present_mode(mut self, mode: wgpu::PresentMode) -> Self {
        self.gpu.present_mode = mode;
        self
    }

    /// Set the device limits; they also bound the accepted window size.
    pub fn limits(mut self, limits: wgpu::Limits) -> Self {
        self.gpu.limits = limits;
        self
    }

    /// Checks the dimensions before anything touches the windowing system.
    ///
    /// The upper bound is the texture size the requested device limits allow.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let (width, height) = (self.width, self.height);
        if width == 0 || height == 0 {
            return Err(ConfigError::ZeroSize { width, height });
        }

        let max = self.gpu.max_surface_dimension();
        if width > max || height > max {
            return Err(ConfigError::TooLarge { width, height, max });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_demo_window() {
        let c = ViewConfig::default();
        assert_eq!((c.width, c.height), (800, 600));
        assert_eq!(c.title, "Pygame Window");
        assert_eq!(c.target_fps, 60);
        assert_eq!(c.background, Color::rgb8(255, 255, 255));
        assert!(c.validate().is_ok());
    }

    #[test]
    fn setters_chain() {
        let c = ViewConfig::default().size(320, 200).title("tiny").target_fps(30);
        assert_eq!((c.width, c.height), (320, 200));
        assert_eq!(c.title, "tiny");
        assert_eq!(c.target_fps, 30);
    }

    #[test]
    fn zero_width_or_height_is_rejected() {
        assert_eq!(
            ViewConfig::default().size(0, 600).validate(),
            Err(ConfigError::ZeroSize { width: 0, height: 600 })
        );
        assert_eq!(
            ViewConfig::default().size(800, 0).validate(),
            Err(ConfigError::ZeroSize { width: 800, height: 0 })
        );
    }

    #[test]
    fn oversized_dimensions_are_rejected() {
        let err = ViewConfig::default().size(MAX_DIMENSION + 1, 600).validate().unwrap_err();
        assert_eq!(err, ConfigError::TooLarge { width: MAX_DIMENSION + 1, height: 600, max: MAX_DIMENSION });
        assert!(err.to_string().contains("8192"));
    }

    #[test]
    fn max_dimension_is_accepted() {
        assert!(ViewConfig::default().size(MAX_DIMENSION, 1).validate().is_ok());
    }

    #[test]
    fn default_bound_matches_default_limits() {
        assert_eq!(ViewConfig::default().gpu.max_surface_dimension(), MAX_DIMENSION);
    }

    #[test]
    fn bound_follows_requested_limits() {
        let limits = wgpu::Limits::downlevel_webgl2_defaults();
        let max = limits.max_texture_dimension_2d;
        let config = ViewConfig::default().limits(limits);

        assert_eq!(
            config.clone().size(4000, 600).validate(),
            Err(ConfigError::TooLarge { width: 4000, height: 600, max })
        );
        assert!(config.size(max, max).validate().is_ok());
    }

    #[test]
    fn present_mode_setter_reaches_gpu_init() {
        let c = ViewConfig::default().present_mode(wgpu::PresentMode::Fifo);
        assert_eq!(c.gpu.present_mode, wgpu::PresentMode::Fifo);
        assert_eq!(ViewConfig::default().gpu.present_mode, wgpu::PresentMode::AutoNoVsync);
    }
}
