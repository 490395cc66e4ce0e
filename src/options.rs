//! [`Builder`](crate::Builder) configuration.

use crate::init_cmds::InitCmd;

/// Subpixel order of the panel.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ColorOrder {
    /// RGB subpixel order.
    #[default]
    Rgb,
    /// BGR subpixel order.
    Bgr,
}

/// Colour space requested by the panel device configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ColorSpace {
    /// RGB element order.
    #[default]
    Rgb,
    /// BGR element order.
    Bgr,
    /// Single-colour panels. The ST7701 has no monochrome mode.
    Monochrome,
}

impl ColorSpace {
    /// The matching subpixel order, `None` if the colour space has no RGB layout.
    pub const fn color_order(self) -> Option<ColorOrder> {
        match self {
            Self::Rgb => Some(ColorOrder::Rgb),
            Self::Bgr => Some(ColorOrder::Bgr),
            Self::Monochrome => None,
        }
    }
}

/// Generic panel device configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PanelDevConfig {
    /// Reset line polarity, `true` if the controller is held in reset while the pin is high.
    pub reset_active_high: bool,
    /// Subpixel order.
    pub color_space: ColorSpace,
    /// Pixel width, 16, 18 or 24.
    pub bits_per_pixel: u8,
}

impl Default for PanelDevConfig {
    fn default() -> Self {
        Self {
            reset_active_high: false,
            color_space: ColorSpace::Rgb,
            bits_per_pixel: 16,
        }
    }
}

/// Inputs of the wrapped DPI panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MipiConfig<B> {
    /// Handle of the DSI bus the DPI panel is attached to.
    pub dsi_bus: Option<B>,
    /// Video timing of the DPI panel.
    pub dpi_config: Option<DpiConfig>,
}

impl<B> MipiConfig<B> {
    pub fn new(dsi_bus: B, dpi_config: DpiConfig) -> Self {
        Self {
            dsi_bus: Some(dsi_bus),
            dpi_config: Some(dpi_config),
        }
    }
}

impl<B> Default for MipiConfig<B> {
    fn default() -> Self {
        Self {
            dsi_bus: None,
            dpi_config: None,
        }
    }
}

/// ST7701 specific configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VendorConfig<'a, B> {
    /// Replaces the built-in init sequence when set.
    pub init_cmds: Option<&'a [InitCmd<'a>]>,
    pub mipi_config: MipiConfig<B>,
}

impl<'a, B> VendorConfig<'a, B> {
    pub fn new(mipi_config: MipiConfig<B>) -> Self {
        Self {
            init_cmds: None,
            mipi_config,
        }
    }

    #[must_use]
    pub fn init_cmds(mut self, init_cmds: &'a [InitCmd<'a>]) -> Self {
        self.init_cmds = Some(init_cmds);
        self
    }
}

/// Pixel format of the DPI video stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DpiPixelFormat {
    Rgb565,
    Rgb666,
    Rgb888,
}

/// Video timing, in pixels and lines.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct VideoTiming {
    pub h_size: u32,
    pub v_size: u32,
    pub hsync_pulse_width: u32,
    pub hsync_back_porch: u32,
    pub hsync_front_porch: u32,
    pub vsync_pulse_width: u32,
    pub vsync_back_porch: u32,
    pub vsync_front_porch: u32,
}

impl VideoTiming {
    /// Pixel clocks per line, blanking included.
    pub const fn h_total(&self) -> u32 {
        self.h_size
            .saturating_add(self.hsync_pulse_width)
            .saturating_add(self.hsync_back_porch)
            .saturating_add(self.hsync_front_porch)
    }

    /// Lines per frame, blanking included.
    pub const fn v_total(&self) -> u32 {
        self.v_size
            .saturating_add(self.vsync_pulse_width)
            .saturating_add(self.vsync_back_porch)
            .saturating_add(self.vsync_front_porch)
    }
}

/// DPI panel configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DpiConfig {
    pub dpi_clock_freq_mhz: u32,
    pub virtual_channel: u8,
    pub pixel_format: DpiPixelFormat,
    /// Number of frame buffers the DPI panel allocates.
    pub num_fbs: u8,
    pub video_timing: VideoTiming,
    pub use_dma2d: bool,
}

impl DpiConfig {
    /// Single frame buffer, virtual channel 0, no 2D-DMA.
    pub const fn new(
        dpi_clock_freq_mhz: u32,
        pixel_format: DpiPixelFormat,
        video_timing: VideoTiming,
    ) -> Self {
        Self {
            dpi_clock_freq_mhz,
            virtual_channel: 0,
            pixel_format,
            num_fbs: 1,
            video_timing,
            use_dma2d: false,
        }
    }

    /// Frames per second produced by this configuration, rounded down.
    ///
    /// Returns 0 for a degenerate timing with no pixels, and saturates at
    /// `u32::MAX`.
    pub const fn refresh_rate_hz(&self) -> u32 {
        let h_total = self.video_timing.h_total() as u64;
        let v_total = self.video_timing.v_total() as u64;
        if h_total == 0 || v_total == 0 {
            return 0;
        }
        let rate = self.dpi_clock_freq_mhz as u64 * 1_000_000 / h_total / v_total;
        if rate > u32::MAX as u64 {
            u32::MAX
        } else {
            rate as u32
        }
    }
}
