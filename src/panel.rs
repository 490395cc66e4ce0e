//! Generic panel operations.

/// Operations every panel driver exposes to the display framework.
///
/// Implemented by the wrapped DPI panel (which owns the video timing and the
/// frame buffers) and by [`St7701`](crate::St7701), which layers the
/// controller commands on top of one.
pub trait Panel {
    /// Error type
    type Error: core::fmt::Debug;

    /// Resets the panel.
    async fn reset(&mut self) -> Result<(), Self::Error>;

    /// Initializes the panel. Call [`Self::reset`] first.
    async fn init(&mut self) -> Result<(), Self::Error>;

    /// Copies `color_data` into the rectangle `[x_start, x_end) x [y_start, y_end)`.
    async fn draw_bitmap(
        &mut self,
        x_start: u16,
        y_start: u16,
        x_end: u16,
        y_end: u16,
        color_data: &[u8],
    ) -> Result<(), Self::Error>;

    /// Mirrors the picture along the X and/or Y axis.
    async fn mirror(&mut self, mirror_x: bool, mirror_y: bool) -> Result<(), Self::Error>;

    /// Swaps the X and Y axes.
    async fn swap_xy(&mut self, swap_axes: bool) -> Result<(), Self::Error>;

    /// Offsets the drawing window.
    async fn set_gap(&mut self, x_gap: u16, y_gap: u16) -> Result<(), Self::Error>;

    /// Inverts the colour data.
    async fn invert_color(&mut self, invert: bool) -> Result<(), Self::Error>;

    /// Turns the display output on or off.
    async fn disp_on_off(&mut self, on: bool) -> Result<(), Self::Error>;

    /// Enters or leaves sleep mode.
    async fn disp_sleep(&mut self, sleep: bool) -> Result<(), Self::Error>;

    /// Tears the panel down, releasing everything it owns.
    fn delete(self) -> Result<(), Self::Error>
    where
        Self: Sized;
}

/// A panel driven by the DSI host's DPI video engine.
pub trait DpiPanel: Panel + Sized {
    /// Handle of the DSI bus.
    type Bus;

    /// Creates the panel on `bus` with the given video timing.
    fn new(bus: Self::Bus, config: &crate::options::DpiConfig) -> Result<Self, Self::Error>;
}
