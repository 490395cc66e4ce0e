//! [super::St7701] builder module

use embedded_hal::digital::{self, OutputPin, PinState};
use embedded_hal_async::delay::DelayNs;

use crate::{
    dcs::{BitsPerPixel, PixelFormat, SetAddressMode},
    debug,
    interface::Interface,
    options::{PanelDevConfig, VendorConfig},
    panel::DpiPanel,
    St7701,
};

/// Builder for [St7701] instances.
///
/// Collects the transport, the panel device configuration, the vendor
/// configuration and an optional reset pin, then validates them in
/// [`Builder::build`].
pub struct Builder<'a, DI, B, RST>
where
    DI: Interface,
{
    di: DI,
    rst: Option<RST>,
    dev_config: PanelDevConfig,
    vendor_config: Option<VendorConfig<'a, B>>,
}

impl<'a, DI, B> Builder<'a, DI, B, NoResetPin>
where
    DI: Interface,
{
    #[must_use]
    pub fn new(di: DI, dev_config: PanelDevConfig) -> Self {
        Self {
            di,
            rst: None,
            dev_config,
            vendor_config: None,
        }
    }
}

impl<'a, DI, B, RST> Builder<'a, DI, B, RST>
where
    DI: Interface,
    RST: OutputPin,
{
    #[must_use]
    pub fn vendor_config(mut self, vendor_config: VendorConfig<'a, B>) -> Self {
        self.vendor_config = Some(vendor_config);
        self
    }

    #[must_use]
    pub fn reset_pin<RST2: OutputPin>(self, rst: RST2) -> Builder<'a, DI, B, RST2> {
        Builder {
            di: self.di,
            rst: Some(rst),
            dev_config: self.dev_config,
            vendor_config: self.vendor_config,
        }
    }

    /// Validates the configuration, creates the wrapped DPI panel and returns
    /// the ST7701 panel layered on top of it.
    ///
    /// Nothing is sent to the controller yet; call [`Panel::reset`] and
    /// [`Panel::init`] next.
    ///
    /// [`Panel::reset`]: crate::panel::Panel::reset
    /// [`Panel::init`]: crate::panel::Panel::init
    pub fn build<P, DELAY>(
        mut self,
        delay: DELAY,
    ) -> Result<St7701<'a, DI, P, RST, DELAY>, Error<DI::Error, RST::Error, P::Error>>
    where
        P: DpiPanel<Bus = B>,
        DELAY: DelayNs,
    {
        let vendor_config = self.vendor_config.ok_or(Error::InvalidArgument)?;
        let (Some(dsi_bus), Some(dpi_config)) = (
            vendor_config.mipi_config.dsi_bus,
            vendor_config.mipi_config.dpi_config,
        ) else {
            return Err(Error::InvalidArgument);
        };

        let color_order = self
            .dev_config
            .color_space
            .color_order()
            .ok_or(Error::NotSupported)?;
        let bpp = BitsPerPixel::from_bits_per_pixel(self.dev_config.bits_per_pixel)
            .ok_or(Error::NotSupported)?;

        // keep the controller out of reset until `reset` pulses the line
        if let Some(ref mut rst) = self.rst {
            rst.set_state(PinState::from(!self.dev_config.reset_active_high))
                .map_err(Error::ResetPin)?;
        }

        let dpi = P::new(dsi_bus, &dpi_config).map_err(Error::Dpi)?;
        debug!("new MIPI DPI panel created");

        Ok(St7701 {
            io: Some(self.di),
            dpi,
            rst: self.rst,
            reset_active_high: self.dev_config.reset_active_high,
            madctl: SetAddressMode::new(color_order),
            colmod: PixelFormat::with_all(bpp),
            init_cmds: vendor_config.init_cmds,
            delay,
        })
    }
}

/// Error returned by the [`St7701`] builder and panel operations.
#[derive(Debug)]
pub enum Error<DiError, PinError, DpiError> {
    /// Error caused by the command interface.
    Interface(DiError),
    /// Error caused by the reset pin's [`OutputPin`] implementation.
    ResetPin(PinError),
    /// Error returned by the wrapped DPI panel.
    Dpi(DpiError),
    /// A required input is missing: the vendor config, its DSI bus or its DPI
    /// config at build time, or the command interface afterwards.
    InvalidArgument,
    /// Unsupported colour space or pixel width.
    NotSupported,
    /// The command interface was taken away before [`mirror`](crate::panel::Panel::mirror).
    Failure,
}

pub enum NoResetPin {}
impl digital::OutputPin for NoResetPin {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }
    fn set_high(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }
}
impl digital::ErrorType for NoResetPin {
    type Error = core::convert::Infallible;
}
