#![cfg_attr(not(test), no_std)]
#![allow(async_fn_in_trait)]

//! ST7701 vendor layer for MIPI-DSI panels.
//!
//! On a MIPI-DSI display the pixels travel through the DSI host's DPI video
//! engine, while the controller itself is configured over a separate
//! command channel. This crate wraps a generic DPI panel (anything that
//! implements [`panel::DpiPanel`]) and adds what the ST7701 needs on top of it:
//! the vendor init sequence, hardware or software reset, mirroring through the
//! command 2 registers, colour inversion, display on/off and sleep.
//!
//! [`St7701`] implements [`panel::Panel`] itself, so it can be handed to code
//! written against the generic panel operations. Pixel transfers go straight
//! to the wrapped DPI panel.
//!
//! ## Example
//!
//! ```
//! use st7701_mipi::{
//!     _mock::{MockDelay, MockDpiPanel, MockInterface, MockOutputPin},
//!     options::{DpiConfig, DpiPixelFormat, MipiConfig, PanelDevConfig, VendorConfig, VideoTiming},
//!     panel::Panel,
//!     Builder, St7701,
//! };
//!
//! # futures_executor::block_on(async {
//! let timing = VideoTiming {
//!     h_size: 480,
//!     v_size: 480,
//!     ..VideoTiming::default()
//! };
//! let mipi = MipiConfig::new((), DpiConfig::new(30, DpiPixelFormat::Rgb565, timing));
//!
//! let mut panel: St7701<_, MockDpiPanel, _, _> =
//!     Builder::new(MockInterface, PanelDevConfig::default())
//!         .vendor_config(VendorConfig::new(mipi))
//!         .reset_pin(MockOutputPin)
//!         .build(MockDelay)
//!         .unwrap();
//!
//! panel.reset().await.unwrap();
//! panel.init().await.unwrap();
//! panel.mirror(true, false).await.unwrap();
//! # });
//! ```
//!
//! ## Logging
//!
//! The `log` feature (default) routes diagnostics through the `log` crate,
//! the `defmt` feature through `defmt`. With neither enabled nothing is logged.

use embedded_hal::digital::{OutputPin, PinState};
use embedded_hal_async::delay::DelayNs;

cfg_if::cfg_if! {
    if #[cfg(feature = "defmt")] {
        pub(crate) use defmt::{debug, error, info, warn};
    } else if #[cfg(feature = "log")] {
        pub(crate) use log::{debug, error, info, warn};
    } else {
        macro_rules! debug {
            ($($arg:tt)*) => {{}};
        }
        macro_rules! info {
            ($($arg:tt)*) => {{}};
        }
        macro_rules! warn {
            ($($arg:tt)*) => {{}};
        }
        macro_rules! error {
            ($($arg:tt)*) => {{}};
        }
        pub(crate) use {debug, error, info, warn};
    }
}

pub mod interface;

mod builder;
pub use builder::*;

pub mod dcs;
use dcs::{
    EnterInvertMode, EnterSleepMode, ExitInvertMode, ExitSleepMode, InterfaceExt, PixelFormat,
    ReadDisplayId, SetAddressMode, SetDisplayOff, SetDisplayOn, SetPixelFormat, SoftReset,
};

pub mod init_cmds;
use init_cmds::{Command2BankSelect, InitCmd, SourceDirection, BKXSEL_BK0, ST7701_DEFAULT_INIT};

pub mod options;
pub mod panel;
use panel::{DpiPanel, Panel};

#[cfg(test)]
mod test_util;

/// ST7701 panel layered on top of a DPI panel.
pub struct St7701<'a, DI, P, RST, DELAY>
where
    DI: interface::Interface,
    P: DpiPanel,
    RST: OutputPin,
    DELAY: DelayNs,
{
    /// The command interface, `None` once taken back by the caller.
    io: Option<DI>,
    /// The wrapped DPI panel.
    dpi: P,
    /// The reset pin.
    rst: Option<RST>,
    /// Reset line polarity.
    reset_active_high: bool,
    /// Current MADCTL value.
    madctl: SetAddressMode,
    /// Current COLMOD value.
    colmod: PixelFormat,
    /// Caller supplied init sequence.
    init_cmds: Option<&'a [InitCmd<'a>]>,
    delay: DELAY,
}

impl<'a, DI, P, RST, DELAY> St7701<'a, DI, P, RST, DELAY>
where
    DI: interface::Interface,
    P: DpiPanel,
    RST: OutputPin,
    DELAY: DelayNs,
{
    /// Returns the MADCTL value last written, or to be written by [`Panel::init`].
    pub fn madctl(&self) -> SetAddressMode {
        self.madctl
    }

    /// Returns the COLMOD value last written, or to be written by [`Panel::init`].
    pub fn colmod(&self) -> PixelFormat {
        self.colmod
    }

    /// Returns the wrapped DPI panel.
    pub fn dpi(&self) -> &P {
        &self.dpi
    }

    /// Returns the wrapped DPI panel.
    pub fn dpi_mut(&mut self) -> &mut P {
        &mut self.dpi
    }

    /// Takes the command interface back, e.g. to tear down the DBI channel
    /// while video keeps running.
    ///
    /// Afterwards [`Panel::mirror`] fails with [`Error::Failure`] and the other
    /// controller commands with [`Error::InvalidArgument`]; [`Panel::reset`]
    /// still works if a reset pin was given.
    pub fn take_interface(&mut self) -> Option<DI> {
        self.io.take()
    }

    /// Deletes the wrapped DPI panel and hands the command interface and the
    /// reset pin back.
    pub fn release(self) -> (Option<DI>, Option<RST>) {
        if self.dpi.delete().is_err() {
            warn!("deleting the MIPI DPI panel failed");
        }
        debug!("del st7701 panel");
        (self.io, self.rst)
    }

    fn io(&mut self) -> Result<&mut DI, Error<DI::Error, RST::Error, P::Error>> {
        self.io.as_mut().ok_or(Error::InvalidArgument)
    }
}

impl<'a, DI, P, RST, DELAY> Panel for St7701<'a, DI, P, RST, DELAY>
where
    DI: interface::Interface,
    P: DpiPanel,
    RST: OutputPin,
    DELAY: DelayNs,
{
    type Error = Error<DI::Error, RST::Error, P::Error>;

    /// Pulses the reset pin, or sends a software reset if there is none.
    ///
    /// Does nothing if neither the pin nor the command interface is available.
    async fn reset(&mut self) -> Result<(), Self::Error> {
        if let Some(ref mut rst) = self.rst {
            rst.set_state(PinState::from(self.reset_active_high))
                .map_err(Error::ResetPin)?;
            self.delay.delay_ms(10).await;
            rst.set_state(PinState::from(!self.reset_active_high))
                .map_err(Error::ResetPin)?;
            self.delay.delay_ms(10).await;
        } else if let Some(ref mut io) = self.io {
            io.write_command(SoftReset).await.map_err(Error::Interface)?;
            // at least 5ms before the next command
            self.delay.delay_ms(20).await;
        }
        Ok(())
    }

    /// Sends the init sequence, then initializes the wrapped DPI panel.
    ///
    /// MADCTL and COLMOD entries of the sequence replace the values derived
    /// from the panel device configuration, unless they appear while command 2
    /// is enabled (where those codes address other registers).
    async fn init(&mut self) -> Result<(), Self::Error> {
        let io = self.io.as_mut().ok_or(Error::InvalidArgument)?;

        let mut id = [0u8; 3];
        io.read_raw(ReadDisplayId::INSTRUCTION, &mut id)
            .await
            .map_err(Error::Interface)?;
        info!("LCD ID: {:#x} {:#x} {:#x}", id[0], id[1], id[2]);

        // back to the regular command page
        io.write_command(Command2BankSelect::disabled())
            .await
            .map_err(Error::Interface)?;
        io.write_command(self.madctl)
            .await
            .map_err(Error::Interface)?;
        io.write_command(SetPixelFormat::new(self.colmod))
            .await
            .map_err(Error::Interface)?;
        info!(
            "madctl: {:#x}, colmod: {:#x}",
            self.madctl.bits(),
            self.colmod.bits()
        );

        let init_cmds = self.init_cmds.unwrap_or(ST7701_DEFAULT_INIT);
        let mut command2 = false;
        for entry in init_cmds {
            if let (false, Some(&value)) = (command2, entry.data.first()) {
                let overwritten = match entry.cmd {
                    SetAddressMode::INSTRUCTION => {
                        self.madctl = SetAddressMode::from_bits(value);
                        true
                    }
                    SetPixelFormat::INSTRUCTION => {
                        self.colmod = PixelFormat::from_bits(value);
                        true
                    }
                    _ => false,
                };
                if overwritten {
                    warn!(
                        "The {:#x} command has been used and will be overwritten by external initialization sequence",
                        entry.cmd
                    );
                }
            }

            io.write_raw(entry.cmd, entry.data)
                .await
                .map_err(Error::Interface)?;
            self.delay.delay_ms(entry.delay_ms).await;

            if let Some(enabled) = entry.command2_state() {
                command2 = enabled;
            }
        }
        debug!("send init commands success");

        self.dpi.init().await.map_err(Error::Dpi)
    }

    async fn draw_bitmap(
        &mut self,
        x_start: u16,
        y_start: u16,
        x_end: u16,
        y_end: u16,
        color_data: &[u8],
    ) -> Result<(), Self::Error> {
        self.dpi
            .draw_bitmap(x_start, y_start, x_end, y_end, color_data)
            .await
            .map_err(Error::Dpi)
    }

    /// Mirrors through the source direction register (X) and MADCTL (Y).
    async fn mirror(&mut self, mirror_x: bool, mirror_y: bool) -> Result<(), Self::Error> {
        let Some(ref mut io) = self.io else {
            error!("Panel IO is deleted, cannot send command");
            return Err(Error::Failure);
        };

        self.madctl = self.madctl.with_vertical_mirror(mirror_y);

        // SDIR only exists in command 2 bank 0
        io.write_command(Command2BankSelect::enabled(BKXSEL_BK0))
            .await
            .map_err(Error::Interface)?;
        io.write_command(SourceDirection { mirror_x })
            .await
            .map_err(Error::Interface)?;
        io.write_command(Command2BankSelect::disabled())
            .await
            .map_err(Error::Interface)?;
        io.write_command(self.madctl)
            .await
            .map_err(Error::Interface)
    }

    async fn swap_xy(&mut self, swap_axes: bool) -> Result<(), Self::Error> {
        self.dpi.swap_xy(swap_axes).await.map_err(Error::Dpi)
    }

    async fn set_gap(&mut self, x_gap: u16, y_gap: u16) -> Result<(), Self::Error> {
        self.dpi.set_gap(x_gap, y_gap).await.map_err(Error::Dpi)
    }

    async fn invert_color(&mut self, invert: bool) -> Result<(), Self::Error> {
        let io = self.io()?;
        let result = if invert {
            io.write_command(EnterInvertMode).await
        } else {
            io.write_command(ExitInvertMode).await
        };
        result.map_err(Error::Interface)
    }

    async fn disp_on_off(&mut self, on: bool) -> Result<(), Self::Error> {
        let io = self.io()?;
        let result = if on {
            io.write_command(SetDisplayOn).await
        } else {
            io.write_command(SetDisplayOff).await
        };
        result.map_err(Error::Interface)
    }

    /// Enters or leaves sleep mode, then waits 100ms in either direction.
    async fn disp_sleep(&mut self, sleep: bool) -> Result<(), Self::Error> {
        let io = self.io()?;
        let result = if sleep {
            io.write_command(EnterSleepMode).await
        } else {
            io.write_command(ExitSleepMode).await
        };
        result.map_err(Error::Interface)?;
        self.delay.delay_ms(100).await;
        Ok(())
    }

    fn delete(self) -> Result<(), Self::Error> {
        self.release();
        Ok(())
    }
}

/// Mock implementations of embedded-hal, interface and panel traits.
///
/// Do not use types in this module outside of doc tests.
#[doc(hidden)]
pub mod _mock {
    use core::convert::Infallible;

    use embedded_hal::digital;
    use embedded_hal_async::delay::DelayNs;

    use crate::{
        interface::Interface,
        options::DpiConfig,
        panel::{DpiPanel, Panel},
    };

    pub struct MockOutputPin;

    impl digital::OutputPin for MockOutputPin {
        fn set_low(&mut self) -> Result<(), Self::Error> {
            Ok(())
        }

        fn set_high(&mut self) -> Result<(), Self::Error> {
            Ok(())
        }
    }

    impl digital::ErrorType for MockOutputPin {
        type Error = core::convert::Infallible;
    }

    pub struct MockDelay;

    impl DelayNs for MockDelay {
        async fn delay_ns(&mut self, _ns: u32) {}
    }

    pub struct MockInterface;

    impl Interface for MockInterface {
        type Error = Infallible;

        async fn send_command(&mut self, _command: u8, _args: &[u8]) -> Result<(), Self::Error> {
            Ok(())
        }

        async fn read_command(&mut self, _command: u8, buf: &mut [u8]) -> Result<(), Self::Error> {
            buf.fill(0);
            Ok(())
        }
    }

    pub struct MockDpiPanel;

    impl Panel for MockDpiPanel {
        type Error = Infallible;

        async fn reset(&mut self) -> Result<(), Self::Error> {
            Ok(())
        }

        async fn init(&mut self) -> Result<(), Self::Error> {
            Ok(())
        }

        async fn draw_bitmap(
            &mut self,
            _x_start: u16,
            _y_start: u16,
            _x_end: u16,
            _y_end: u16,
            _color_data: &[u8],
        ) -> Result<(), Self::Error> {
            Ok(())
        }

        async fn mirror(&mut self, _mirror_x: bool, _mirror_y: bool) -> Result<(), Self::Error> {
            Ok(())
        }

        async fn swap_xy(&mut self, _swap_axes: bool) -> Result<(), Self::Error> {
            Ok(())
        }

        async fn set_gap(&mut self, _x_gap: u16, _y_gap: u16) -> Result<(), Self::Error> {
            Ok(())
        }

        async fn invert_color(&mut self, _invert: bool) -> Result<(), Self::Error> {
            Ok(())
        }

        async fn disp_on_off(&mut self, _on: bool) -> Result<(), Self::Error> {
            Ok(())
        }

        async fn disp_sleep(&mut self, _sleep: bool) -> Result<(), Self::Error> {
            Ok(())
        }

        fn delete(self) -> Result<(), Self::Error> {
            Ok(())
        }
    }

    impl DpiPanel for MockDpiPanel {
        type Bus = ();

        fn new(_bus: (), _config: &DpiConfig) -> Result<Self, Self::Error> {
            Ok(Self)
        }
    }
}
