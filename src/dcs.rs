//! MIPI DCS commands.

use embedded_graphics_core::pixelcolor::RgbColor;

use crate::{interface::Interface, options::ColorOrder};

/// Maximum number of parameter bytes a single command may carry.
pub const MAX_PARAMS: usize = 16;

/// Common trait for DCS commands.
///
/// The methods in this trait are used to convert a DCS command into bytes.
pub trait DcsCommand {
    /// Returns the instruction code.
    fn instruction(&self) -> u8;

    /// Fills the given buffer with the command parameters.
    fn fill_params_buf(&self, buffer: &mut [u8]) -> usize;
}

/// An extension trait for [`Interface`] with support for writing DCS commands.
pub trait InterfaceExt: Interface {
    /// Sends a DCS command to the display interface.
    async fn write_command(&mut self, command: impl DcsCommand) -> Result<(), Self::Error> {
        let mut param_bytes = [0u8; MAX_PARAMS];
        let n = command.fill_params_buf(&mut param_bytes);
        self.write_raw(command.instruction(), &param_bytes[..n])
            .await
    }

    /// Sends a raw command with the given `instruction` to the display interface.
    async fn write_raw(&mut self, instruction: u8, param_bytes: &[u8]) -> Result<(), Self::Error> {
        self.send_command(instruction, param_bytes).await
    }

    /// Reads the reply to `instruction` into `buf`.
    async fn read_raw(&mut self, instruction: u8, buf: &mut [u8]) -> Result<(), Self::Error> {
        self.read_command(instruction, buf).await
    }
}

impl<T: Interface> InterfaceExt for T {}

macro_rules! dcs_basic_command {
    (#[$meta:meta] $name:ident, $instr:expr) => {
        #[$meta]
        #[derive(Debug, Clone, Copy, PartialEq, Eq)]
        pub struct $name;

        impl $name {
            /// Instruction code.
            pub const INSTRUCTION: u8 = $instr;
        }

        impl DcsCommand for $name {
            fn instruction(&self) -> u8 {
                Self::INSTRUCTION
            }

            fn fill_params_buf(&self, _buffer: &mut [u8]) -> usize {
                0
            }
        }
    };
}

dcs_basic_command!(
    /// Software Reset
    SoftReset,
    0x01
);
dcs_basic_command!(
    /// Read Display ID (three bytes)
    ReadDisplayId,
    0x04
);
dcs_basic_command!(
    /// Enter Sleep Mode
    EnterSleepMode,
    0x10
);
dcs_basic_command!(
    /// Exit Sleep Mode
    ExitSleepMode,
    0x11
);
dcs_basic_command!(
    /// Exit Invert Mode
    ExitInvertMode,
    0x20
);
dcs_basic_command!(
    /// Enter Invert Mode
    EnterInvertMode,
    0x21
);
dcs_basic_command!(
    /// Turn Display Off
    SetDisplayOff,
    0x28
);
dcs_basic_command!(
    /// Turn Display On
    SetDisplayOn,
    0x29
);

/// Set Address Mode (MADCTL).
///
/// Only the colour order and the vertical refresh order (`ML`) are used by the
/// ST7701; the remaining bits are carried through untouched so a value taken
/// from an init sequence is written back verbatim.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SetAddressMode(u8);

impl SetAddressMode {
    /// Instruction code.
    pub const INSTRUCTION: u8 = 0x36;

    const BGR: u8 = 1 << 3;
    const ML: u8 = 1 << 4;

    /// Creates a MADCTL value for the given colour order with no mirroring.
    pub const fn new(color_order: ColorOrder) -> Self {
        match color_order {
            ColorOrder::Rgb => Self(0),
            ColorOrder::Bgr => Self(Self::BGR),
        }
    }

    /// Wraps a raw register value.
    pub const fn from_bits(bits: u8) -> Self {
        Self(bits)
    }

    /// Raw register value.
    pub const fn bits(self) -> u8 {
        self.0
    }

    /// Returns the colour order encoded in this value.
    pub const fn color_order(self) -> ColorOrder {
        if self.0 & Self::BGR != 0 {
            ColorOrder::Bgr
        } else {
            ColorOrder::Rgb
        }
    }

    /// Returns `true` if the vertical refresh order is reversed.
    pub const fn is_vertically_mirrored(self) -> bool {
        self.0 & Self::ML != 0
    }

    /// Sets or clears the vertical refresh order bit, leaving every other bit alone.
    #[must_use]
    pub const fn with_vertical_mirror(self, mirror: bool) -> Self {
        if mirror {
            Self(self.0 | Self::ML)
        } else {
            Self(self.0 & !Self::ML)
        }
    }
}

impl DcsCommand for SetAddressMode {
    fn instruction(&self) -> u8 {
        Self::INSTRUCTION
    }

    fn fill_params_buf(&self, buffer: &mut [u8]) -> usize {
        buffer[0] = self.0;
        1
    }
}

/// Bits per pixel supported by the ST7701 RGB interface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BitsPerPixel {
    /// 16 bits per pixel (RGB565).
    Sixteen = 0b101,
    /// 18 bits per pixel (RGB666).
    Eighteen = 0b110,
    /// 24 bits per pixel (RGB888).
    TwentyFour = 0b111,
}

impl BitsPerPixel {
    /// Maps a pixel width to its encoding, `None` for unsupported widths.
    pub const fn from_bits_per_pixel(bpp: u8) -> Option<Self> {
        match bpp {
            16 => Some(Self::Sixteen),
            18 => Some(Self::Eighteen),
            24 => Some(Self::TwentyFour),
            _ => None,
        }
    }

    /// Returns the bit depth for `C`, if the controller supports it.
    pub fn from_rgb_color<C: RgbColor>() -> Option<Self> {
        let bpp = C::MAX_R.trailing_ones() + C::MAX_G.trailing_ones() + C::MAX_B.trailing_ones();
        u8::try_from(bpp).ok().and_then(Self::from_bits_per_pixel)
    }

    /// Number of bits per pixel.
    pub const fn bits_per_pixel(self) -> u8 {
        match self {
            Self::Sixteen => 16,
            Self::Eighteen => 18,
            Self::TwentyFour => 24,
        }
    }
}

/// Interface pixel format (COLMOD value).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PixelFormat(u8);

impl PixelFormat {
    /// Uses the same bit depth for the RGB and the command interface.
    pub const fn with_all(bpp: BitsPerPixel) -> Self {
        let code = bpp as u8;
        Self(code << 4 | code)
    }

    /// Wraps a raw register value.
    pub const fn from_bits(bits: u8) -> Self {
        Self(bits)
    }

    /// Raw register value.
    pub const fn bits(self) -> u8 {
        self.0
    }
}

/// Set Pixel Format (COLMOD).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SetPixelFormat(PixelFormat);

impl SetPixelFormat {
    /// Instruction code.
    pub const INSTRUCTION: u8 = 0x3A;

    /// Creates a new Set Pixel Format command.
    pub const fn new(pixel_format: PixelFormat) -> Self {
        Self(pixel_format)
    }
}

impl DcsCommand for SetPixelFormat {
    fn instruction(&self) -> u8 {
        Self::INSTRUCTION
    }

    fn fill_params_buf(&self, buffer: &mut [u8]) -> usize {
        buffer[0] = self.0.bits();
        1
    }
}
