//! ST7701 vendor commands and the default init sequence.
//!
//! Most of the ST7701 configuration registers live in "command 2", a set of
//! banks that alias the regular command codes. A bank is selected by writing
//! [`CND2BKXSEL`] with the manufacturer key followed by the bank index; bit 4
//! of that last byte switches command 2 on. While it is off, the standard DCS
//! command set (MADCTL, COLMOD, ...) is active.

use crate::dcs::DcsCommand;

/// Command 2 bank select.
pub const CND2BKXSEL: u8 = 0xFF;
/// Manufacturer key written ahead of the bank index.
pub const BKXSEL_KEY: [u8; 4] = [0x77, 0x01, 0x00, 0x00];
/// Bank 0 of command 2.
pub const BKXSEL_BK0: u8 = 0x00;
/// Enables command 2 when set in the bank index byte.
pub const CN2_BIT: u8 = 0x10;
/// Source direction (X mirroring), command 2 bank 0.
pub const SDIR: u8 = 0xC7;
/// Reversed source output order in [`SDIR`].
pub const SS_BIT: u8 = 0x04;

/// One entry of an init sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InitCmd<'a> {
    /// Instruction code.
    pub cmd: u8,
    /// Parameter bytes.
    pub data: &'a [u8],
    /// Delay after the command is sent, in milliseconds.
    pub delay_ms: u32,
}

impl<'a> InitCmd<'a> {
    pub const fn new(cmd: u8, data: &'a [u8], delay_ms: u32) -> Self {
        Self {
            cmd,
            data,
            delay_ms,
        }
    }

    /// Returns `Some(enabled)` if this entry selects a command 2 bank.
    ///
    /// Entries with fewer than five parameter bytes don't carry a bank index
    /// and leave the command 2 state unknown to the caller.
    pub fn command2_state(&self) -> Option<bool> {
        if self.cmd == CND2BKXSEL && self.data.len() > 4 {
            Some(self.data[4] & CN2_BIT != 0)
        } else {
            None
        }
    }
}

/// Writes [`CND2BKXSEL`] with the manufacturer key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Command2BankSelect(u8);

impl Command2BankSelect {
    /// Switches command 2 off, back to the regular command page.
    pub const fn disabled() -> Self {
        Self(0)
    }

    /// Enables command 2 and selects `bank`.
    pub const fn enabled(bank: u8) -> Self {
        Self(bank | CN2_BIT)
    }
}

impl DcsCommand for Command2BankSelect {
    fn instruction(&self) -> u8 {
        CND2BKXSEL
    }

    fn fill_params_buf(&self, buffer: &mut [u8]) -> usize {
        buffer[..4].copy_from_slice(&BKXSEL_KEY);
        buffer[4] = self.0;
        5
    }
}

/// Source direction, only reachable while command 2 bank 0 is selected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SourceDirection {
    pub mirror_x: bool,
}

impl DcsCommand for SourceDirection {
    fn instruction(&self) -> u8 {
        SDIR
    }

    fn fill_params_buf(&self, buffer: &mut [u8]) -> usize {
        buffer[0] = if self.mirror_x { SS_BIT } else { 0 };
        1
    }
}

/// Sequence sent by [`St7701::init`](crate::St7701) unless the vendor config provides one.
///
/// Vendor specific, panels from other manufacturers may need a different one.
pub const ST7701_DEFAULT_INIT: &[InitCmd<'static>] = &[
    InitCmd::new(0xFF, &[0x77, 0x01, 0x00, 0x00, 0x13], 0),
    InitCmd::new(0xEF, &[0x08], 0),
    InitCmd::new(0xFF, &[0x77, 0x01, 0x00, 0x00, 0x10], 0),
    InitCmd::new(0xC0, &[0x2C, 0x00], 0),
    InitCmd::new(0xC1, &[0x10, 0x0C], 0),
    InitCmd::new(0xC2, &[0x21, 0x0A], 0),
    InitCmd::new(0xCC, &[0x10], 0),
    InitCmd::new(
        0xB0,
        &[
            0x00, 0x0B, 0x12, 0x0D, 0x10, 0x06, 0x02, 0x08, 0x07, 0x1F, 0x04, 0x11, 0x0F, 0x29,
            0x31, 0x1E,
        ],
        0,
    ),
    InitCmd::new(
        0xB1,
        &[
            0x00, 0x0B, 0x13, 0x0D, 0x11, 0x06, 0x03, 0x08, 0x07, 0x20, 0x04, 0x12, 0x11, 0x29,
            0x31, 0x1E,
        ],
        0,
    ),
    InitCmd::new(0xFF, &[0x77, 0x01, 0x00, 0x00, 0x11], 0),
    InitCmd::new(0xB0, &[0x5D], 0),
    InitCmd::new(0xB1, &[0x72], 0),
    InitCmd::new(0xB2, &[0x84], 0),
    InitCmd::new(0xB3, &[0x80], 0),
    InitCmd::new(0xB5, &[0x4D], 0),
    InitCmd::new(0xB7, &[0x85], 0),
    InitCmd::new(0xB8, &[0x20], 0),
    InitCmd::new(0xC1, &[0x78], 0),
    InitCmd::new(0xC2, &[0x78], 0),
    InitCmd::new(0xD0, &[0x88], 0),
    InitCmd::new(0xE0, &[0x80, 0x00, 0x02], 0),
    InitCmd::new(
        0xE1,
        &[0x05, 0x00, 0x07, 0x00, 0x06, 0x00, 0x08, 0x00, 0x00, 0x33, 0x33],
        0,
    ),
    InitCmd::new(
        0xE2,
        &[0x00, 0x00, 0x30, 0x30, 0x01, 0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00],
        0,
    ),
    InitCmd::new(0xE3, &[0x00, 0x00, 0x11, 0x11], 0),
    InitCmd::new(0xE4, &[0x44, 0x44], 0),
    InitCmd::new(
        0xE5,
        &[
            0x0C, 0x78, 0x00, 0xE0, 0x0E, 0x7A, 0x00, 0xE0, 0x08, 0x74, 0x00, 0xE0, 0x0A, 0x76,
            0x00, 0xE0,
        ],
        0,
    ),
    InitCmd::new(0xE6, &[0x00, 0x00, 0x11, 0x11], 0),
    InitCmd::new(0xE7, &[0x44, 0x44], 0),
    InitCmd::new(
        0xE8,
        &[
            0x0D, 0x79, 0x00, 0xE0, 0x0F, 0x7B, 0x00, 0xE0, 0x09, 0x75, 0x00, 0xE0, 0x0B, 0x77,
            0x00, 0xE0,
        ],
        0,
    ),
    InitCmd::new(0xE9, &[0x36, 0x00], 0),
    InitCmd::new(0xEB, &[0x00, 0x01, 0xE4, 0xE4, 0x44, 0x88, 0x40], 0),
    InitCmd::new(
        0xED,
        &[
            0xA1, 0xC2, 0xFB, 0x0F, 0x67, 0x45, 0xFF, 0xFF, 0xFF, 0xFF, 0x54, 0x76, 0xF0, 0xBF,
            0x2C, 0x1A,
        ],
        0,
    ),
    InitCmd::new(0xEF, &[0x10, 0x0D, 0x04, 0x08, 0x3F, 0x1F], 0),
    InitCmd::new(0xFF, &[0x77, 0x01, 0x00, 0x00, 0x13], 0),
    InitCmd::new(0xE8, &[0x00, 0x0E], 0),
    InitCmd::new(0xE8, &[0x00, 0x0C], 20),
    InitCmd::new(0xE8, &[0x00, 0x00], 0),
    InitCmd::new(0xFF, &[0x77, 0x01, 0x00, 0x00, 0x00], 0),
    // sleep out
    InitCmd::new(0x11, &[], 120),
    // display on
    InitCmd::new(0x29, &[], 0),
];
