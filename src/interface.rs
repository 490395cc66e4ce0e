//! Command/parameter transport to the controller.

mod spi;
pub use spi::*;

/// Command and parameter interface.
///
/// On a MIPI-DSI panel this is the DBI channel that travels next to the DPI
/// video stream: every transfer is one instruction byte followed by its
/// parameter bytes.
pub trait Interface {
    /// Error type
    type Error: core::fmt::Debug;

    /// Send a command with optional parameters.
    async fn send_command(&mut self, command: u8, args: &[u8]) -> Result<(), Self::Error>;

    /// Send a read command and fill `buf` with the bytes returned by the controller.
    async fn read_command(&mut self, command: u8, buf: &mut [u8]) -> Result<(), Self::Error>;
}

impl<T: Interface + ?Sized> Interface for &mut T {
    type Error = T::Error;

    async fn send_command(&mut self, command: u8, args: &[u8]) -> Result<(), Self::Error> {
        T::send_command(self, command, args).await
    }

    async fn read_command(&mut self, command: u8, buf: &mut [u8]) -> Result<(), Self::Error> {
        T::read_command(self, command, buf).await
    }
}
