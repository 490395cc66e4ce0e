use embedded_hal::digital::OutputPin;
use embedded_hal_async::spi::{Operation, SpiDevice};

use super::Interface;

/// Spi interface error
#[derive(Clone, Copy, Debug)]
pub enum SpiError<SPI, DC> {
    Spi(SPI),
    Dc(DC),
}

/// 4-line SPI transport, used on boards that route the ST7701 command port to SPI.
pub struct SpiInterface<SPI, DC> {
    spi: SPI,
    dc: DC,
}

impl<SPI, DC> SpiInterface<SPI, DC>
where
    SPI: SpiDevice,
    DC: OutputPin,
{
    /// Create new interface
    pub fn new(spi: SPI, dc: DC) -> Self {
        Self { spi, dc }
    }

    /// Release the DC pin and SPI peripheral back, deconstructing the interface
    pub fn release(self) -> (SPI, DC) {
        (self.spi, self.dc)
    }
}

impl<SPI, DC> Interface for SpiInterface<SPI, DC>
where
    SPI: SpiDevice,
    DC: OutputPin,
{
    type Error = SpiError<SPI::Error, DC::Error>;

    async fn send_command(&mut self, command: u8, args: &[u8]) -> Result<(), Self::Error> {
        self.dc.set_low().map_err(SpiError::Dc)?;
        self.spi.write(&[command]).await.map_err(SpiError::Spi)?;
        if !args.is_empty() {
            self.dc.set_high().map_err(SpiError::Dc)?;
            self.spi.write(args).await.map_err(SpiError::Spi)?;
        }
        Ok(())
    }

    async fn read_command(&mut self, command: u8, buf: &mut [u8]) -> Result<(), Self::Error> {
        // D/C stays low: the controller drives the reply right after the instruction
        self.dc.set_low().map_err(SpiError::Dc)?;
        self.spi
            .transaction(&mut [Operation::Write(&[command]), Operation::Read(buf)])
            .await
            .map_err(SpiError::Spi)
    }
}

#[cfg(test)]
mod tests {
    use core::convert::Infallible;

    use embedded_hal::digital;
    use embedded_hal_async::spi::{self, ErrorType};
    use futures_executor::block_on;

    use super::*;

    #[derive(Debug, PartialEq)]
    enum Op {
        Dc(bool),
        Write(Vec<u8>),
        Read(usize),
    }

    #[derive(Default)]
    struct Recorder {
        ops: Vec<Op>,
    }

    struct Spi<'a>(&'a core::cell::RefCell<Recorder>);
    struct Dc<'a>(&'a core::cell::RefCell<Recorder>);

    impl ErrorType for Spi<'_> {
        type Error = Infallible;
    }

    impl SpiDevice for Spi<'_> {
        async fn transaction(
            &mut self,
            operations: &mut [spi::Operation<'_, u8>],
        ) -> Result<(), Self::Error> {
            for op in operations {
                match op {
                    spi::Operation::Write(data) => {
                        self.0.borrow_mut().ops.push(Op::Write(data.to_vec()))
                    }
                    spi::Operation::Read(buf) => {
                        buf.iter_mut().enumerate().for_each(|(i, b)| *b = 0x80 | i as u8);
                        self.0.borrow_mut().ops.push(Op::Read(buf.len()));
                    }
                    _ => unreachable!(),
                }
            }
            Ok(())
        }
    }

    impl digital::ErrorType for Dc<'_> {
        type Error = Infallible;
    }

    impl digital::OutputPin for Dc<'_> {
        fn set_low(&mut self) -> Result<(), Self::Error> {
            self.0.borrow_mut().ops.push(Op::Dc(false));
            Ok(())
        }

        fn set_high(&mut self) -> Result<(), Self::Error> {
            self.0.borrow_mut().ops.push(Op::Dc(true));
            Ok(())
        }
    }

    #[test]
    fn command_then_parameters() {
        let rec = core::cell::RefCell::new(Recorder::default());
        let mut di = SpiInterface::new(Spi(&rec), Dc(&rec));

        block_on(di.send_command(0x36, &[0x08])).unwrap();

        assert_eq!(
            rec.borrow().ops,
            [
                Op::Dc(false),
                Op::Write(vec![0x36]),
                Op::Dc(true),
                Op::Write(vec![0x08]),
            ]
        );
    }

    #[test]
    fn command_without_parameters_keeps_dc_low() {
        let rec = core::cell::RefCell::new(Recorder::default());
        let mut di = SpiInterface::new(Spi(&rec), Dc(&rec));

        block_on(di.send_command(0x29, &[])).unwrap();

        assert_eq!(rec.borrow().ops, [Op::Dc(false), Op::Write(vec![0x29])]);
    }

    #[test]
    fn read_fills_buffer() {
        let rec = core::cell::RefCell::new(Recorder::default());
        let mut di = SpiInterface::new(Spi(&rec), Dc(&rec));
        let mut id = [0u8; 3];

        block_on(di.read_command(0x04, &mut id)).unwrap();

        assert_eq!(id, [0x80, 0x81, 0x82]);
        assert_eq!(
            rec.borrow().ops,
            [Op::Dc(false), Op::Write(vec![0x04]), Op::Read(3)]
        );
    }
}
