//! Recording mocks sharing one ordered event log.

use std::{cell::RefCell, rc::Rc, vec::Vec};

use embedded_hal::digital;
use embedded_hal_async::delay::DelayNs;

use crate::{
    interface::Interface,
    options::DpiConfig,
    panel::{DpiPanel, Panel},
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Command(u8, Vec<u8>),
    Read(u8),
    Pin(bool),
    DelayNs(u32),
    DpiNew,
    DpiInit,
    DpiDelete,
    DpiDraw(u16, u16, u16, u16, usize),
    DpiSwapXy(bool),
    DpiSetGap(u16, u16),
}

#[derive(Debug, Clone, Default)]
pub struct Log(Rc<RefCell<Vec<Event>>>);

impl Log {
    pub fn push(&self, event: Event) {
        self.0.borrow_mut().push(event);
    }

    pub fn events(&self) -> Vec<Event> {
        self.0.borrow().clone()
    }

    pub fn clear(&self) {
        self.0.borrow_mut().clear();
    }

    /// Commands in the log, without parameters.
    pub fn instructions(&self) -> Vec<u8> {
        self.0
            .borrow()
            .iter()
            .filter_map(|event| match event {
                Event::Command(cmd, _) => Some(*cmd),
                _ => None,
            })
            .collect()
    }

    /// Sum of all recorded delays, in milliseconds.
    pub fn total_delay_ms(&self) -> u64 {
        self.0
            .borrow()
            .iter()
            .map(|event| match event {
                Event::DelayNs(ns) => u64::from(*ns),
                _ => 0,
            })
            .sum::<u64>()
            / 1_000_000
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MockError;

impl digital::Error for MockError {
    fn kind(&self) -> digital::ErrorKind {
        digital::ErrorKind::Other
    }
}

pub fn command(cmd: u8, args: &[u8]) -> Event {
    Event::Command(cmd, args.to_vec())
}

pub fn delay_ms(ms: u32) -> Event {
    Event::DelayNs(ms * 1_000_000)
}

/// Command interface answering every read with `id`.
pub struct RecordingInterface {
    log: Log,
    id: [u8; 3],
    fail_on: Option<u8>,
}

impl RecordingInterface {
    pub fn new(log: &Log) -> Self {
        Self {
            log: log.clone(),
            id: [0x00, 0x80, 0x00],
            fail_on: None,
        }
    }

    /// Fails every transfer of `cmd`, read or write.
    pub fn failing_on(log: &Log, cmd: u8) -> Self {
        Self {
            fail_on: Some(cmd),
            ..Self::new(log)
        }
    }
}

impl Interface for RecordingInterface {
    type Error = MockError;

    async fn send_command(&mut self, command: u8, args: &[u8]) -> Result<(), Self::Error> {
        if self.fail_on == Some(command) {
            return Err(MockError);
        }
        self.log.push(Event::Command(command, args.to_vec()));
        Ok(())
    }

    async fn read_command(&mut self, command: u8, buf: &mut [u8]) -> Result<(), Self::Error> {
        if self.fail_on == Some(command) {
            return Err(MockError);
        }
        self.log.push(Event::Read(command));
        let n = buf.len().min(self.id.len());
        buf[..n].copy_from_slice(&self.id[..n]);
        Ok(())
    }
}

pub struct RecordingPin {
    log: Log,
    fail: bool,
}

impl RecordingPin {
    pub fn new(log: &Log) -> Self {
        Self {
            log: log.clone(),
            fail: false,
        }
    }

    pub fn failing(log: &Log) -> Self {
        Self {
            log: log.clone(),
            fail: true,
        }
    }

    fn set(&mut self, high: bool) -> Result<(), MockError> {
        if self.fail {
            return Err(MockError);
        }
        self.log.push(Event::Pin(high));
        Ok(())
    }
}

impl digital::ErrorType for RecordingPin {
    type Error = MockError;
}

impl digital::OutputPin for RecordingPin {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.set(false)
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.set(true)
    }
}

/// Records every non-zero delay.
pub struct RecordingDelay {
    log: Log,
}

impl RecordingDelay {
    pub fn new(log: &Log) -> Self {
        Self { log: log.clone() }
    }
}

impl DelayNs for RecordingDelay {
    async fn delay_ns(&mut self, ns: u32) {
        if ns > 0 {
            self.log.push(Event::DelayNs(ns));
        }
    }
}

/// Bus handle of [`RecordingDpi`], `fail` makes panel creation fail.
pub struct RecordingBus {
    pub log: Log,
    pub fail: bool,
}

pub struct RecordingDpi {
    log: Log,
    fail_init: bool,
    fail_delete: bool,
}

impl RecordingDpi {
    /// Makes the next `init` fail.
    pub fn fail_init(&mut self) {
        self.fail_init = true;
    }

    /// Makes `delete` fail after recording it.
    pub fn fail_delete(&mut self) {
        self.fail_delete = true;
    }
}

impl Panel for RecordingDpi {
    type Error = MockError;

    async fn reset(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }

    async fn init(&mut self) -> Result<(), Self::Error> {
        if self.fail_init {
            return Err(MockError);
        }
        self.log.push(Event::DpiInit);
        Ok(())
    }

    async fn draw_bitmap(
        &mut self,
        x_start: u16,
        y_start: u16,
        x_end: u16,
        y_end: u16,
        color_data: &[u8],
    ) -> Result<(), Self::Error> {
        self.log.push(Event::DpiDraw(
            x_start,
            y_start,
            x_end,
            y_end,
            color_data.len(),
        ));
        Ok(())
    }

    async fn mirror(&mut self, _mirror_x: bool, _mirror_y: bool) -> Result<(), Self::Error> {
        Err(MockError)
    }

    async fn swap_xy(&mut self, swap_axes: bool) -> Result<(), Self::Error> {
        self.log.push(Event::DpiSwapXy(swap_axes));
        Ok(())
    }

    async fn set_gap(&mut self, x_gap: u16, y_gap: u16) -> Result<(), Self::Error> {
        self.log.push(Event::DpiSetGap(x_gap, y_gap));
        Ok(())
    }

    async fn invert_color(&mut self, _invert: bool) -> Result<(), Self::Error> {
        Err(MockError)
    }

    async fn disp_on_off(&mut self, _on: bool) -> Result<(), Self::Error> {
        Err(MockError)
    }

    async fn disp_sleep(&mut self, _sleep: bool) -> Result<(), Self::Error> {
        Err(MockError)
    }

    fn delete(self) -> Result<(), Self::Error> {
        self.log.push(Event::DpiDelete);
        if self.fail_delete {
            return Err(MockError);
        }
        Ok(())
    }
}

impl DpiPanel for RecordingDpi {
    type Bus = RecordingBus;

    fn new(bus: Self::Bus, _config: &DpiConfig) -> Result<Self, Self::Error> {
        if bus.fail {
            return Err(MockError);
        }
        bus.log.push(Event::DpiNew);
        Ok(Self {
            log: bus.log,
            fail_init: false,
            fail_delete: false,
        })
    }
}
