//! A simulated PAA3905 on the far side of the SPI bus.
//!
//! It decodes framed transactions the way the sensor does and records every
//! register access, so tests can check long write sequences and the frame
//! grab handshake without spelling out each bus transfer.

use core::convert::Infallible;
use std::cell::RefCell;
use std::rc::Rc;

use embedded_hal as hal;
use embedded_hal_mock::delay::MockNoop;
use hal::blocking::delay::{DelayMs, DelayUs};
use hal::digital::v2::OutputPin;

use crate::registers::{self, Registers, BURST_LEN};
use crate::PAA3905;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Access {
    Read(u8),
    Write(u8, u8),
    Burst,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
enum Phase {
    /// chip select just asserted
    Address,
    Read(u8),
    Write(u8),
    Burst(usize),
    /// transaction complete, waiting for chip select release
    Done,
}

pub struct Device {
    pub regs: [u8; 128],
    pub log: Vec<Access>,
    pub burst: [u8; BURST_LEN],
    /// grab status polls answered "not ready" before the frame is ready;
    /// `None` never becomes ready
    pub grab_ready_after: Option<u32>,
    pub grab_polls: u32,
    /// pixel values handed out by successive grab register reads
    pub pixels: Vec<u8>,
    pixel_pos: usize,
    phase: Phase,
}

impl Device {
    fn new() -> Self {
        let mut regs = [0u8; 128];
        regs[Registers::ProductId.addr() as usize] = registers::PRODUCT_ID;
        regs[Registers::RevisionId.addr() as usize] = 0x01;
        regs[Registers::InverseProductId.addr() as usize] = registers::INVERSE_PRODUCT_ID;
        Self {
            regs,
            log: Vec::new(),
            burst: [0; BURST_LEN],
            grab_ready_after: Some(0),
            grab_polls: 0,
            pixels: Vec::new(),
            pixel_pos: 0,
            phase: Phase::Done,
        }
    }

    /// Load the pixel values for the next captures
    pub fn load_pixels(&mut self, pixels: Vec<u8>) {
        self.pixels = pixels;
        self.pixel_pos = 0;
    }

    fn read(&mut self, reg: u8) -> u8 {
        self.log.push(Access::Read(reg));
        if reg == Registers::RawDataGrabStatus.addr() {
            let ready = self.grab_ready_after.map_or(false, |n| self.grab_polls >= n);
            self.grab_polls += 1;
            if ready {
                registers::GRAB_READY
            } else {
                0
            }
        } else if reg == Registers::RawDataGrab.addr() {
            let px = self.pixels.get(self.pixel_pos).copied().unwrap_or(0);
            self.pixel_pos += 1;
            px
        } else {
            self.regs[reg as usize]
        }
    }

    fn shift(&mut self, mosi: u8) -> u8 {
        match self.phase {
            Phase::Address => {
                if mosi == Registers::MotionBurst.addr() {
                    self.log.push(Access::Burst);
                    self.phase = Phase::Burst(0);
                } else if mosi & 0x80 != 0 {
                    self.phase = Phase::Write(mosi & 0x7F);
                } else {
                    self.phase = Phase::Read(mosi);
                }
                0
            }
            Phase::Read(reg) => {
                self.phase = Phase::Done;
                self.read(reg)
            }
            Phase::Write(reg) => {
                self.log.push(Access::Write(reg, mosi));
                self.regs[reg as usize] = mosi;
                self.phase = Phase::Done;
                0
            }
            Phase::Burst(pos) => {
                assert_eq!(mosi, 0xFF, "MOSI must stay high during a burst");
                self.phase = Phase::Burst(pos + 1);
                self.burst.get(pos).copied().unwrap_or(0)
            }
            Phase::Done => panic!("byte 0x{:02x} after end of transaction", mosi),
        }
    }
}

pub type Shared = Rc<RefCell<Device>>;

pub struct SimSpi(Shared);

impl hal::blocking::spi::Write<u8> for SimSpi {
    type Error = Infallible;

    fn write(&mut self, words: &[u8]) -> Result<(), Self::Error> {
        let mut dev = self.0.borrow_mut();
        for &w in words {
            dev.shift(w);
        }
        Ok(())
    }
}

impl hal::blocking::spi::Transfer<u8> for SimSpi {
    type Error = Infallible;

    fn transfer<'w>(&mut self, words: &'w mut [u8]) -> Result<&'w [u8], Self::Error> {
        let mut dev = self.0.borrow_mut();
        for w in words.iter_mut() {
            *w = dev.shift(*w);
        }
        Ok(words)
    }
}

pub struct SimSelect(Shared);

impl OutputPin for SimSelect {
    type Error = Infallible;

    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.0.borrow_mut().phase = Phase::Address;
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.0.borrow_mut().phase = Phase::Done;
        Ok(())
    }
}

pub fn parts() -> (SimSpi, SimSelect, Shared) {
    let dev = Rc::new(RefCell::new(Device::new()));
    (SimSpi(dev.clone()), SimSelect(dev.clone()), dev)
}

pub fn sensor() -> (PAA3905<SimSpi, SimSelect, MockNoop>, Shared) {
    let (spi, csn, dev) = parts();
    (PAA3905::new(spi, csn, MockNoop::new()), dev)
}

/// One call made on the delay source
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Pause {
    Us(u8),
    Ms(u8),
}

/// Delay source that returns at once and remembers every requested pause.
/// Clones share the same record.
#[derive(Clone, Default)]
pub struct RecordingDelay(Rc<RefCell<Vec<Pause>>>);

impl RecordingDelay {
    pub fn new() -> Self {
        Self::default()
    }

    /// Hand back the pauses recorded so far and start over
    pub fn take(&self) -> Vec<Pause> {
        self.0.borrow_mut().drain(..).collect()
    }
}

impl DelayUs<u8> for RecordingDelay {
    fn delay_us(&mut self, us: u8) {
        self.0.borrow_mut().push(Pause::Us(us));
    }
}

impl DelayMs<u8> for RecordingDelay {
    fn delay_ms(&mut self, ms: u8) {
        self.0.borrow_mut().push(Pause::Ms(ms));
    }
}

pub fn timed_sensor() -> (PAA3905<SimSpi, SimSelect, RecordingDelay>, Shared, RecordingDelay) {
    let (spi, csn, dev) = parts();
    let delay = RecordingDelay::new();
    (PAA3905::new(spi, csn, delay.clone()), dev, delay)
}

/// Pauses of one framed register read
pub fn read_pauses() -> Vec<Pause> {
    vec![Pause::Us(1), Pause::Us(2), Pause::Us(1)]
}

/// Pauses of one framed register write, without settling
pub fn write_pauses() -> Vec<Pause> {
    vec![Pause::Us(1), Pause::Us(10), Pause::Us(1)]
}

/// Pauses of flushing the five motion registers
pub fn flush_pauses() -> Vec<Pause> {
    let mut pauses = Vec::new();
    for _ in 0..5 {
        pauses.extend(read_pauses());
        pauses.push(Pause::Us(2));
    }
    pauses
}
