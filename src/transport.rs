//! Chip-select framing and register access over SPI.
//!
//! Every register access is its own framed transaction: chip select goes low,
//! the bytes are exchanged with the fixed inter-phase delays the sensor needs,
//! and chip select goes high again. The only multi-byte transaction is the
//! motion burst.

use embedded_hal as hal;
use hal::blocking::delay::{DelayMs, DelayUs};
use hal::digital::v2::OutputPin;

#[cfg(feature = "rttdebug")]
use panic_rtt_core::rprintln;

use crate::tuning::TuningTable;
use crate::Error;

/// Combined with register address for writing a register
const DIR_WRITE: u8 = 0x80;

/// Settle time after asserting chip select
const CS_SETTLE_US: u8 = 1;
/// Between sending a read address and clocking in the data
const READ_ADDRESS_US: u8 = 2;
/// Between sending a write address and sending the data
const WRITE_ADDRESS_US: u8 = 10;
/// After the last byte of a transaction, before releasing chip select
const TRAILING_US: u8 = 1;
/// Device-side settling after a write, before the next access
const WRITE_SETTLE_US: u8 = 11;
/// Between sending the burst opcode and clocking in the burst
const BURST_ADDRESS_US: u8 = 2;
/// Chip select hold time for the bus reset toggle
const BUS_RESET_MS: u8 = 1;

/// Clocked out during a burst read, which keeps MOSI high for its duration.
///
/// The SPI peripheral owns MOSI, so the line cannot be driven as a separate
/// output. Between the last filler byte and the release of chip select its
/// level is whatever the peripheral idles at, not a guaranteed low. Wire a
/// pull-down on MOSI if the board needs it low before deselect.
const BURST_FILL: u8 = 0xFF;

pub struct Transport<SPI, CSN, D> {
    spi: SPI,
    csn: CSN,
    delay: D,
}

impl<SPI, CSN, D, CommE, PinE> Transport<SPI, CSN, D>
where
    SPI: hal::blocking::spi::Write<u8, Error = CommE> + hal::blocking::spi::Transfer<u8, Error = CommE>,
    CSN: OutputPin<Error = PinE>,
    D: DelayUs<u8> + DelayMs<u8>,
{
    pub fn new(spi: SPI, csn: CSN, delay: D) -> Self {
        let mut inst = Self { spi, csn, delay };
        //ensure that the device is initially deselected
        let _ = inst.csn.set_high();
        inst
    }

    /// Give back the bus, chip select pin and delay source
    pub fn release(self) -> (SPI, CSN, D) {
        (self.spi, self.csn, self.delay)
    }

    /// Run `phases` with chip select asserted.
    /// Chip select is released even when a phase fails.
    fn framed<T>(
        &mut self,
        phases: impl FnOnce(&mut SPI, &mut D) -> Result<T, CommE>,
    ) -> Result<T, Error<CommE, PinE>> {
        self.csn.set_low().map_err(Error::Pin)?;
        self.delay.delay_us(CS_SETTLE_US);
        let rc = phases(&mut self.spi, &mut self.delay);
        self.csn.set_high().map_err(Error::Pin)?;
        rc.map_err(Error::Comm)
    }

    /// Shift one byte out while shifting one byte in, in its own frame
    pub fn exchange(&mut self, byte: u8) -> Result<u8, Error<CommE, PinE>> {
        self.framed(|spi, _| {
            let mut buf = [byte];
            spi.transfer(&mut buf)?;
            Ok(buf[0])
        })
    }

    /// Read a single register's value
    pub fn register_read(&mut self, reg: u8) -> Result<u8, Error<CommE, PinE>> {
        let val = self.framed(|spi, delay| {
            spi.write(&[reg & !DIR_WRITE])?;
            delay.delay_us(READ_ADDRESS_US);
            let mut buf = [0u8];
            spi.transfer(&mut buf)?;
            delay.delay_us(TRAILING_US);
            Ok(buf[0])
        })?;

        #[cfg(feature = "rttdebug")]
        rprintln!("read reg 0x{:x} {:x?} ", reg, val);

        Ok(val)
    }

    /// Write a value to a single register
    pub fn register_write(&mut self, reg: u8, val: u8) -> Result<(), Error<CommE, PinE>> {
        #[cfg(feature = "rttdebug")]
        rprintln!("write reg 0x{:x} {:x?} ", reg, val);

        self.framed(|spi, delay| {
            spi.write(&[reg | DIR_WRITE])?;
            delay.delay_us(WRITE_ADDRESS_US);
            spi.write(&[val])?;
            delay.delay_us(TRAILING_US);
            Ok(())
        })
    }

    /// Write a register, then give the device time to settle before the next access
    pub fn register_write_settled(&mut self, reg: u8, val: u8) -> Result<(), Error<CommE, PinE>> {
        self.register_write(reg, val)?;
        self.delay.delay_us(WRITE_SETTLE_US);
        Ok(())
    }

    /// Apply every write of a tuning sequence, in order, with settling
    pub fn write_sequence(&mut self, table: TuningTable) -> Result<(), Error<CommE, PinE>> {
        for &(reg, val) in table {
            self.register_write_settled(reg, val)?;
        }
        Ok(())
    }

    /// Send a burst opcode and fill `buffer` with the continuous read that follows
    pub fn read_burst(&mut self, opcode: u8, buffer: &mut [u8]) -> Result<(), Error<CommE, PinE>> {
        for b in buffer.iter_mut() {
            *b = BURST_FILL;
        }
        self.framed(|spi, delay| {
            spi.write(&[opcode])?;
            delay.delay_us(BURST_ADDRESS_US);
            spi.transfer(&mut buffer[..])?;
            Ok(())
        })?;
        self.delay.delay_us(TRAILING_US);

        #[cfg(feature = "rttdebug")]
        rprintln!("burst {:x?} ", buffer);

        Ok(())
    }

    /// Toggle chip select high, low, high to resynchronize the sensor's SPI port
    pub fn bus_reset(&mut self) -> Result<(), Error<CommE, PinE>> {
        self.pulse_select()?;
        self.csn.set_high().map_err(Error::Pin)?;
        self.delay.delay_ms(BUS_RESET_MS);
        Ok(())
    }

    /// The first half of the bus reset: leaves chip select asserted
    pub fn pulse_select(&mut self) -> Result<(), Error<CommE, PinE>> {
        self.csn.set_high().map_err(Error::Pin)?;
        self.delay.delay_ms(BUS_RESET_MS);
        self.csn.set_low().map_err(Error::Pin)?;
        self.delay.delay_ms(BUS_RESET_MS);
        Ok(())
    }

    pub fn delay_us(&mut self, us: u8) {
        self.delay.delay_us(us);
    }

    pub fn delay_ms(&mut self, ms: u8) {
        self.delay.delay_ms(ms);
    }
}
