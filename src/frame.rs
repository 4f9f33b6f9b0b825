//! Raw pixel frame capture.
//!
//! Capturing switches the sensor's internal multiplexer so that the pixel
//! array can be read, one byte per transaction, from the grab register.
//! Motion reporting stays off until `exit_frame_capture_mode` is called.

use embedded_hal as hal;
use hal::blocking::delay::{DelayMs, DelayUs};
use hal::digital::v2::OutputPin;
use log::{debug, warn};

use crate::config::{AutoMode, DetectionMode};
use crate::registers::{self, Registers};
use crate::tuning;
use crate::{DeviceState, Error, OperatingMode, PAA3905};

pub const FRAME_WIDTH: usize = 35;
pub const FRAME_HEIGHT: usize = 35;
/// Size of the sensor: 35 x 35 pixels
pub const FRAME_SIZE: usize = FRAME_WIDTH * FRAME_HEIGHT;

/// Pause after each grab status read that reports no frame yet, so the
/// poll limit bounds the wait in time as well as in bus traffic
const GRAB_POLL_SPACING_US: u8 = 10;

/// One raw intensity image, stored row-major
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct FrameBuffer {
    pixels: [u8; FRAME_SIZE],
}

impl FrameBuffer {
    pub fn new() -> Self {
        Self { pixels: [0; FRAME_SIZE] }
    }

    pub fn as_bytes(&self) -> &[u8; FRAME_SIZE] {
        &self.pixels
    }

    /// Intensity at `row`, `col`.
    ///
    /// # Panics
    ///
    /// If `row` is not below `FRAME_HEIGHT` or `col` is not below `FRAME_WIDTH`.
    pub fn pixel(&self, row: usize, col: usize) -> u8 {
        assert!(row < FRAME_HEIGHT && col < FRAME_WIDTH, "pixel ({}, {}) outside frame", row, col);
        self.pixels[row * FRAME_WIDTH + col]
    }

    /// One row of `FRAME_WIDTH` pixels.
    ///
    /// # Panics
    ///
    /// If `row` is not below `FRAME_HEIGHT`.
    pub fn row(&self, row: usize) -> &[u8] {
        &self.pixels[row * FRAME_WIDTH..(row + 1) * FRAME_WIDTH]
    }

    pub fn rows(&self) -> impl Iterator<Item = &[u8]> {
        self.pixels.chunks(FRAME_WIDTH)
    }
}

impl Default for FrameBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl<SPI, CSN, D, CommE, PinE> PAA3905<SPI, CSN, D>
where
    SPI: hal::blocking::spi::Write<u8, Error = CommE> + hal::blocking::spi::Transfer<u8, Error = CommE>,
    CSN: OutputPin<Error = PinE>,
    D: DelayUs<u8> + DelayMs<u8>,
{
    /// Route the pixel array to the grab register.
    ///
    /// The sensor is forced to standard detection with two-state switching
    /// first: frames cannot be grabbed in super-low light mode.
    pub fn enter_frame_capture_mode(&mut self) -> Result<(), Error<CommE, PinE>> {
        self.set_mode(DetectionMode::Standard, AutoMode::TwoState)?;
        self.bus.write_sequence(tuning::ENTER_FRAME_CAPTURE)?;
        self.state = DeviceState::FrameCaptureMode;
        self.mode = OperatingMode::FrameCapture;
        debug!("PAA3905 entered frame capture");
        Ok(())
    }

    /// Capture a frame, giving up after the configured number of grab status polls
    pub fn capture_frame(&mut self, frame: &mut FrameBuffer) -> Result<(), Error<CommE, PinE>> {
        let limit = self.config.grab_poll_limit;
        self.capture_frame_with_limit(frame, limit)
    }

    /// Capture a frame into `frame`, entering frame capture mode first if needed.
    ///
    /// Returns `Error::Unresponsive` if the sensor has not reported a frame
    /// ready after `max_polls` reads of the grab status; in that case the
    /// grab is never triggered and `frame` is left untouched.
    pub fn capture_frame_with_limit(
        &mut self,
        frame: &mut FrameBuffer,
        max_polls: u32,
    ) -> Result<(), Error<CommE, PinE>> {
        if self.state != DeviceState::FrameCaptureMode {
            self.enter_frame_capture_mode()?;
        }

        self.wait_grab_ready(max_polls)?;

        self.bus
            .register_write_settled(Registers::RawDataGrab.addr(), registers::GRAB_TRIGGER)?;

        for px in frame.pixels.iter_mut() {
            *px = self.register_read(Registers::RawDataGrab)?;
        }

        Ok(())
    }

    fn wait_grab_ready(&mut self, max_polls: u32) -> Result<(), Error<CommE, PinE>> {
        for _ in 0..max_polls {
            let status = self.register_read(Registers::RawDataGrabStatus)?;
            if status & registers::GRAB_READY != 0 {
                return Ok(());
            }
            self.bus.delay_us(GRAB_POLL_SPACING_US);
        }

        warn!("PAA3905 frame not ready after {} polls", max_polls);
        Err(Error::Unresponsive)
    }

    /// Restore normal motion processing after frame capture.
    ///
    /// The exit sequence is always written, but the state only changes when
    /// the device was in frame capture mode.
    pub fn exit_frame_capture_mode(&mut self) -> Result<(), Error<CommE, PinE>> {
        self.bus.write_sequence(tuning::EXIT_FRAME_CAPTURE)?;
        if self.state == DeviceState::FrameCaptureMode {
            self.state = DeviceState::Configured;
            self.mode = OperatingMode::from(self.config.detection);
        }
        debug!("PAA3905 left frame capture");
        Ok(())
    }
}
