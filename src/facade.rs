//! Thin wrappers over [`PAA3905`] for the two common ways of using the sensor.

use embedded_hal as hal;
use hal::blocking::delay::{DelayMs, DelayUs};
use hal::digital::v2::OutputPin;

use crate::config::Config;
use crate::frame::FrameBuffer;
use crate::motion::MotionSample;
use crate::{Error, PAA3905};

/// Motion tracking: configure once, then poll bursts.
pub struct MotionCapture<SPI, CSN, D> {
    sensor: PAA3905<SPI, CSN, D>,
}

impl<SPI, CSN, D, CommE, PinE> MotionCapture<SPI, CSN, D>
where
    SPI: hal::blocking::spi::Write<u8, Error = CommE> + hal::blocking::spi::Transfer<u8, Error = CommE>,
    CSN: OutputPin<Error = PinE>,
    D: DelayUs<u8> + DelayMs<u8>,
{
    pub fn new(spi: SPI, csn: CSN, delay: D, config: Config) -> Self {
        Self {
            sensor: PAA3905::with_config(spi, csn, delay, config),
        }
    }

    /// Identify the sensor, then apply the configuration
    pub fn begin(&mut self) -> Result<(), Error<CommE, PinE>> {
        self.sensor.begin()?;
        self.sensor.configure()
    }

    /// Read one burst, whatever its quality
    pub fn read(&mut self) -> Result<MotionSample, Error<CommE, PinE>> {
        self.sensor.read_burst()
    }

    /// Read one burst and keep it only if it reports new motion that
    /// passes the quality gate
    pub fn read_trusted(&mut self) -> Result<Option<MotionSample>, Error<CommE, PinE>> {
        let sample = self.sensor.read_burst()?;
        if sample.available && sample.is_above_threshold() {
            Ok(Some(sample))
        } else {
            Ok(None)
        }
    }

    pub fn sensor(&mut self) -> &mut PAA3905<SPI, CSN, D> {
        &mut self.sensor
    }

    pub fn release(self) -> (SPI, CSN, D) {
        self.sensor.release()
    }
}

/// Raw frame grabbing.
pub struct FrameCapture<SPI, CSN, D> {
    sensor: PAA3905<SPI, CSN, D>,
}

impl<SPI, CSN, D, CommE, PinE> FrameCapture<SPI, CSN, D>
where
    SPI: hal::blocking::spi::Write<u8, Error = CommE> + hal::blocking::spi::Transfer<u8, Error = CommE>,
    CSN: OutputPin<Error = PinE>,
    D: DelayUs<u8> + DelayMs<u8>,
{
    pub fn new(spi: SPI, csn: CSN, delay: D, config: Config) -> Self {
        Self {
            sensor: PAA3905::with_config(spi, csn, delay, config),
        }
    }

    /// Identify the sensor, apply the configuration and switch to frame capture
    pub fn begin(&mut self) -> Result<(), Error<CommE, PinE>> {
        self.sensor.begin()?;
        self.sensor.configure()?;
        self.sensor.enter_frame_capture_mode()
    }

    pub fn capture(&mut self, frame: &mut FrameBuffer) -> Result<(), Error<CommE, PinE>> {
        self.sensor.capture_frame(frame)
    }

    /// Go back to motion reporting and hand over the engine
    pub fn into_motion(mut self) -> Result<MotionCapture<SPI, CSN, D>, Error<CommE, PinE>> {
        self.sensor.exit_frame_capture_mode()?;
        Ok(MotionCapture { sensor: self.sensor })
    }

    pub fn sensor(&mut self) -> &mut PAA3905<SPI, CSN, D> {
        &mut self.sensor
    }

    pub fn release(self) -> (SPI, CSN, D) {
        self.sensor.release()
    }
}
