//! PAA3905 optical flow sensor driver for embedded-hal
//!
//! The [`PAA3905`] engine owns the SPI bus, the chip select pin and a delay
//! source, and exposes the register level protocol: identification, reset,
//! power modes, detection tuning, motion bursts and raw frame capture.
//! [`MotionCapture`] and [`FrameCapture`] wrap the engine for the two ways a
//! caller usually drives the sensor.
//!
//! The bus must be set up by the caller as [`MODE`] at no more than
//! [`SPI_FREQUENCY_HZ`].

#![cfg_attr(not(test), no_std)]

use embedded_hal as hal;
use hal::blocking::delay::{DelayMs, DelayUs};
use hal::digital::v2::OutputPin;
use log::{debug, trace, warn};

pub mod config;
mod facade;
mod frame;
mod motion;
mod quality;
pub mod registers;
pub mod transport;
pub mod tuning;

#[cfg(test)]
mod sim;

pub use config::{AutoMode, Config, DetectionMode, Orientation};
pub use facade::{FrameCapture, MotionCapture};
pub use frame::{FrameBuffer, FRAME_HEIGHT, FRAME_SIZE, FRAME_WIDTH};
pub use motion::{LightMode, MotionCount, MotionSample, SHUTTER_MASK};
pub use quality::is_above_threshold;
pub use registers::Registers;

use registers::{BURST_LEN, MOTION_FLUSH_COUNT};
use transport::Transport;

/// SPI mode expected by the sensor: clock idles high, data captured on the rising edge
pub const MODE: hal::spi::Mode = hal::spi::MODE_3;
/// Maximum SPI clock frequency
pub const SPI_FREQUENCY_HZ: u32 = 2_000_000;

/// Settle time after a reset or power transition
const POWER_SETTLE_MS: u8 = 1;
/// Spacing between the reads that flush the motion registers
const FLUSH_SPACING_US: u8 = 2;

/// Errors in this crate
#[derive(Debug)]
pub enum Error<CommE, PinE> {
    /// Sensor communication error
    Comm(CommE),
    /// Pin setting error
    Pin(PinE),

    /// Unrecognized chip ID
    UnknownChipId,
    /// Sensor not responding
    Unresponsive,
}

/// Where the sensor is in its configuration lifecycle
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum DeviceState {
    /// Nothing written yet
    Unconfigured,
    /// Soft reset issued, tuning not applied
    Reset,
    /// Tuning applied, reporting motion
    Configured,
    ShutDown,
    /// Pixel array routed to the grab register
    FrameCaptureMode,
}

/// What the sensor has last been programmed to do
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum OperatingMode {
    StandardMotion,
    EnhancedMotion,
    FrameCapture,
}

impl From<DetectionMode> for OperatingMode {
    fn from(detection: DetectionMode) -> Self {
        match detection {
            DetectionMode::Standard => OperatingMode::StandardMotion,
            DetectionMode::Enhanced => OperatingMode::EnhancedMotion,
        }
    }
}

pub struct PAA3905<SPI, CSN, D> {
    /// framed register access to the sensor
    bus: Transport<SPI, CSN, D>,
    state: DeviceState,
    mode: OperatingMode,
    /// the settings most recently written to the device
    config: Config,
    /// the last decoded motion burst
    sample: MotionSample,
}

impl<SPI, CSN, D, CommE, PinE> PAA3905<SPI, CSN, D>
where
    SPI: hal::blocking::spi::Write<u8, Error = CommE> + hal::blocking::spi::Transfer<u8, Error = CommE>,
    CSN: OutputPin<Error = PinE>,
    D: DelayUs<u8> + DelayMs<u8>,
{
    pub fn new(spi: SPI, csn: CSN, delay: D) -> Self {
        Self::with_config(spi, csn, delay, Config::default())
    }

    /// Create a driver that will apply `config` when [`configure`](Self::configure) is called
    pub fn with_config(spi: SPI, csn: CSN, delay: D, config: Config) -> Self {
        Self {
            bus: Transport::new(spi, csn, delay),
            state: DeviceState::Unconfigured,
            mode: OperatingMode::from(config.detection),
            config,
            sample: MotionSample::default(),
        }
    }

    /// Give back the bus, chip select pin and delay source
    pub fn release(self) -> (SPI, CSN, D) {
        self.bus.release()
    }

    /// Resynchronize the SPI port and verify that a PAA3905 is answering.
    ///
    /// Returns `Error::UnknownChipId` if either identity register does not
    /// hold its expected value. Nothing is retried.
    pub fn begin(&mut self) -> Result<(), Error<CommE, PinE>> {
        self.bus.bus_reset()?;

        if !self.check_id()? {
            warn!("PAA3905 identity check failed");
            return Err(Error::UnknownChipId);
        }

        debug!("PAA3905 identified");
        Ok(())
    }

    /// Whether both identity registers hold the expected values
    pub fn check_id(&mut self) -> Result<bool, Error<CommE, PinE>> {
        let cid = self.product_id()?;
        let inv_cid = self.register_read(Registers::InverseProductId)?;
        trace!("product id 0x{:02x} inverse 0x{:02x}", cid, inv_cid);

        Ok(registers::PRODUCT_ID == cid && registers::INVERSE_PRODUCT_ID == inv_cid)
    }

    pub fn product_id(&mut self) -> Result<u8, Error<CommE, PinE>> {
        self.register_read(Registers::ProductId)
    }

    pub fn revision_id(&mut self) -> Result<u8, Error<CommE, PinE>> {
        self.register_read(Registers::RevisionId)
    }

    /// Apply the stored configuration: reset, detection mode, resolution and
    /// orientation, then clear any pending motion interrupt.
    pub fn configure(&mut self) -> Result<(), Error<CommE, PinE>> {
        let config = self.config;
        self.set_mode(config.detection, config.auto_mode)?;
        self.set_resolution(config.resolution)?;
        self.set_orientation(config.orientation)?;
        self.status()?;
        Ok(())
    }

    /// Soft reset, then flush the latched motion registers
    pub fn reset(&mut self) -> Result<(), Error<CommE, PinE>> {
        debug!("PAA3905 reset");
        self.register_write(Registers::PowerUpReset, registers::RESET_MAGIC)?;
        self.bus.delay_ms(POWER_SETTLE_MS);
        self.flush_motion()?;
        self.state = DeviceState::Reset;
        Ok(())
    }

    /// Read the motion block once, discarding the values
    fn flush_motion(&mut self) -> Result<(), Error<CommE, PinE>> {
        for offset in 0..MOTION_FLUSH_COUNT {
            self.bus.register_read(Registers::Motion.addr() + offset)?;
            self.bus.delay_us(FLUSH_SPACING_US);
        }
        Ok(())
    }

    /// Reset the sensor and load the tuning for a detection mode and light-mode switching policy.
    ///
    /// The reset always comes first and the auto switching writes always
    /// follow the complete tuning table.
    pub fn set_mode(&mut self, detection: DetectionMode, auto_mode: AutoMode) -> Result<(), Error<CommE, PinE>> {
        self.reset()?;
        self.bus.write_sequence(detection.tuning_table())?;
        self.bus.write_sequence(auto_mode.sequence())?;

        self.config.detection = detection;
        self.config.auto_mode = auto_mode;
        self.mode = OperatingMode::from(detection);
        self.state = DeviceState::Configured;
        debug!("PAA3905 mode {:?} {:?}", detection, auto_mode);
        Ok(())
    }

    pub fn set_orientation(&mut self, orientation: Orientation) -> Result<(), Error<CommE, PinE>> {
        self.register_write(Registers::Orientation, orientation.bits())?;
        self.config.orientation = orientation;
        Ok(())
    }

    pub fn orientation(&mut self) -> Result<Orientation, Error<CommE, PinE>> {
        Ok(Orientation(self.register_read(Registers::Orientation)?))
    }

    pub fn set_resolution(&mut self, resolution: u8) -> Result<(), Error<CommE, PinE>> {
        self.register_write(Registers::Resolution, resolution)?;
        self.config.resolution = resolution;
        Ok(())
    }

    /// Raw content of the resolution register
    pub fn resolution_raw(&mut self) -> Result<u8, Error<CommE, PinE>> {
        self.register_read(Registers::Resolution)
    }

    /// Resolution, using the vendor's empirical scale factor
    pub fn resolution(&mut self) -> Result<f32, Error<CommE, PinE>> {
        let raw = self.resolution_raw()?;
        Ok(resolution_from_raw(raw))
    }

    /// Enter shutdown
    pub fn shutdown(&mut self) -> Result<(), Error<CommE, PinE>> {
        debug!("PAA3905 shutdown");
        self.register_write(Registers::Shutdown, registers::SHUTDOWN_MAGIC)?;
        self.state = DeviceState::ShutDown;
        Ok(())
    }

    /// Leave shutdown
    pub fn powerup(&mut self) -> Result<(), Error<CommE, PinE>> {
        debug!("PAA3905 powerup");
        self.bus.pulse_select()?;
        self.register_write(Registers::Shutdown, registers::WAKEUP_MAGIC)?;
        self.bus.delay_ms(POWER_SETTLE_MS);
        self.register_write(Registers::Shutdown, 0x00)?;
        self.bus.delay_ms(POWER_SETTLE_MS);
        self.flush_motion()?;
        if self.state == DeviceState::ShutDown {
            self.state = DeviceState::Configured;
        }
        Ok(())
    }

    /// Read the motion register, which also clears the motion interrupt
    pub fn status(&mut self) -> Result<u8, Error<CommE, PinE>> {
        self.register_read(Registers::Motion)
    }

    /// Read motion counts register by register rather than in a burst
    pub fn read_motion_count(&mut self) -> Result<MotionCount, Error<CommE, PinE>> {
        let dx_h = self.register_read(Registers::DeltaXH)? as u16;
        let dx_l = self.register_read(Registers::DeltaXL)? as u16;
        let dy_h = self.register_read(Registers::DeltaYH)? as u16;
        let dy_l = self.register_read(Registers::DeltaYL)? as u16;
        let squal = self.register_read(Registers::Squal)?;
        let sh_h = self.register_read(Registers::ShutterUpper)? as u32;
        let sh_m = self.register_read(Registers::ShutterMiddle)? as u32;
        let sh_l = self.register_read(Registers::ShutterLower)? as u32;

        Ok(MotionCount {
            delta_x: ((dx_h << 8) | dx_l) as i16,
            delta_y: ((dy_h << 8) | dy_l) as i16,
            squal,
            shutter: (sh_h << 16) | (sh_m << 8) | sh_l,
        })
    }

    /// Read the motion block in one burst and keep the decoded sample
    pub fn read_burst(&mut self) -> Result<MotionSample, Error<CommE, PinE>> {
        let mut block = [0u8; BURST_LEN];
        self.bus.read_burst(Registers::MotionBurst.addr(), &mut block)?;
        self.sample = MotionSample::from_burst(&block);
        trace!("{:?}", self.sample);
        Ok(self.sample)
    }

    /// The sample decoded by the last [`read_burst`](Self::read_burst)
    pub fn sample(&self) -> &MotionSample {
        &self.sample
    }

    pub fn motion_data_available(&self) -> bool {
        self.sample.available
    }

    pub fn challenging_surface_detected(&self) -> bool {
        self.sample.surface_challenged
    }

    pub fn delta_x(&self) -> i16 {
        self.sample.delta_x
    }

    pub fn delta_y(&self) -> i16 {
        self.sample.delta_y
    }

    pub fn surface_quality(&self) -> u8 {
        self.sample.surface_quality
    }

    pub fn raw_data_sum(&self) -> u8 {
        self.sample.raw_sum
    }

    pub fn raw_data_max(&self) -> u8 {
        self.sample.raw_max
    }

    pub fn raw_data_min(&self) -> u8 {
        self.sample.raw_min
    }

    pub fn shutter(&self) -> u32 {
        self.sample.shutter
    }

    pub fn light_mode(&self) -> LightMode {
        self.sample.light_mode
    }

    pub fn state(&self) -> DeviceState {
        self.state
    }

    pub fn mode(&self) -> OperatingMode {
        self.mode
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Read a single register's value
    pub fn register_read(&mut self, reg: Registers) -> Result<u8, Error<CommE, PinE>> {
        self.bus.register_read(reg.addr())
    }

    /// Write a value to a single register
    pub fn register_write(&mut self, reg: Registers, val: u8) -> Result<(), Error<CommE, PinE>> {
        self.bus.register_write(reg.addr(), val)
    }
}

/// Convert a raw resolution register value with the vendor's scale factor
pub fn resolution_from_raw(raw: u8) -> f32 {
    (raw as f32 + 1.0) * 200.0 / 8600.0 * 11.914
}
