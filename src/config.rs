use core::ops::BitOr;

use crate::tuning::{self, TuningTable};

/// Detection profile: a bundle of tuning-register values trading
/// sensitivity for noise immunity.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum DetectionMode {
    Standard,
    Enhanced,
}

impl DetectionMode {
    pub(crate) fn tuning_table(self) -> TuningTable {
        match self {
            DetectionMode::Standard => tuning::STANDARD_DETECTION,
            DetectionMode::Enhanced => tuning::ENHANCED_DETECTION,
        }
    }
}

/// How many light-level states the sensor switches between on its own.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum AutoMode {
    /// Bright and low light
    TwoState,
    /// Bright, low and super-low light
    ThreeState,
}

impl AutoMode {
    pub(crate) fn sequence(self) -> TuningTable {
        match self {
            AutoMode::TwoState => tuning::AUTO_MODE_01,
            AutoMode::ThreeState => tuning::AUTO_MODE_012,
        }
    }
}

/// Orientation bitmask written to the `Orientation` register.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub struct Orientation(pub u8);

impl Orientation {
    pub const NORMAL: Orientation = Orientation(0x00);
    pub const X_INVERT: Orientation = Orientation(0x80);
    pub const Y_INVERT: Orientation = Orientation(0x40);
    pub const SWAP: Orientation = Orientation(0x20);

    pub fn bits(self) -> u8 {
        self.0
    }

    pub fn contains(self, other: Orientation) -> bool {
        self.0 & other.0 == other.0
    }
}

impl BitOr for Orientation {
    type Output = Orientation;

    fn bitor(self, rhs: Orientation) -> Orientation {
        Orientation(self.0 | rhs.0)
    }
}

/// Resolution register content loaded by the standard tuning table
pub const DEFAULT_RESOLUTION: u8 = 0x2A;

/// Grab-status reads attempted before a frame capture gives up
pub const DEFAULT_GRAB_POLL_LIMIT: u32 = 10_000;

/// Configuration settings for the PAA3905 sensor.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Config {
    /// Detection profile applied by `set_mode`
    pub detection: DetectionMode,
    /// Light-mode auto switching policy applied by `set_mode`
    pub auto_mode: AutoMode,
    pub orientation: Orientation,
    /// Raw resolution register value
    pub resolution: u8,
    /// Upper bound on grab-status polls during a frame capture
    pub grab_poll_limit: u32,
}

impl Config {
    /// Creates a new `Config` with the given detection profile and auto switching policy,
    /// and defaults for everything else.
    pub fn new(detection: DetectionMode, auto_mode: AutoMode) -> Config {
        Config {
            detection,
            auto_mode,
            ..Config::default()
        }
    }

    pub fn detection(mut self, detection: DetectionMode) -> Self {
        self.detection = detection;
        self
    }

    pub fn auto_mode(mut self, auto_mode: AutoMode) -> Self {
        self.auto_mode = auto_mode;
        self
    }

    pub fn orientation(mut self, orientation: Orientation) -> Self {
        self.orientation = orientation;
        self
    }

    pub fn resolution(mut self, resolution: u8) -> Self {
        self.resolution = resolution;
        self
    }

    /// Sets the number of grab-status polls allowed before a frame capture
    /// reports the sensor as unresponsive.
    pub fn grab_poll_limit(mut self, limit: u32) -> Self {
        self.grab_poll_limit = limit;
        self
    }
}

impl Default for Config {
    /// Standard detection with three-state auto switching, normal orientation
    /// and the power-on resolution.
    fn default() -> Config {
        Config {
            detection: DetectionMode::Standard,
            auto_mode: AutoMode::ThreeState,
            orientation: Orientation::NORMAL,
            resolution: DEFAULT_RESOLUTION,
            grab_poll_limit: DEFAULT_GRAB_POLL_LIMIT,
        }
    }
}
