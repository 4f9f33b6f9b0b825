//! PAA3905 register map
//!
//! Only the registers the driver addresses by name are listed here.
//! The tuning sequences in [`crate::tuning`] poke many more, undocumented,
//! registers by raw address.

#[repr(u8)]
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Registers {
    ProductId = 0x00,
    RevisionId = 0x01,
    Motion = 0x02,
    DeltaXL = 0x03,
    DeltaXH = 0x04,
    DeltaYL = 0x05,
    DeltaYH = 0x06,
    Squal = 0x07,
    RawDataSum = 0x08,
    MaximumRawData = 0x09,
    MinimumRawData = 0x0A,
    ShutterLower = 0x0B,
    ShutterMiddle = 0x0C,
    ShutterUpper = 0x0D,
    RawDataGrabStatus = 0x10,
    RawDataGrab = 0x13,
    Observation = 0x15,
    MotionBurst = 0x16,

    PowerUpReset = 0x3A,
    Shutdown = 0x3B,

    Resolution = 0x4E,
    Orientation = 0x5B,

    InverseProductId = 0x5F,
}

impl Registers {
    #[inline]
    pub fn addr(self) -> u8 {
        self as u8
    }
}

/// Expected content of `ProductId`
pub const PRODUCT_ID: u8 = 0xA2;
/// Expected content of `InverseProductId`
pub const INVERSE_PRODUCT_ID: u8 = 0x5D;

/// Written to `PowerUpReset` to trigger a soft reset
pub const RESET_MAGIC: u8 = 0x5A;
/// Written to `Shutdown` to enter shutdown
pub const SHUTDOWN_MAGIC: u8 = 0xB6;
/// Written to `Shutdown` to leave shutdown
pub const WAKEUP_MAGIC: u8 = 0xC7;

/// Written to `RawDataGrab` to start dumping the pixel array
pub const GRAB_TRIGGER: u8 = 0xFF;
/// Set in `RawDataGrabStatus` once a frame is ready to be read
pub const GRAB_READY: u8 = 0x01;

/// Number of bytes returned by a motion burst read
pub const BURST_LEN: usize = 14;

/// Number of motion registers, starting at `Motion`, read to flush latched data
pub const MOTION_FLUSH_COUNT: u8 = 5;
