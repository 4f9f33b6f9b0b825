//! Register write sequences supplied by PixArt.
//!
//! None of these registers are described in the datasheet; the values
//! must be reproduced exactly as given.

/// An ordered list of `(register, value)` writes, applied with a settle
/// delay after each one.
pub type TuningTable = &'static [(u8, u8)];

/// Performance optimization for standard detection (the power-on default)
pub const STANDARD_DETECTION: TuningTable = &[
    (0x7F, 0x00),
    (0x51, 0xFF),
    (0x4E, 0x2A),
    (0x66, 0x3E),
    (0x7F, 0x14),
    (0x7E, 0x71),
    (0x55, 0x00),
    (0x59, 0x00),
    (0x6F, 0x2C),
    (0x7F, 0x05),
    (0x4D, 0xAC),
    (0x4E, 0x32),
    (0x7F, 0x09),
    (0x5C, 0xAF),
    (0x5F, 0xAF),
    (0x70, 0x08),
    (0x71, 0x04),
    (0x72, 0x06),
    (0x74, 0x3C),
    (0x75, 0x28),
    (0x76, 0x20),
    (0x4E, 0xBF),
    (0x7F, 0x03),
    (0x64, 0x14),
    (0x65, 0x0A),
    (0x66, 0x10),
    (0x55, 0x3C),
    (0x56, 0x28),
    (0x57, 0x20),
    (0x4A, 0x2D),
    (0x4B, 0x2D),
    (0x4E, 0x4B),
    (0x69, 0xFA),
    (0x7F, 0x05),
    (0x69, 0x1F),
    (0x47, 0x1F),
    (0x48, 0x0C),
    (0x5A, 0x20),
    (0x75, 0x0F),
    (0x4A, 0x0F),
    (0x42, 0x02),
    (0x45, 0x03),
    (0x65, 0x00),
    (0x67, 0x76),
    (0x68, 0x76),
    (0x6A, 0xC5),
    (0x43, 0x00),
    (0x7F, 0x06),
    (0x4A, 0x18),
    (0x4B, 0x0C),
    (0x4C, 0x0C),
    (0x4D, 0x0C),
    (0x46, 0x0A),
    (0x59, 0xCD),
    (0x7F, 0x0A),
    (0x4A, 0x2A),
    (0x48, 0x96),
    (0x52, 0xB4),
    (0x7F, 0x00),
    (0x5B, 0xA0),
];

/// Performance optimization for enhanced detection (dim or low-texture surfaces)
pub const ENHANCED_DETECTION: TuningTable = &[
    (0x7F, 0x00),
    (0x51, 0xFF),
    (0x4E, 0x2A),
    (0x66, 0x26),
    (0x7F, 0x14),
    (0x7E, 0x71),
    (0x55, 0x00),
    (0x59, 0x00),
    (0x6F, 0x2C),
    (0x7F, 0x05),
    (0x4D, 0xAC),
    (0x4E, 0x65),
    (0x7F, 0x09),
    (0x5C, 0xAF),
    (0x5F, 0xAF),
    (0x70, 0x00),
    (0x71, 0x00),
    (0x72, 0x00),
    (0x74, 0x14),
    (0x75, 0x14),
    (0x76, 0x06),
    (0x4E, 0x8F),
    (0x7F, 0x03),
    (0x64, 0x00),
    (0x65, 0x00),
    (0x66, 0x00),
    (0x55, 0x14),
    (0x56, 0x14),
    (0x57, 0x06),
    (0x4A, 0x20),
    (0x4B, 0x20),
    (0x4E, 0x32),
    (0x69, 0xFE),
    (0x7F, 0x05),
    (0x69, 0x14),
    (0x47, 0x14),
    (0x48, 0x1C),
    (0x5A, 0x20),
    (0x75, 0xE5),
    (0x4A, 0x05),
    (0x42, 0x04),
    (0x45, 0x03),
    (0x65, 0x00),
    (0x67, 0x50),
    (0x68, 0x50),
    (0x6A, 0xC5),
    (0x43, 0x00),
    (0x7F, 0x06),
    (0x4A, 0x1E),
    (0x4B, 0x1E),
    (0x4C, 0x34),
    (0x4D, 0x34),
    (0x46, 0x32),
    (0x59, 0x0D),
    (0x7F, 0x0A),
    (0x4A, 0x2A),
    (0x48, 0x96),
    (0x52, 0xB4),
    (0x7F, 0x00),
    (0x5B, 0xA0),
];

/// Automatic switching between bright and low light only
pub const AUTO_MODE_01: TuningTable = &[(0x7F, 0x08), (0x68, 0x01), (0x7F, 0x00)];

/// Automatic switching between bright, low and super-low light
pub const AUTO_MODE_012: TuningTable = &[(0x7F, 0x08), (0x68, 0x02), (0x7F, 0x00)];

/// Routes the raw pixel array to the grab register
pub const ENTER_FRAME_CAPTURE: TuningTable = &[
    (0x7F, 0x00),
    (0x67, 0x25),
    (0x55, 0x20),
    (0x7F, 0x13),
    (0x42, 0x01),
    (0x7F, 0x00),
    (0x0F, 0x11),
    (0x0F, 0x13),
    (0x0F, 0x11),
];

/// Restores normal motion processing after a frame capture
pub const EXIT_FRAME_CAPTURE: TuningTable = &[
    (0x7F, 0x00),
    (0x55, 0x00),
    (0x7F, 0x13),
    (0x42, 0x00),
    (0x7F, 0x00),
    (0x67, 0xA5),
];
