use crate::quality;
use crate::registers::BURST_LEN;

/// Ambient light classification reported by the sensor
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum LightMode {
    Bright,
    Low,
    SuperLow,
    Unknown,
}

impl LightMode {
    /// Decode from the observation byte (mode is bits 6 and 7)
    pub fn from_observation(obs: u8) -> Self {
        match (obs & 0xC0) >> 6 {
            0 => LightMode::Bright,
            1 => LightMode::Low,
            2 => LightMode::SuperLow,
            _ => LightMode::Unknown,
        }
    }
}

/// Largest value the 23-bit shutter field can hold
pub const SHUTTER_MASK: u32 = 0x7F_FFFF;

/// One decoded motion burst.
///
/// Every field comes from the same 14-byte burst, so quality, raw statistics
/// and shutter always describe the same frame.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct MotionSample {
    /// New motion was detected since the last read
    pub available: bool,
    /// The sensor flags the surface as hard to track
    pub surface_challenged: bool,
    pub delta_x: i16,
    pub delta_y: i16,
    /// Surface quality (SQUAL)
    pub surface_quality: u8,
    pub raw_sum: u8,
    pub raw_max: u8,
    pub raw_min: u8,
    /// Exposure time, 23 bits
    pub shutter: u32,
    pub light_mode: LightMode,
}

impl MotionSample {
    /// Decode a motion burst.
    ///
    /// Layout: `[0]` motion status, `[1]` observation, `[2..=5]` delta X/Y
    /// little-endian, `[7]` SQUAL, `[8..=10]` raw data sum/max/min,
    /// `[11..=13]` shutter big-endian.
    pub fn from_burst(block: &[u8; BURST_LEN]) -> Self {
        let dx = ((block[3] as u16) << 8) | (block[2] as u16);
        let dy = ((block[5] as u16) << 8) | (block[4] as u16);
        let shutter =
            ((block[11] as u32) << 16) | ((block[12] as u32) << 8) | (block[13] as u32);

        Self {
            available: block[0] & 0x80 != 0,
            surface_challenged: block[0] & 0x01 != 0,
            delta_x: dx as i16,
            delta_y: dy as i16,
            surface_quality: block[7],
            raw_sum: block[8],
            raw_max: block[9],
            raw_min: block[10],
            shutter: shutter & SHUTTER_MASK,
            light_mode: LightMode::from_observation(block[1]),
        }
    }

    /// Whether this sample passes the quality gate for its own light mode
    pub fn is_above_threshold(&self) -> bool {
        quality::is_above_threshold(self.light_mode, self.surface_quality, self.shutter)
    }
}

/// Motion counts read one register at a time, without the burst's statistics
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct MotionCount {
    pub delta_x: i16,
    pub delta_y: i16,
    pub squal: u8,
    /// All 24 bits of the shutter registers
    pub shutter: u32,
}

impl Default for MotionSample {
    fn default() -> Self {
        Self::from_burst(&[0; BURST_LEN])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn burst_with(f: impl FnOnce(&mut [u8; BURST_LEN])) -> MotionSample {
        let mut block = [0u8; BURST_LEN];
        f(&mut block);
        MotionSample::from_burst(&block)
    }

    #[test]
    fn decodes_field_positions() {
        let block = [
            0x81, 0x40, 0x34, 0x12, 0xCC, 0xFF, 0xEE, 0x64, 0x55, 0x7A, 0x03, 0x01, 0x02, 0x03,
        ];
        let s = MotionSample::from_burst(&block);
        assert!(s.available);
        assert!(s.surface_challenged);
        assert_eq!(s.delta_x, 0x1234);
        assert_eq!(s.delta_y, -52);
        assert_eq!(s.surface_quality, 0x64);
        assert_eq!(s.raw_sum, 0x55);
        assert_eq!(s.raw_max, 0x7A);
        assert_eq!(s.raw_min, 0x03);
        assert_eq!(s.shutter, 0x010203);
        assert_eq!(s.light_mode, LightMode::Low);
        // decoding is pure
        assert_eq!(s, MotionSample::from_burst(&block));
    }

    #[test]
    fn deltas_are_sign_extended() {
        let s = burst_with(|b| {
            b[2] = 0xFF;
            b[3] = 0xFF;
            b[4] = 0x00;
            b[5] = 0x80;
        });
        assert_eq!(s.delta_x, -1);
        assert_eq!(s.delta_y, -32768);

        let s = burst_with(|b| {
            b[2] = 0xFF;
            b[3] = 0x7F;
        });
        assert_eq!(s.delta_x, 32767);
    }

    #[test]
    fn shutter_drops_top_bit() {
        let s = burst_with(|b| {
            b[11] = 0xFF;
            b[12] = 0xFF;
            b[13] = 0xFF;
        });
        assert_eq!(s.shutter, 0x7F_FFFF);

        let s = burst_with(|b| {
            b[11] = 0x80;
            b[12] = 0x12;
            b[13] = 0x34;
        });
        assert_eq!(s.shutter, 0x00_1234);

        let s = burst_with(|b| {
            b[11] = 0x02;
            b[12] = 0x59;
            b[13] = 0x98;
        });
        assert_eq!(s.shutter, 0x02_5998);
    }

    #[test]
    fn status_bits() {
        let s = burst_with(|b| b[0] = 0x80);
        assert!(s.available);
        assert!(!s.surface_challenged);

        // bits other than 7 and 0 carry nothing we decode
        let s = burst_with(|b| b[0] = 0x7E);
        assert!(!s.available);
        assert!(!s.surface_challenged);
    }

    #[test]
    fn light_mode_from_observation_bits() {
        assert_eq!(LightMode::from_observation(0x00), LightMode::Bright);
        assert_eq!(LightMode::from_observation(0x3F), LightMode::Bright);
        assert_eq!(LightMode::from_observation(0x40), LightMode::Low);
        assert_eq!(LightMode::from_observation(0x80), LightMode::SuperLow);
        assert_eq!(LightMode::from_observation(0xC0), LightMode::Unknown);

        // light mode is read from the observation byte, not the status byte
        let s = burst_with(|b| b[0] = 0xC0);
        assert_eq!(s.light_mode, LightMode::Bright);
    }

    #[test]
    fn empty_burst_is_idle_sample() {
        let s = MotionSample::default();
        assert!(!s.available);
        assert_eq!((s.delta_x, s.delta_y), (0, 0));
        assert_eq!(s.shutter, 0);
        assert_eq!(s.light_mode, LightMode::Bright);
    }
}
