//! Signal quality gate for motion samples.

use crate::motion::LightMode;

/// Shutter at or above which a bright or low light sample becomes suspect
const SHUTTER_LIMIT_BRIGHT_LOW: u32 = 0x00_FF80;
/// Shutter at or above which a super-low light sample becomes suspect
const SHUTTER_LIMIT_SUPER_LOW: u32 = 0x02_5998;

const MIN_SQUAL_BRIGHT: u8 = 25;
const MIN_SQUAL_LOW: u8 = 70;
const MIN_SQUAL_SUPER_LOW: u8 = 85;

/// Returns false when motion data should not be trusted.
///
/// A sample is rejected only when its surface quality is below the minimum
/// for the light mode *and* the shutter is at or above the limit for that
/// mode. An unknown light mode never rejects.
pub fn is_above_threshold(light_mode: LightMode, surface_quality: u8, shutter: u32) -> bool {
    let (min_squal, shutter_limit) = match light_mode {
        LightMode::Bright => (MIN_SQUAL_BRIGHT, SHUTTER_LIMIT_BRIGHT_LOW),
        LightMode::Low => (MIN_SQUAL_LOW, SHUTTER_LIMIT_BRIGHT_LOW),
        LightMode::SuperLow => (MIN_SQUAL_SUPER_LOW, SHUTTER_LIMIT_SUPER_LOW),
        LightMode::Unknown => return true,
    };

    !(surface_quality < min_squal && shutter >= shutter_limit)
}
