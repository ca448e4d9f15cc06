//! Unit conversions between the MCU and Zigbee attribute ranges
//!
//! The MCU reports brightness on a 0–5 scale and colour temperature as one
//! of three presets, while the Zigbee clusters use 0–254 levels and mireds.

use crate::attributes::{ColourTemp, BRIGHTNESS_MAX, BRIGHTNESS_MIN};

/// Largest Zigbee level
pub const ZIGBEE_LEVEL_MAX: u8 = 254;

const KELVIN_WARM: u16 = 3000;
const KELVIN_NATURAL: u16 = 4200;
const KELVIN_COOL: u16 = 6500;

const MIRED_WARM: u16 = 333;
const MIRED_NATURAL: u16 = 238;
const MIRED_COOL: u16 = 154;

/// Convert a colour temperature in kelvin to mireds
///
/// Zero maps to zero; results beyond `u16` saturate.
pub fn kelvin_to_mired(kelvin: u16) -> u16 {
    if kelvin == 0 {
        return 0;
    }
    (1_000_000 / kelvin as u32).min(u16::MAX as u32) as u16
}

/// Convert mireds to a colour temperature in kelvin
pub fn mired_to_kelvin(mired: u16) -> u16 {
    kelvin_to_mired(mired)
}

impl ColourTemp {
    /// Nominal colour temperature of this preset
    pub fn kelvin(self) -> u16 {
        match self {
            ColourTemp::Warm => KELVIN_WARM,
            ColourTemp::Natural => KELVIN_NATURAL,
            ColourTemp::Cool => KELVIN_COOL,
        }
    }

    /// Nominal colour temperature of this preset in mireds
    pub fn mired(self) -> u16 {
        match self {
            ColourTemp::Warm => MIRED_WARM,
            ColourTemp::Natural => MIRED_NATURAL,
            ColourTemp::Cool => MIRED_COOL,
        }
    }

    /// Nearest preset for a colour temperature in kelvin
    pub fn from_kelvin(kelvin: u16) -> Self {
        if kelvin <= (KELVIN_WARM + KELVIN_NATURAL) / 2 {
            ColourTemp::Warm
        } else if kelvin <= (KELVIN_NATURAL + KELVIN_COOL) / 2 {
            ColourTemp::Natural
        } else {
            ColourTemp::Cool
        }
    }

    /// Nearest preset for a colour temperature in mireds
    pub fn from_mired(mired: u16) -> Self {
        Self::from_kelvin(mired_to_kelvin(mired))
    }
}

/// Integer linear mapping between two ranges, clamped to the input range
fn map_range(value: u8, in_min: u8, in_max: u8, out_min: u8, out_max: u8) -> u8 {
    let value = value.clamp(in_min, in_max) as u32;
    let scaled = (value - in_min as u32) * (out_max - out_min) as u32 / (in_max - in_min) as u32;
    (scaled + out_min as u32) as u8
}

/// Zigbee level (0–254) to MCU brightness (0–5)
pub fn zigbee_to_brightness(level: u8) -> u8 {
    map_range(level, 0, ZIGBEE_LEVEL_MAX, BRIGHTNESS_MIN, BRIGHTNESS_MAX)
}

/// MCU brightness (0–5) to Zigbee level (0–254)
pub fn brightness_to_zigbee(brightness: u8) -> u8 {
    map_range(brightness, BRIGHTNESS_MIN, BRIGHTNESS_MAX, 0, ZIGBEE_LEVEL_MAX)
}

/// Zigbee fan control level
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FanLevel {
    Off,
    Low,
    Medium,
    High,
    On,
}

impl FanLevel {
    /// Classify an MCU fan speed
    ///
    /// Speeds outside the 0–5 range map to [`FanLevel::On`].
    pub fn from_speed(speed: u32) -> Self {
        match speed {
            0 => FanLevel::Off,
            1 | 2 => FanLevel::Low,
            3 | 4 => FanLevel::Medium,
            5 => FanLevel::High,
            _ => FanLevel::On,
        }
    }
}
