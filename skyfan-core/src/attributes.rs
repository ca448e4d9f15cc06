//! Fan and light attribute domain
//!
//! Data-point identifiers used by the fan/light controller, the typed values
//! they accept, and range checks applied before a command leaves the module.

use skyfan_protocol::DataPoint;

// Data-point identifiers
pub const DP_FAN_SWITCH: u8 = 1;
pub const DP_FAN_MODE: u8 = 2;
pub const DP_FAN_SPEED: u8 = 3;
pub const DP_FAN_DIRECTION: u8 = 8;
pub const DP_LIGHT_SWITCH: u8 = 15;
pub const DP_LIGHT_BRIGHTNESS: u8 = 16;
pub const DP_LIGHT_COLOUR_TEMP: u8 = 19;

/// Fan speed range
pub const FAN_SPEED_MIN: u8 = 0;
pub const FAN_SPEED_MAX: u8 = 5;

/// Light brightness range
pub const BRIGHTNESS_MIN: u8 = 0;
pub const BRIGHTNESS_MAX: u8 = 5;

/// A requested value outside the range accepted by a data point
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct OutOfRange {
    /// Target data point
    pub dpid: u8,
    /// Rejected value
    pub value: u8,
    /// Largest accepted value
    pub max: u8,
}

/// Fan operating mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FanMode {
    #[default]
    Normal,
    Eco,
    Sleep,
}

impl FanMode {
    pub fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            0 => Some(FanMode::Normal),
            1 => Some(FanMode::Eco),
            2 => Some(FanMode::Sleep),
            _ => None,
        }
    }

    pub fn to_byte(self) -> u8 {
        match self {
            FanMode::Normal => 0,
            FanMode::Eco => 1,
            FanMode::Sleep => 2,
        }
    }
}

/// Fan rotation direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FanDirection {
    #[default]
    Forward,
    Reverse,
}

impl FanDirection {
    pub fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            0 => Some(FanDirection::Forward),
            1 => Some(FanDirection::Reverse),
            _ => None,
        }
    }

    pub fn to_byte(self) -> u8 {
        match self {
            FanDirection::Forward => 0,
            FanDirection::Reverse => 1,
        }
    }
}

/// Light colour temperature preset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ColourTemp {
    #[default]
    Warm,
    Natural,
    Cool,
}

impl ColourTemp {
    pub fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            0 => Some(ColourTemp::Warm),
            1 => Some(ColourTemp::Natural),
            2 => Some(ColourTemp::Cool),
            _ => None,
        }
    }

    pub fn to_byte(self) -> u8 {
        match self {
            ColourTemp::Warm => 0,
            ColourTemp::Natural => 1,
            ColourTemp::Cool => 2,
        }
    }
}

fn check_range(dpid: u8, value: u8, max: u8) -> Result<u8, OutOfRange> {
    if value > max {
        return Err(OutOfRange { dpid, value, max });
    }
    Ok(value)
}

/// Fan power
pub fn fan_switch(on: bool) -> DataPoint {
    DataPoint::boolean(DP_FAN_SWITCH, on)
}

/// Fan mode, raw byte `0..=2`
pub fn fan_mode(mode: u8) -> Result<DataPoint, OutOfRange> {
    let mode = check_range(DP_FAN_MODE, mode, FanMode::Sleep.to_byte())?;
    Ok(DataPoint::enumeration(DP_FAN_MODE, mode as u32))
}

/// Fan speed, `0..=5`
pub fn fan_speed(speed: u8) -> Result<DataPoint, OutOfRange> {
    let speed = check_range(DP_FAN_SPEED, speed, FAN_SPEED_MAX)?;
    Ok(DataPoint::value(DP_FAN_SPEED, speed as u32))
}

/// Fan direction, raw byte `0..=1`
pub fn fan_direction(direction: u8) -> Result<DataPoint, OutOfRange> {
    let direction = check_range(DP_FAN_DIRECTION, direction, FanDirection::Reverse.to_byte())?;
    Ok(DataPoint::enumeration(DP_FAN_DIRECTION, direction as u32))
}

/// Light power
pub fn light_switch(on: bool) -> DataPoint {
    DataPoint::boolean(DP_LIGHT_SWITCH, on)
}

/// Light brightness, `0..=5`
pub fn light_brightness(brightness: u8) -> Result<DataPoint, OutOfRange> {
    let brightness = check_range(DP_LIGHT_BRIGHTNESS, brightness, BRIGHTNESS_MAX)?;
    Ok(DataPoint::value(DP_LIGHT_BRIGHTNESS, brightness as u32))
}

/// Light colour temperature, raw byte `0..=2`
pub fn light_colour_temp(temp: u8) -> Result<DataPoint, OutOfRange> {
    let temp = check_range(DP_LIGHT_COLOUR_TEMP, temp, ColourTemp::Cool.to_byte())?;
    Ok(DataPoint::enumeration(DP_LIGHT_COLOUR_TEMP, temp as u32))
}

#[cfg(test)]
mod tests {
    use super::*;
    use skyfan_protocol::DpType;

    #[test]
    fn test_fan_speed_range() {
        assert_eq!(fan_speed(0), Ok(DataPoint::value(DP_FAN_SPEED, 0)));
        assert_eq!(fan_speed(5), Ok(DataPoint::value(DP_FAN_SPEED, 5)));
        assert_eq!(
            fan_speed(6),
            Err(OutOfRange {
                dpid: DP_FAN_SPEED,
                value: 6,
                max: 5
            })
        );
    }

    #[test]
    fn test_enumerated_ranges() {
        assert!(fan_mode(2).is_ok());
        assert!(fan_mode(3).is_err());
        assert!(fan_direction(1).is_ok());
        assert!(fan_direction(2).is_err());
        assert!(light_colour_temp(2).is_ok());
        assert!(light_colour_temp(3).is_err());
        assert!(light_brightness(5).is_ok());
        assert!(light_brightness(255).is_err());
    }

    #[test]
    fn test_data_point_types() {
        assert_eq!(fan_switch(true).dp_type, DpType::Bool);
        assert_eq!(fan_mode(1).unwrap().dp_type, DpType::Enum);
        assert_eq!(fan_speed(3).unwrap().dp_type, DpType::Value);
        assert_eq!(fan_direction(0).unwrap().dp_type, DpType::Enum);
        assert_eq!(light_switch(false), DataPoint::boolean(DP_LIGHT_SWITCH, false));
        assert_eq!(light_brightness(2).unwrap().dp_type, DpType::Value);
        assert_eq!(light_colour_temp(1).unwrap().id, DP_LIGHT_COLOUR_TEMP);
    }

    #[test]
    fn test_enum_bytes() {
        for mode in [FanMode::Normal, FanMode::Eco, FanMode::Sleep] {
            assert_eq!(FanMode::from_byte(mode.to_byte()), Some(mode));
        }
        for direction in [FanDirection::Forward, FanDirection::Reverse] {
            assert_eq!(FanDirection::from_byte(direction.to_byte()), Some(direction));
        }
        for temp in [ColourTemp::Warm, ColourTemp::Natural, ColourTemp::Cool] {
            assert_eq!(ColourTemp::from_byte(temp.to_byte()), Some(temp));
        }
        assert_eq!(FanMode::from_byte(3), None);
        assert_eq!(FanDirection::from_byte(2), None);
        assert_eq!(ColourTemp::from_byte(7), None);
    }
}
