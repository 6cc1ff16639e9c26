//! V-Pot LED ring encoding.
//!
//! The ring payload is a display type code in the upper nibble
//! OR'ed with a position in the lower nibble. Only 11 LEDs are
//! addressable, position 0 switches the ring off.

use std::fmt;

pub const LED_COUNT: i32 = 11;
pub const SPREAD_COUNT: i32 = 6;

/// Relative steps are reported in `[-MAX_STEP, MAX_STEP]`.
pub const MAX_STEP: i32 = 7;

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum DisplayType {
    None,
    /// Single LED moving from the first to the last.
    Pan,
    /// Fan out left or right from the center LED.
    Trim,
    /// Fan out from the first LED until all LEDs are on.
    #[default]
    Fan,
    /// Fan out left and right from the center LED until all LEDs are on.
    Spread,
}

impl DisplayType {
    pub const ALL: [DisplayType; 5] = [
        DisplayType::None,
        DisplayType::Pan,
        DisplayType::Trim,
        DisplayType::Fan,
        DisplayType::Spread,
    ];

    pub fn code(self) -> u8 {
        use DisplayType::*;
        match self {
            None | Pan => 0x00,
            Trim => 0x10,
            Fan => 0x20,
            Spread => 0x30,
        }
    }

    pub fn as_str(self) -> &'static str {
        use DisplayType::*;
        match self {
            None => "none",
            Pan => "pan",
            Trim => "trim",
            Fan => "fan",
            Spread => "spread",
        }
    }
}

impl fmt::Display for DisplayType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[inline]
fn position(count: i32, ratio: f64) -> u8 {
    ((count as f64 * ratio).floor() as i32 + 1).clamp(1, count) as u8
}

pub fn absolute_position(
    display: DisplayType,
    value: i32,
    min: i32,
    max: i32,
    listened: bool,
) -> u8 {
    if !listened {
        return 0;
    }

    let range = (max as i64 - min as i64) as f64;
    let ratio = if range > 0f64 {
        (value as i64 - min as i64) as f64 / range
    } else {
        0f64
    };

    match display {
        DisplayType::None => 0,
        DisplayType::Spread => position(SPREAD_COUNT, ratio),
        _ => position(LED_COUNT, ratio),
    }
}

pub fn relative_positions(display: DisplayType, step: i32, listened: bool) -> (u8, u8) {
    if !listened {
        return (0, 0);
    }

    let span = (2 * MAX_STEP) as f64;
    match display {
        DisplayType::None => (0, 0),
        DisplayType::Spread => {
            let pulse = (SPREAD_COUNT as f64 / span * step.abs() as f64 + 3f64).floor() as i32 + 1;
            (pulse.clamp(1, SPREAD_COUNT) as u8, 1)
        }
        _ => (
            position(LED_COUNT, (step + MAX_STEP) as f64 / span),
            (LED_COUNT / 2 + 1) as u8,
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absolute_fan_midpoint() {
        assert_eq!(absolute_position(DisplayType::Fan, 64, 0, 127, true), 6);
        assert_eq!(DisplayType::Fan.code() | 6, 0x26);
    }

    #[test]
    fn absolute_extreme_bounds() {
        assert_eq!(absolute_position(DisplayType::Fan, i32::MIN, i32::MIN, i32::MAX, true), 1);
        assert_eq!(absolute_position(DisplayType::Fan, 0, i32::MIN, i32::MAX, true), 6);
        assert_eq!(absolute_position(DisplayType::Fan, i32::MAX, i32::MIN, i32::MAX, true), 11);
        assert_eq!(absolute_position(DisplayType::Spread, i32::MAX, 0, i32::MAX, true), 6);
    }

    #[test]
    fn absolute_bounds() {
        for display in [DisplayType::Pan, DisplayType::Trim, DisplayType::Fan] {
            assert_eq!(absolute_position(display, 0, 0, 127, true), 1);
            assert_eq!(absolute_position(display, 127, 0, 127, true), 11);
        }

        assert_eq!(absolute_position(DisplayType::Spread, 0, 0, 127, true), 1);
        assert_eq!(absolute_position(DisplayType::Spread, 127, 0, 127, true), 6);
        assert_eq!(absolute_position(DisplayType::Spread, -223, -223, 223, true), 1);
    }

    #[test]
    fn absolute_empty_range() {
        assert_eq!(absolute_position(DisplayType::Fan, 5, 5, 5, true), 1);
    }

    #[test]
    fn no_listener_no_display() {
        for display in DisplayType::ALL {
            assert_eq!(absolute_position(display, 64, 0, 127, false), 0);
            assert_eq!(relative_positions(display, -3, false), (0, 0));
        }

        assert_eq!(absolute_position(DisplayType::None, 64, 0, 127, true), 0);
        assert_eq!(relative_positions(DisplayType::None, 3, true), (0, 0));
    }

    #[test]
    fn relative_fan() {
        assert_eq!(relative_positions(DisplayType::Fan, -3, true), (4, 6));
        assert_eq!(relative_positions(DisplayType::Fan, 0, true), (6, 6));
        assert_eq!(relative_positions(DisplayType::Fan, -7, true), (1, 6));
        assert_eq!(relative_positions(DisplayType::Fan, 7, true), (11, 6));
    }

    #[test]
    fn relative_spread() {
        assert_eq!(relative_positions(DisplayType::Spread, 0, true), (4, 1));
        assert_eq!(relative_positions(DisplayType::Spread, -3, true), (5, 1));
        assert_eq!(relative_positions(DisplayType::Spread, 7, true), (6, 1));
    }
}
