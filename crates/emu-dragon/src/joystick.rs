//! Analogue joysticks.
//!
//! Each stick is two potentiometers read through the 6-bit DAC: software
//! writes a trial value to PIA1 PA2-PA7, selects an axis with PIA0 CA2
//! (X/Y) and CB2 (right/left), then reads the comparator on PIA0 PA7.
//! Fire buttons short PIA0 PA0 (right) and PA1 (left) to ground.

/// Largest axis reading.
pub const AXIS_MAX: u8 = 63;
/// Axis reading with the stick released.
pub const AXIS_CENTRE: u8 = 32;

/// One stick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JoystickState {
    /// 0 (left) ..= 63 (right).
    pub x: u8,
    /// 0 (up) ..= 63 (down).
    pub y: u8,
    pub fire: bool,
}

impl Default for JoystickState {
    fn default() -> Self {
        Self {
            x: AXIS_CENTRE,
            y: AXIS_CENTRE,
            fire: false,
        }
    }
}

/// Digital controller state, e.g. a d-pad.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DigitalPad {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
    pub fire: bool,
}

impl JoystickState {
    /// Map a digital pad to full deflection (0/32/63) per axis.
    #[must_use]
    pub fn from_digital(pad: DigitalPad) -> Self {
        let axis = |low: bool, high: bool| match (low, high) {
            (true, false) => 0,
            (false, true) => AXIS_MAX,
            _ => AXIS_CENTRE,
        };
        Self {
            x: axis(pad.left, pad.right),
            y: axis(pad.up, pad.down),
            fire: pad.fire,
        }
    }

    fn axis(&self, vertical: bool) -> u8 {
        if vertical {
            self.y.min(AXIS_MAX)
        } else {
            self.x.min(AXIS_MAX)
        }
    }
}

/// Comparator output for PIA0 PA7.
///
/// `select` is `(CB2 << 1) | CA2`: 0 right X, 1 right Y, 2 left X,
/// 3 left Y. `dac` is the 6-bit DAC value. High when the stick reading is
/// at or above the DAC level.
#[must_use]
pub fn comparator(sticks: &[JoystickState; 2], select: u8, dac: u8) -> bool {
    let stick = &sticks[usize::from((select >> 1) & 1)];
    stick.axis(select & 1 != 0) >= dac & 0x3F
}

/// PIA0 port A bits pulled low by the fire buttons.
#[must_use]
pub fn fire_mask(sticks: &[JoystickState; 2]) -> u8 {
    u8::from(sticks[0].fire) | (u8::from(sticks[1].fire) << 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn digital_pad_maps_to_extremes() {
        let stick = JoystickState::from_digital(DigitalPad {
            left: true,
            down: true,
            ..DigitalPad::default()
        });
        assert_eq!((stick.x, stick.y), (0, AXIS_MAX));

        let centred = JoystickState::from_digital(DigitalPad {
            left: true,
            right: true,
            ..DigitalPad::default()
        });
        assert_eq!(centred.x, AXIS_CENTRE);
    }

    #[test]
    fn comparator_selects_axis() {
        let sticks = [
            JoystickState {
                x: 10,
                y: 50,
                fire: false,
            },
            JoystickState {
                x: 63,
                y: 0,
                fire: true,
            },
        ];
        assert!(comparator(&sticks, 0, 10));
        assert!(!comparator(&sticks, 0, 11));
        assert!(comparator(&sticks, 1, 50));
        assert!(comparator(&sticks, 2, 63));
        assert!(!comparator(&sticks, 3, 1));
    }

    #[test]
    fn fire_buttons() {
        let mut sticks = [JoystickState::default(); 2];
        assert_eq!(fire_mask(&sticks), 0);
        sticks[1].fire = true;
        assert_eq!(fire_mask(&sticks), 0x02);
    }
}
