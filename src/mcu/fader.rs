use std::fmt;

use crate::control::{clip, IntControl, Listener, Listeners};

const MIN: i32 = 0;
const MAX: i32 = 127;

const SIGN_BIT: u8 = 0x40;

/// How a fader payload maps to a position.
///
/// Depending on the MIDI stack, some surfaces report the position with its
/// `0x40` bit flipped. The decode strategy must match what the host receives.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum FaderDecode {
    #[default]
    Absolute,
    /// The `0x40` bit is flipped: `data + 0x40` if clear, `data - 0x40` if set.
    SignRemap,
}

impl FaderDecode {
    pub fn decode(self, data: u8) -> i32 {
        let data = data as i32;
        match self {
            FaderDecode::Absolute => data,
            FaderDecode::SignRemap => {
                if data & SIGN_BIT as i32 == 0 {
                    data + SIGN_BIT as i32
                } else {
                    data - SIGN_BIT as i32
                }
            }
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            FaderDecode::Absolute => "absolute",
            FaderDecode::SignRemap => "sign-remap",
        }
    }
}

impl fmt::Display for FaderDecode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A motorized fader.
///
/// Listeners are notified on every set since the fader is a continuous control.
/// No feedback is sent: the motor already shows the position.
#[derive(Debug)]
pub struct FaderControl {
    value: i32,
    decode: FaderDecode,
    listeners: Listeners,
}

impl FaderControl {
    pub fn new(decode: FaderDecode) -> Self {
        Self {
            value: MIN,
            decode,
            listeners: Listeners::default(),
        }
    }

    pub fn decode_strategy(&self) -> FaderDecode {
        self.decode
    }

    pub fn set_value_silently(&mut self, value: i32) {
        self.value = clip(value, MIN, MAX);
    }

    pub(crate) fn update(&mut self, data: u8) {
        self.set_value(self.decode.decode(data));
    }
}

impl IntControl for FaderControl {
    fn value(&self) -> i32 {
        self.value
    }

    fn set_value(&mut self, value: i32) {
        self.value = clip(value, MIN, MAX);
        self.listeners.notify(self.value);
    }

    fn min(&self) -> i32 {
        MIN
    }

    fn max(&self) -> i32 {
        MAX
    }

    fn listeners(&self) -> &Listeners {
        &self.listeners
    }

    fn add_listener(&mut self, listener: Listener) -> bool {
        self.listeners.add(listener)
    }

    fn remove_listener(&mut self, listener: &Listener) -> bool {
        self.listeners.remove(listener)
    }

    fn clear_listeners(&mut self) {
        self.listeners.clear();
    }
}
