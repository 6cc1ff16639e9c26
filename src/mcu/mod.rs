//! Mackie Control Universal controls and panel.

mod button;
pub use button::{ButtonControl, TOGGLE_OFF, TOGGLE_ON};

mod error;
pub use error::Error;

mod fader;
pub use fader::{FaderControl, FaderDecode};

mod feedback;
use feedback::Feedback;

pub mod layout;
pub use layout::{Buildable, ControlSpec, Layout, LAYOUTS};

pub mod led;
pub use led::DisplayType;

mod panel;
pub use panel::{Panel, SharedPanel};

pub mod protocol;
pub use protocol::Family;

mod scheduler;
pub use scheduler::{ResetSlot, Scheduler};

mod vpot;
pub use vpot::{decode_step, VPotControl};

use std::time::Duration;

#[derive(Clone, Debug)]
pub struct Settings {
    /// Delay before a relative V-Pot ring reverts to its rest position.
    pub led_reset_delay: Duration,
    /// Overrides the fader decode strategy of the layout.
    pub fader_decode: Option<FaderDecode>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            led_reset_delay: scheduler::DEFAULT_DELAY,
            fader_decode: None,
        }
    }
}
