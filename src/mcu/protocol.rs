//! MCU message classes.

use crate::midi::Tag;

pub mod key {
    use crate::midi::Tag;
    pub const TAG: Tag = Tag::from(0x90);
}

pub mod control_change {
    use crate::midi::Tag;
    pub const TAG: Tag = Tag::from(0xb0);
}

pub mod fader {
    use crate::midi::Tag;
    pub const TAG: Tag = Tag::from(0xe0);
}

/// Control families, as addressed by the message class.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum Family {
    VPot,
    Button,
    Fader,
}

impl Family {
    pub fn from_tag(tag: Tag) -> Option<Self> {
        match tag {
            control_change::TAG => Some(Family::VPot),
            key::TAG => Some(Family::Button),
            fader::TAG => Some(Family::Fader),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Family::VPot => "V-Pot",
            Family::Button => "Button",
            Family::Fader => "Fader",
        }
    }
}

impl std::fmt::Display for Family {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
