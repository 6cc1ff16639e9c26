use once_cell::sync::Lazy;
use std::{collections::BTreeMap, collections::HashSet, sync::Arc};

use super::{protocol::Family, Error, FaderDecode};
use crate::midi::DATA_MAX;

/// Wire id and LED id of a control.
///
/// LED id `0` means no LED for buttons.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct ControlSpec {
    pub id: u8,
    pub led: u8,
}

/// Controls of a surface, in logical order, with their wire ids.
#[derive(Clone, Debug)]
pub struct Layout {
    name: Arc<str>,
    vpots: Vec<ControlSpec>,
    buttons: Vec<ControlSpec>,
    faders: Vec<u8>,
    fader_decode: FaderDecode,
}

impl Layout {
    pub fn new(name: impl Into<Arc<str>>) -> Self {
        Self {
            name: name.into(),
            vpots: Vec::new(),
            buttons: Vec::new(),
            faders: Vec::new(),
            fader_decode: FaderDecode::default(),
        }
    }

    pub fn with_vpot(mut self, id: u8, led: u8) -> Self {
        self.vpots.push(ControlSpec { id, led });
        self
    }

    pub fn with_button(mut self, id: u8, led: u8) -> Self {
        self.buttons.push(ControlSpec { id, led });
        self
    }

    pub fn with_fader(mut self, id: u8) -> Self {
        self.faders.push(id);
        self
    }

    pub fn with_fader_decode(mut self, decode: FaderDecode) -> Self {
        self.fader_decode = decode;
        self
    }

    pub fn name(&self) -> &Arc<str> {
        &self.name
    }

    pub fn vpots(&self) -> &[ControlSpec] {
        &self.vpots
    }

    pub fn buttons(&self) -> &[ControlSpec] {
        &self.buttons
    }

    pub fn faders(&self) -> &[u8] {
        &self.faders
    }

    pub fn fader_decode(&self) -> FaderDecode {
        self.fader_decode
    }

    pub fn validate(&self) -> Result<(), Error> {
        let vpot_ids = self.vpots.iter().map(|spec| spec.id);
        let button_ids = self.buttons.iter().map(|spec| spec.id);

        self.validate_ids(Family::VPot, vpot_ids)?;
        self.validate_ids(Family::Button, button_ids)?;
        self.validate_ids(Family::Fader, self.faders.iter().cloned())
    }

    fn validate_ids(&self, family: Family, ids: impl Iterator<Item = u8>) -> Result<(), Error> {
        let mut seen = HashSet::new();
        for id in ids {
            if id > DATA_MAX {
                return Err(Error::InvalidWireId {
                    layout: self.name.clone(),
                    family,
                    id,
                });
            }

            if !seen.insert(id) {
                return Err(Error::DuplicateWireId {
                    layout: self.name.clone(),
                    family,
                    id,
                });
            }
        }

        Ok(())
    }
}

pub trait Buildable {
    const NAME: &'static str;

    fn build() -> Layout;
}

/// Behringer X-Touch Mini in MC mode.
pub struct XTouchMini;

impl XTouchMini {
    const VPOT_FIRST_ID: u8 = 0x10;
    const VPOT_FIRST_LED: u8 = 0x30;
    const VPOT_PUSH_FIRST_ID: u8 = 0x20;
    const BUTTONS: [u8; 18] = [
        89, 90, 40, 41, 42, 43, 44, 45, // top row
        87, 88, 91, 92, 86, 93, 94, 95, // bottom row
        84, 85, // layers
    ];
    const FADER_ID: u8 = 0x00;
}

impl Buildable for XTouchMini {
    const NAME: &'static str = "X-Touch Mini (MC mode)";

    fn build() -> Layout {
        let mut layout = Layout::new(Self::NAME);

        for idx in 0..8 {
            layout = layout.with_vpot(Self::VPOT_FIRST_ID + idx, Self::VPOT_FIRST_LED + idx);
        }

        // V-Pot pushes have no LED of their own.
        for idx in 0..8 {
            layout = layout.with_button(Self::VPOT_PUSH_FIRST_ID + idx, 0);
        }

        for id in Self::BUTTONS {
            layout = layout.with_button(id, id);
        }

        layout.with_fader(Self::FADER_ID)
    }
}

pub static LAYOUTS: Lazy<Factory> = Lazy::new(|| Factory::default().with::<XTouchMini>());

#[derive(Default)]
pub struct Factory(BTreeMap<&'static str, fn() -> Layout>);

impl Factory {
    pub(super) fn with<B: Buildable>(mut self) -> Self {
        self.0.insert(B::NAME, B::build);
        self
    }

    pub fn list(&self) -> impl Iterator<Item = &str> {
        self.0.keys().cloned()
    }

    pub fn build(&self, name: &str) -> Result<Layout, Error> {
        self.0
            .get(name)
            .map(|build| build())
            .ok_or_else(|| Error::UnknownLayout(name.into()))
    }
}
