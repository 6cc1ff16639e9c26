use std::sync::Arc;

use super::protocol::Family;
use crate::midi;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("MIDI error: {}", .0)]
    Midi(#[from] midi::Error),

    #[error("Duplicate {family} wire id {id:#04x} in layout {layout}")]
    DuplicateWireId {
        layout: Arc<str>,
        family: Family,
        id: u8,
    },

    #[error("Invalid {family} wire id {id:#04x} in layout {layout}")]
    InvalidWireId {
        layout: Arc<str>,
        family: Family,
        id: u8,
    },

    #[error("Unknown layout: {}", .0)]
    UnknownLayout(Arc<str>),

    #[error("Panel is closed")]
    Closed,
}
