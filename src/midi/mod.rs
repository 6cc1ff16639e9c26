mod error;
pub use error::Error;

mod hex;
pub use hex::Hex;

pub mod msg;
pub use msg::Msg;

pub mod port;
pub use port::MidirTransport;

pub mod transport;
pub use transport::{Handler, Sink, SinkArc, Transport};

/// Upper nibble of a MIDI status byte.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Tag(u8);

impl Tag {
    pub const fn from(byte: u8) -> Self {
        Self(byte & 0xf0)
    }
}

impl From<Tag> for u8 {
    fn from(tag: Tag) -> u8 {
        tag.0
    }
}

pub const DATA_MAX: u8 = 0x7f;
