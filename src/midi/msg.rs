use super::{Error, Hex, Tag, DATA_MAX};

pub type Result = std::result::Result<Msg, Error>;

/// A three bytes MIDI short message: status, data1, data2.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Msg([u8; 3]);

impl Msg {
    pub fn try_new(status: u8, data1: u8, data2: u8) -> Result {
        if status <= DATA_MAX {
            return Err(Error::InvalidStatus(status));
        }

        if data1 > DATA_MAX || data2 > DATA_MAX {
            return Err(Error::InvalidData(Hex::from([status, data1, data2])));
        }

        Ok(Self([status, data1, data2]))
    }

    pub fn try_from_bytes(buf: &[u8]) -> Result {
        match *buf {
            [status, data1, data2] => Self::try_new(status, data1, data2),
            _ => Err(Error::InvalidSize(Hex::from(buf).into_owned())),
        }
    }

    pub fn status(&self) -> u8 {
        self.0[0]
    }

    pub fn tag(&self) -> Tag {
        Tag::from(self.0[0])
    }

    pub fn data1(&self) -> u8 {
        self.0[1]
    }

    pub fn data2(&self) -> u8 {
        self.0[2]
    }

    pub fn display(&self) -> Hex {
        Hex::from(self.0.as_slice())
    }
}

impl std::ops::Deref for Msg {
    type Target = [u8];

    fn deref(&self) -> &Self::Target {
        self.0.as_slice()
    }
}
