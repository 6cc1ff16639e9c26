use std::{borrow::Cow, fmt};

/// Hex dump of a MIDI buffer, e.g. `[b0 10 41]`.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Hex<'a>(Cow<'a, [u8]>);

impl<'a> Hex<'a> {
    pub fn into_owned(self) -> Hex<'static> {
        Hex(Cow::Owned(self.0.into_owned()))
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl<'a> From<&'a [u8]> for Hex<'a> {
    fn from(buf: &'a [u8]) -> Self {
        Self(Cow::Borrowed(buf))
    }
}

impl<const S: usize> From<[u8; S]> for Hex<'static> {
    fn from(buf: [u8; S]) -> Self {
        Self(Cow::Owned(buf.to_vec()))
    }
}

impl<'a> fmt::Display for Hex<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[")?;
        for (idx, byte) in self.0.iter().enumerate() {
            if idx > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{byte:02x}")?;
        }
        f.write_str("]")
    }
}
