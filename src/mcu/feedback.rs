use crate::midi::{self, Msg, SinkArc, Tag};

/// LED feedback channel of a control.
#[derive(Clone)]
pub struct Feedback {
    tag: Tag,
    led: u8,
    sink: SinkArc,
}

impl Feedback {
    pub fn new(tag: Tag, led: u8, sink: SinkArc) -> Self {
        Self { tag, led, sink }
    }

    pub fn led(&self) -> u8 {
        self.led
    }

    pub fn msg(&self, payload: u8) -> Result<Msg, midi::Error> {
        Msg::try_new(self.tag.into(), self.led, payload)
    }

    pub fn try_send(&self, payload: u8) -> Result<(), midi::Error> {
        self.sink.send(self.msg(payload)?)
    }

    pub fn send(&self, payload: u8) {
        if let Err(err) = self.try_send(payload) {
            log::warn!("LED {:#04x} feedback skipped: {err}", self.led);
        }
    }
}

impl std::fmt::Debug for Feedback {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Feedback")
            .field("tag", &self.tag)
            .field("led", &self.led)
            .finish()
    }
}
