use super::{protocol, Feedback};
use crate::{
    control::{clip, IntControl, Listener, Listeners},
    midi::SinkArc,
};

pub const TOGGLE_ON: i32 = 127;
pub const TOGGLE_OFF: i32 = 0;

const MIN: i32 = 0;
const MAX: i32 = 127;

/// A key with its LED.
///
/// In toggle mode, each press flips the value between `0`
/// and the press magnitude, releases are ignored.
#[derive(Debug)]
pub struct ButtonControl {
    value: i32,
    is_toggle: bool,
    feedback: Option<Feedback>,
    listeners: Listeners,
}

impl ButtonControl {
    /// LED id `0` means the button has no LED.
    pub fn new(led: u8, sink: SinkArc) -> Self {
        let feedback = (led > 0).then(|| Feedback::new(protocol::key::TAG, led, sink));

        Self {
            value: TOGGLE_OFF,
            is_toggle: false,
            feedback,
            listeners: Listeners::default(),
        }
    }

    pub fn is_toggle(&self) -> bool {
        self.is_toggle
    }

    pub fn set_toggle(&mut self, is_toggle: bool) {
        self.is_toggle = is_toggle;
        self.display();
    }

    pub fn led(&self) -> Option<u8> {
        self.feedback.as_ref().map(Feedback::led)
    }

    pub fn display(&self) {
        if let Some(feedback) = self.feedback.as_ref() {
            feedback.send(self.value as u8);
        }
    }

    /// Sets the value without notifying the listeners.
    ///
    /// The LED is still updated if the value changed.
    pub fn set_value_silently(&mut self, value: i32) {
        let value = clip(value, MIN, MAX);
        if value != self.value {
            self.value = value;
            self.display();
        }
    }

    /// Switches the button off and refreshes its LED.
    pub(crate) fn reset(&mut self) {
        self.value = TOGGLE_OFF;
        self.display();
    }

    pub(crate) fn update(&mut self, data: u8) {
        let data = data as i32;
        if self.is_toggle {
            if data != 0 {
                self.set_value(if self.value == 0 { data } else { 0 });
            }
        } else {
            self.set_value(data);
        }
    }
}

impl IntControl for ButtonControl {
    fn value(&self) -> i32 {
        self.value
    }

    fn set_value(&mut self, value: i32) {
        let value = clip(value, MIN, MAX);
        if value != self.value {
            self.value = value;
            self.display();
            self.listeners.notify(self.value);
        }
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::midi::transport::testing::{sink_arc, RecordingSink};
    use std::sync::{Arc, Mutex};

    fn recording_listener() -> (Listener, Arc<Mutex<Vec<i32>>>) {
        let values = Arc::new(Mutex::new(Vec::new()));
        let listener: Listener = {
            let values = values.clone();
            Arc::new(move |value: i32| values.lock().unwrap().push(value))
        };

        (listener, values)
    }

    #[test]
    fn toggle_sequence() {
        let sink = RecordingSink::new();
        let mut button = ButtonControl::new(0x20, sink_arc(&sink));
        button.set_toggle(true);
        assert_eq!(sink.payloads(), [0]);

        let (listener, values) = recording_listener();
        assert!(button.add_listener(listener));

        button.update(10);
        assert_eq!(button.value(), 10);
        button.update(0);
        assert_eq!(button.value(), 10);
        button.update(20);
        assert_eq!(button.value(), 0);
        button.update(0);
        assert_eq!(button.value(), 0);

        assert_eq!(*values.lock().unwrap(), [10, 0]);
        assert_eq!(sink.payloads(), [10, 0]);
    }

    #[test]
    fn momentary_tracks_input() {
        let sink = RecordingSink::new();
        let mut button = ButtonControl::new(0x5e, sink_arc(&sink));
        let (listener, values) = recording_listener();
        button.add_listener(listener);

        button.update(127);
        button.update(127);
        button.update(0);

        assert_eq!(*values.lock().unwrap(), [127, 0]);
        let sent = sink.take();
        assert_eq!(sent.len(), 2);
        assert_eq!(&*sent[0], &[0x90, 0x5e, 0x7f]);
        assert_eq!(&*sent[1], &[0x90, 0x5e, 0x00]);
    }

    #[test]
    fn set_value_clips_and_notifies_on_change_only() {
        let sink = RecordingSink::new();
        let mut button = ButtonControl::new(0x10, sink_arc(&sink));
        let (listener, values) = recording_listener();
        button.add_listener(listener);

        button.set_value(300);
        assert_eq!(button.value(), MAX);
        button.set_value(127);
        button.set_value(-5);
        assert_eq!(button.value(), MIN);

        assert_eq!(*values.lock().unwrap(), [127, 0]);
    }

    #[test]
    fn silent_set_skips_listeners() {
        let sink = RecordingSink::new();
        let mut button = ButtonControl::new(0x10, sink_arc(&sink));
        let (listener, values) = recording_listener();
        button.add_listener(listener);

        button.set_value_silently(TOGGLE_ON);
        button.set_value_silently(TOGGLE_ON);

        assert_eq!(button.value(), TOGGLE_ON);
        assert!(values.lock().unwrap().is_empty());
        assert_eq!(sink.payloads(), [0x7f]);
    }

    #[test]
    fn no_led() {
        let sink = RecordingSink::new();
        let mut button = ButtonControl::new(0, sink_arc(&sink));
        assert_eq!(button.led(), None);

        button.update(127);
        assert_eq!(button.value(), 127);
        assert!(sink.take().is_empty());
    }
}
