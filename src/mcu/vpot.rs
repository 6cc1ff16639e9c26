use super::{
    led::{self, DisplayType, MAX_STEP},
    protocol, Feedback, ResetSlot, Scheduler,
};
use crate::{
    control::{clip, AdjustableIntControl, IntControl, Listener, Listeners},
    midi::SinkArc,
};

const SIGN_BIT: u8 = 0x40;
const MAGNITUDE_MASK: u8 = 0x3f;

/// Decodes the sign-magnitude step reported by a V-Pot.
pub fn decode_step(data: u8) -> i32 {
    let magnitude = (data & MAGNITUDE_MASK) as i32;
    if data & SIGN_BIT == 0 {
        magnitude
    } else {
        -magnitude
    }
}

/// An endless rotary encoder with its LED ring.
///
/// In absolute mode, steps accumulate into a value in `[min, max]`.
/// In relative mode, listeners receive each step in `[-7, 7]` and the value
/// returns to `0` afterwards. The ring then shows a pulse which reverts
/// to a rest position after the scheduler delay.
#[derive(Debug)]
pub struct VPotControl {
    value: i32,
    min: i32,
    max: i32,
    requested_min: i32,
    requested_max: i32,
    absolute: bool,
    display_type: DisplayType,
    feedback: Feedback,
    reset: ResetSlot,
    listeners: Listeners,
}

impl VPotControl {
    pub fn new(led: u8, sink: SinkArc, scheduler: Scheduler) -> Self {
        Self {
            value: 0,
            min: 0,
            max: 127,
            requested_min: 0,
            requested_max: 127,
            absolute: true,
            display_type: DisplayType::default(),
            feedback: Feedback::new(protocol::control_change::TAG, led, sink),
            reset: ResetSlot::new(scheduler),
            listeners: Listeners::default(),
        }
    }

    pub fn led(&self) -> u8 {
        self.feedback.led()
    }

    pub fn is_absolute(&self) -> bool {
        self.absolute
    }

    pub fn set_absolute(&mut self, absolute: bool) {
        self.absolute = absolute;
        self.apply_bounds();
    }

    pub fn display_type(&self) -> DisplayType {
        self.display_type
    }

    pub fn set_display_type(&mut self, display_type: DisplayType) {
        self.display_type = display_type;
        self.display();
    }

    pub fn set_value_silently(&mut self, value: i32) {
        self.value = clip(value, self.min, self.max);
    }

    /// Sends the ring feedback for the current value.
    pub fn display(&mut self) {
        let code = self.display_type.code();
        let listened = !self.listeners.is_empty();

        if self.absolute {
            let pos = led::absolute_position(
                self.display_type,
                self.value,
                self.min,
                self.max,
                listened,
            );
            self.feedback.send(code | pos);
        } else {
            let (pulse, rest) = led::relative_positions(self.display_type, self.value, listened);

            self.reset.cancel();
            self.feedback.send(code | pulse);

            let feedback = self.feedback.clone();
            self.reset.reschedule(move || feedback.send(code | rest));
        }
    }

    pub(crate) fn update(&mut self, data: u8) {
        let step = decode_step(data);
        self.set_value(if self.absolute {
            self.value.saturating_add(step)
        } else {
            step
        });
    }

    /// Cancels the pending ring reset, if any.
    pub(crate) fn cancel_reset(&mut self) {
        self.reset.cancel();
    }

    fn apply_bounds(&mut self) {
        if self.absolute {
            self.min = self.requested_min.min(self.requested_max);
            self.max = self.requested_min.max(self.requested_max);
        } else {
            self.min = -MAX_STEP;
            self.max = MAX_STEP;
            self.value = 0;
        }

        self.value = clip(self.value, self.min, self.max);
        self.display();
    }
}

impl IntControl for VPotControl {
    fn value(&self) -> i32 {
        self.value
    }

    fn set_value(&mut self, value: i32) {
        self.set_value_silently(value);
        self.display();

        self.listeners.notify(self.value);

        if !self.absolute {
            // Relative steps are momentary.
            self.set_value_silently(0);
        }
    }

    fn min(&self) -> i32 {
        self.min
    }

    fn max(&self) -> i32 {
        self.max
    }

    fn listeners(&self) -> &Listeners {
        &self.listeners
    }

    fn add_listener(&mut self, listener: Listener) -> bool {
        let res = self.listeners.add(listener);
        self.display();
        res
    }

    fn remove_listener(&mut self, listener: &Listener) -> bool {
        let res = self.listeners.remove(listener);
        self.display();
        res
    }

    fn clear_listeners(&mut self) {
        self.listeners.clear();
        self.display();
    }
}

impl AdjustableIntControl for VPotControl {
    fn set_min(&mut self, min: i32) {
        self.requested_min = min;
        self.apply_bounds();
    }

    fn set_max(&mut self, max: i32) {
        self.requested_max = max;
        self.apply_bounds();
    }

    fn set_min_max(&mut self, min: i32, max: i32) {
        self.requested_min = min;
        self.requested_max = max;
        self.apply_bounds();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::midi::transport::testing::{sink_arc, RecordingSink};
    use std::{
        sync::{Arc, Mutex},
        thread,
        time::Duration,
    };

    fn recording_listener() -> (Listener, Arc<Mutex<Vec<i32>>>) {
        let values = Arc::new(Mutex::new(Vec::new()));
        let listener: Listener = {
            let values = values.clone();
            Arc::new(move |value: i32| values.lock().unwrap().push(value))
        };

        (listener, values)
    }

    fn vpot(sink: &Arc<RecordingSink>) -> VPotControl {
        VPotControl::new(0x30, sink_arc(sink), Scheduler::default())
    }

    #[test]
    fn step_decoding() {
        assert_eq!(decode_step(0x01), 1);
        assert_eq!(decode_step(0x07), 7);
        assert_eq!(decode_step(0x41), -1);
        assert_eq!(decode_step(0x43), -3);
        assert_eq!(decode_step(0x00), 0);
    }

    #[test]
    fn absolute_accumulates_and_clips() {
        let sink = RecordingSink::new();
        let mut vpot = vpot(&sink);
        let (listener, values) = recording_listener();
        vpot.add_listener(listener);

        vpot.set_value(126);
        vpot.update(0x05);
        assert_eq!(vpot.value(), 127);
        vpot.update(0x45);
        assert_eq!(vpot.value(), 122);
        vpot.set_value(-20);
        assert_eq!(vpot.value(), 0);

        assert_eq!(*values.lock().unwrap(), [126, 127, 122, 0]);
    }

    #[test]
    fn absolute_fan_display() {
        let sink = RecordingSink::new();
        let mut vpot = vpot(&sink);
        let (listener, _) = recording_listener();
        vpot.add_listener(listener);
        sink.take();

        vpot.set_value(64);
        let sent = sink.take();
        assert_eq!(sent.len(), 1);
        assert_eq!(&*sent[0], &[0xb0, 0x30, 0x26]);
    }

    #[test]
    fn listeners_toggle_display() {
        let sink = RecordingSink::new();
        let mut vpot = vpot(&sink);
        vpot.set_value(64);
        assert_eq!(sink.payloads(), [0x20]);

        let (listener, _) = recording_listener();
        assert!(vpot.add_listener(listener.clone()));
        assert!(!vpot.add_listener(listener.clone()));
        assert_eq!(sink.payloads(), [0x26, 0x26]);

        assert!(vpot.remove_listener(&listener));
        assert!(!vpot.remove_listener(&listener));
        assert_eq!(sink.payloads(), [0x20, 0x20]);
    }

    #[test]
    fn bounds_follow_mode() {
        let sink = RecordingSink::new();
        let mut vpot = vpot(&sink);

        vpot.set_min_max(-223, 223);
        assert_eq!((vpot.min(), vpot.max()), (-223, 223));
        vpot.set_value(200);

        vpot.set_absolute(false);
        assert_eq!((vpot.min(), vpot.max()), (-7, 7));
        assert_eq!(vpot.value(), 0);

        vpot.set_min_max(0, 10);
        assert_eq!((vpot.min(), vpot.max()), (-7, 7));

        vpot.set_absolute(true);
        assert_eq!((vpot.min(), vpot.max()), (0, 10));

        vpot.set_max(-10);
        assert_eq!((vpot.min(), vpot.max()), (-10, 0));
        assert!(vpot.value() >= vpot.min() && vpot.value() <= vpot.max());
    }

    #[test]
    fn extreme_bounds_saturate() {
        let sink = RecordingSink::new();
        let mut vpot = vpot(&sink);
        let (listener, values) = recording_listener();
        vpot.add_listener(listener);

        vpot.set_min_max(i32::MIN, i32::MAX);
        vpot.set_value(i32::MAX);
        vpot.update(0x05);
        assert_eq!(vpot.value(), i32::MAX);

        vpot.set_value(i32::MIN);
        vpot.update(0x45);
        assert_eq!(vpot.value(), i32::MIN);

        assert_eq!(*values.lock().unwrap(), [i32::MAX, i32::MAX, i32::MIN, i32::MIN]);
        assert_eq!(sink.payloads().last(), Some(&0x21));
    }

    #[test]
    fn relative_settles_to_zero() {
        let sink = RecordingSink::new();
        let mut vpot = vpot(&sink);
        vpot.set_absolute(false);
        let (listener, values) = recording_listener();
        vpot.add_listener(listener);

        vpot.update(0x03);
        assert_eq!(vpot.value(), 0);
        vpot.update(0x4f);
        assert_eq!(vpot.value(), 0);
        vpot.set_value(-2);
        assert_eq!(vpot.value(), 0);

        assert_eq!(*values.lock().unwrap(), [3, -7, -2]);
    }

    #[test]
    fn relative_pulse_then_single_reset() {
        let sink = RecordingSink::new();
        let scheduler = Scheduler::new(Duration::from_millis(600));
        let mut vpot = VPotControl::new(0x30, sink_arc(&sink), scheduler);
        vpot.set_absolute(false);
        let (listener, _) = recording_listener();
        vpot.add_listener(listener);
        thread::sleep(Duration::from_millis(800));
        assert_eq!(sink.payloads(), [0x20, 0x26, 0x26]);

        vpot.update(0x43);
        assert_eq!(sink.payloads(), [0x24]);

        thread::sleep(Duration::from_millis(300));
        vpot.update(0x43);
        assert_eq!(sink.payloads(), [0x24]);

        // The first reset would be due now, but it was cancelled.
        thread::sleep(Duration::from_millis(450));
        assert!(sink.take().is_empty());

        thread::sleep(Duration::from_millis(450));
        assert_eq!(sink.payloads(), [0x26]);

        thread::sleep(Duration::from_millis(700));
        assert!(sink.take().is_empty());
    }

    #[test]
    fn relative_without_listener_blanks_ring() {
        let sink = RecordingSink::new();
        let mut vpot = vpot(&sink);
        vpot.set_absolute(false);

        vpot.update(0x05);
        assert_eq!(sink.payloads(), [0x20, 0x20]);

        thread::sleep(Duration::from_millis(400));
        assert_eq!(sink.payloads(), [0x20]);
    }
}
