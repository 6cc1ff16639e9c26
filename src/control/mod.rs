//! Observable integer controls.
//!
//! Controls hold a value clipped to `[min, max]` and notify their listeners
//! synchronously when the value is set.

mod listener;
pub use listener::{Listener, Listeners};

/// Clips `value` into `[min, max]`.
///
/// Unlike `i32::clamp`, this doesn't panic on inverted bounds: `min` wins.
#[inline]
pub fn clip(value: i32, min: i32, max: i32) -> i32 {
    value.min(max).max(min)
}

/// A control element that modifies an integer value clipped to a range.
pub trait IntControl {
    fn value(&self) -> i32;
    fn set_value(&mut self, value: i32);

    fn min(&self) -> i32;
    fn max(&self) -> i32;

    fn listeners(&self) -> &Listeners;

    fn add_listener(&mut self, listener: Listener) -> bool;

    fn remove_listener(&mut self, listener: &Listener) -> bool;

    fn clear_listeners(&mut self);
}

pub trait AdjustableIntControl: IntControl {
    fn set_min(&mut self, min: i32);
    fn set_max(&mut self, max: i32);
    fn set_min_max(&mut self, min: i32, max: i32);
}
