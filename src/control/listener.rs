use std::{panic, sync::Arc};

/// A value listener.
///
/// The `Arc` is the registration handle: two listeners are the same
/// if they point to the same allocation. Keep a clone to remove it later.
pub type Listener = Arc<dyn Fn(i32) + Send + Sync>;

#[derive(Default)]
pub struct Listeners(Vec<Listener>);

impl Listeners {
    fn position(&self, listener: &Listener) -> Option<usize> {
        let ptr = Arc::as_ptr(listener) as *const ();
        self.0
            .iter()
            .position(|cur| Arc::as_ptr(cur) as *const () == ptr)
    }

    pub fn contains(&self, listener: &Listener) -> bool {
        self.position(listener).is_some()
    }

    pub fn add(&mut self, listener: Listener) -> bool {
        if self.contains(&listener) {
            return false;
        }

        self.0.push(listener);
        true
    }

    pub fn remove(&mut self, listener: &Listener) -> bool {
        match self.position(listener) {
            Some(idx) => {
                self.0.swap_remove(idx);
                true
            }
            None => false,
        }
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn notify(&self, value: i32) {
        for listener in self.0.iter() {
            let res = panic::catch_unwind(panic::AssertUnwindSafe(|| listener(value)));
            if res.is_err() {
                log::error!("Control listener panicked while handling value {value}");
            }
        }
    }
}

impl std::fmt::Debug for Listeners {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("Listeners").field(&self.0.len()).finish()
    }
}
