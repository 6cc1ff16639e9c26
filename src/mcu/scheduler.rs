use std::{
    sync::{Arc, Mutex, PoisonError},
    time::Duration,
};

pub const DEFAULT_DELAY: Duration = Duration::from_millis(200);

/// Delayed tasks executor shared by all the controls of a panel.
#[derive(Clone)]
pub struct Scheduler {
    timer: Arc<Mutex<timer::Timer>>,
    delay: chrono::Duration,
}

impl Scheduler {
    pub fn new(delay: Duration) -> Self {
        let delay = chrono::Duration::from_std(delay).unwrap_or_else(|_| {
            log::warn!("Delay {delay:?} out of range, using {DEFAULT_DELAY:?}");
            chrono::Duration::milliseconds(DEFAULT_DELAY.as_millis() as i64)
        });

        Self {
            timer: Arc::new(Mutex::new(timer::Timer::new())),
            delay,
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay.to_std().unwrap_or(DEFAULT_DELAY)
    }

    fn schedule<F>(&self, task: F) -> timer::Guard
    where
        F: FnOnce() + Send + 'static,
    {
        let mut task = Some(task);
        self.timer
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .schedule_with_delay(self.delay, move || {
                if let Some(task) = task.take() {
                    task();
                }
            })
    }
}

impl Default for Scheduler {
    fn default() -> Self {
        Self::new(DEFAULT_DELAY)
    }
}

impl std::fmt::Debug for Scheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Scheduler")
            .field("delay", &self.delay)
            .finish()
    }
}

/// A single-slot delayed task.
///
/// Holds at most one pending task: scheduling a new one cancels the
/// previous. The generation lock is held while a task runs, so once
/// `cancel` returns, a cancelled task has either completed or will never run.
pub struct ResetSlot {
    scheduler: Scheduler,
    generation: Arc<Mutex<u64>>,
    pending: Option<timer::Guard>,
}

impl ResetSlot {
    pub fn new(scheduler: Scheduler) -> Self {
        Self {
            scheduler,
            generation: Arc::new(Mutex::new(0)),
            pending: None,
        }
    }

    pub fn cancel(&mut self) {
        *self.generation.lock().unwrap_or_else(PoisonError::into_inner) += 1;
        // Dropping the guard cancels the task.
        self.pending = None;
    }

    pub fn reschedule<F>(&mut self, task: F)
    where
        F: FnOnce() + Send + 'static,
    {
        self.cancel();

        let expected = *self.generation.lock().unwrap_or_else(PoisonError::into_inner);
        let generation = self.generation.clone();
        self.pending = Some(self.scheduler.schedule(move || {
            let current = generation.lock().unwrap_or_else(PoisonError::into_inner);
            if *current == expected {
                task();
            }
        }));
    }

    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }
}

impl std::fmt::Debug for ResetSlot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResetSlot")
            .field("pending", &self.pending.is_some())
            .finish()
    }
}

impl Drop for ResetSlot {
    fn drop(&mut self) {
        self.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossbeam_channel as channel;

    #[test]
    fn fires_once_after_delay() {
        let scheduler = Scheduler::new(Duration::from_millis(50));
        let mut slot = ResetSlot::new(scheduler);
        let (tx, rx) = channel::unbounded();

        let start = std::time::Instant::now();
        slot.reschedule(move || tx.send(1).unwrap());

        assert_eq!(rx.recv_timeout(Duration::from_secs(2)), Ok(1));
        assert!(start.elapsed() >= Duration::from_millis(40));
        assert!(rx.recv_timeout(Duration::from_millis(150)).is_err());
    }

    #[test]
    fn out_of_range_delay() {
        assert_eq!(Scheduler::new(Duration::MAX).delay(), DEFAULT_DELAY);
        assert_eq!(
            Scheduler::new(Duration::from_millis(350)).delay(),
            Duration::from_millis(350)
        );
    }

    #[test]
    fn cancel_waits_for_running_task() {
        let scheduler = Scheduler::new(Duration::from_millis(20));
        let mut slot = ResetSlot::new(scheduler);
        let sent = Arc::new(Mutex::new(Vec::new()));
        let (started_tx, started_rx) = channel::bounded(1);
        let (release_tx, release_rx) = channel::bounded::<()>(1);

        {
            let sent = sent.clone();
            slot.reschedule(move || {
                started_tx.send(()).unwrap();
                let _ = release_rx.recv_timeout(Duration::from_secs(2));
                sent.lock().unwrap().push("rest");
            });
        }
        started_rx.recv_timeout(Duration::from_secs(2)).unwrap();

        let releaser = std::thread::spawn(move || {
            std::thread::sleep(Duration::from_millis(100));
            release_tx.send(()).unwrap();
        });

        // The running task completes before the newer display goes out.
        slot.cancel();
        sent.lock().unwrap().push("pulse");
        releaser.join().unwrap();

        assert_eq!(*sent.lock().unwrap(), ["rest", "pulse"]);
    }

    #[test]
    fn reschedule_cancels_previous() {
        let scheduler = Scheduler::new(Duration::from_millis(100));
        let mut slot = ResetSlot::new(scheduler);
        let (tx, rx) = channel::unbounded();

        let first_tx = tx.clone();
        slot.reschedule(move || first_tx.send("first").unwrap());
        slot.reschedule(move || tx.send("second").unwrap());

        assert_eq!(rx.recv_timeout(Duration::from_secs(2)), Ok("second"));
        assert!(rx.recv_timeout(Duration::from_millis(300)).is_err());
    }

    #[test]
    fn cancel_and_drop() {
        let scheduler = Scheduler::new(Duration::from_millis(50));
        let (tx, rx) = channel::unbounded();

        let mut slot = ResetSlot::new(scheduler.clone());
        let cancelled_tx = tx.clone();
        slot.reschedule(move || cancelled_tx.send("cancelled").unwrap());
        slot.cancel();
        assert!(!slot.has_pending());

        let dropped = {
            let mut slot = ResetSlot::new(scheduler);
            slot.reschedule(move || tx.send("dropped").unwrap());
            slot.has_pending()
        };
        assert!(dropped);

        assert!(rx.recv_timeout(Duration::from_millis(300)).is_err());
    }
}
